//! Outbound host message channel.
//!
//! Messages are fire-and-forget: a sink never reports back and never blocks
//! the widget.

use statusring_core::HostMessage;
use std::io::Write;

/// One-way port to the host.
pub trait HostSink {
    /// Deliver one message.
    fn post(&mut self, message: HostMessage);
}

impl<F> HostSink for F
where
    F: FnMut(HostMessage),
{
    fn post(&mut self, message: HostMessage) {
        self(message);
    }
}

/// Sink that keeps every message in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    /// Messages received so far
    pub messages: Vec<HostMessage>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything received so far.
    pub fn drain(&mut self) -> Vec<HostMessage> {
        std::mem::take(&mut self.messages)
    }
}

impl HostSink for RecordingSink {
    fn post(&mut self, message: HostMessage) {
        self.messages.push(message);
    }
}

/// Sink writing one JSON document per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Borrow the writer.
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HostSink for JsonLinesSink<W> {
    fn post(&mut self, message: HostMessage) {
        let result = serde_json::to_writer(&mut self.writer, &message)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            tracing::warn!(%err, "dropping host message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared() -> HostMessage {
        HostMessage::SetFilter { filters: vec![] }
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.post(cleared());
        sink.post(cleared());
        assert_eq!(sink.messages.len(), 2);
        assert_eq!(sink.drain().len(), 2);
        assert!(sink.messages.is_empty());
    }

    #[test]
    fn test_closure_is_a_sink() {
        let mut seen = 0;
        {
            let mut sink = |_msg: HostMessage| seen += 1;
            sink.post(cleared());
        }
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_json_lines_sink_writes_one_line_per_message() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.post(cleared());
        sink.post(cleared());
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"setFilter","filters":[]}"#);
    }
}
