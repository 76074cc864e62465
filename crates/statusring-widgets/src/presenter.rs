//! Drawing collaborator port.

use crate::view::ViewState;

/// Receives each frame the widget wants drawn.
pub trait Presenter {
    /// Draw `view`, replacing whatever was drawn before.
    fn present(&mut self, view: &ViewState);
}

impl<F> Presenter for F
where
    F: FnMut(&ViewState),
{
    fn present(&mut self, view: &ViewState) {
        self(view);
    }
}

/// Presenter that keeps a copy of every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPresenter {
    /// Frames presented so far
    pub frames: Vec<ViewState>,
}

impl RecordingPresenter {
    /// Create an empty presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<&ViewState> {
        self.frames.last()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, view: &ViewState) {
        self.frames.push(view.clone());
    }
}
