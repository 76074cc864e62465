//! Selection state.
//!
//! Selection follows the Elm-style `State + Message → Command` pattern:
//! messages update the state and tell the caller what follow-up work to run.
//!
//! # Examples
//!
//! ```
//! use statusring_core::{Command, Selection, SelectionMessage, State};
//!
//! let mut selection = Selection::default();
//! let cmd = selection.update(SelectionMessage::Click("Healthy".into()));
//! assert_eq!(cmd, Command::Recompute);
//! assert_eq!(selection.key(), Some("Healthy"));
//!
//! selection.update(SelectionMessage::Click("Healthy".into()));
//! assert_eq!(selection, Selection::Unselected);
//! ```

use serde::{Deserialize, Serialize};

/// State trait: `update` applies a message and returns the follow-up command.
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> {
    /// Message type for state updates
    type Message;

    /// Update state in response to a message.
    fn update(&mut self, msg: Self::Message) -> Command;
}

/// Follow-up work after a state update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Nothing to do
    #[default]
    None,
    /// Re-aggregate under the new state, re-render, then notify the host
    Recompute,
}

impl Command {
    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Single-select category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "key", rename_all = "camelCase")]
pub enum Selection {
    /// Nothing selected
    #[default]
    Unselected,
    /// One category selected
    Selected(String),
}

/// Messages for [`Selection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMessage {
    /// User clicked a category
    Click(String),
    /// Fresh data arrived
    Reset,
}

impl Selection {
    /// Selected key, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Unselected => None,
            Self::Selected(key) => Some(key),
        }
    }

    /// Whether a category is selected.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }
}

impl State for Selection {
    type Message = SelectionMessage;

    fn update(&mut self, msg: Self::Message) -> Command {
        match msg {
            SelectionMessage::Click(key) => {
                let next = match self {
                    Self::Selected(current) if *current == key => Self::Unselected,
                    _ => Self::Selected(key),
                };
                tracing::debug!(from = ?self, to = ?next, "selection transition");
                *self = next;
                Command::Recompute
            }
            // The caller re-aggregates the new data itself.
            SelectionMessage::Reset => {
                *self = Self::Unselected;
                Command::None
            }
        }
    }
}
