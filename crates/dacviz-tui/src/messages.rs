//! TUI message types (Elm Messages).

use dacviz_core::observers::DemoNotification;

use crate::keymap::KeyAction;

/// Messages that drive the TUI update cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum TuiMessage {
    /// Notification forwarded from the controller tree.
    Demo(DemoNotification),
    /// Log message.
    Log(String),
    /// Key press event forwarded from the event loop.
    KeyPress(KeyAction),
    /// Terminal resize event.
    Resize { width: u16, height: u16 },
    /// Tick event for periodic redraws.
    Tick,
    /// Error message.
    Error(String),
    /// Quit the application.
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dacviz_core::StateChange;

    #[test]
    fn message_variants() {
        let msg = TuiMessage::Demo(DemoNotification::StateChanged(StateChange::Moved {
            depth: 0,
            cursor: 2,
        }));
        assert!(matches!(msg, TuiMessage::Demo(_)));

        let msg = TuiMessage::Resize {
            width: 80,
            height: 24,
        };
        assert!(matches!(msg, TuiMessage::Resize { .. }));

        let msg = TuiMessage::KeyPress(KeyAction::Next);
        assert_eq!(msg, TuiMessage::KeyPress(KeyAction::Next));

        let msg = TuiMessage::Error("test error".to_string());
        assert!(matches!(msg, TuiMessage::Error(_)));
    }
}
