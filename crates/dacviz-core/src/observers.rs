//! Concrete observer implementations.

use crossbeam_channel::Sender;
use tracing::{debug, info};

use crate::observer::{DemoObserver, StateChange, SubDemoRequest};

/// Message forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoNotification {
    StateChanged(StateChange),
    SubDemoOpened {
        label: String,
        depth: usize,
    },
}

/// Observer that sends notifications through a channel (non-blocking).
pub struct ChannelObserver {
    sender: Sender<DemoNotification>,
}

impl ChannelObserver {
    /// Create a new channel observer.
    #[must_use]
    pub fn new(sender: Sender<DemoNotification>) -> Self {
        Self { sender }
    }
}

impl DemoObserver for ChannelObserver {
    fn on_state_change(&self, change: &StateChange) {
        // A full or disconnected channel only drops a redraw hint.
        let _ = self
            .sender
            .try_send(DemoNotification::StateChanged(change.clone()));
    }

    fn on_sub_demo_opened(&self, request: &SubDemoRequest) {
        let _ = self.sender.try_send(DemoNotification::SubDemoOpened {
            label: request.label.clone(),
            depth: request.depth,
        });
    }
}

/// Observer that logs every notification through `tracing`.
pub struct LoggingObserver;

impl LoggingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoObserver for LoggingObserver {
    fn on_state_change(&self, change: &StateChange) {
        match change {
            StateChange::Generated { depth, size } => {
                info!(depth, size, "Demo generated");
            }
            StateChange::Moved { depth, cursor } => {
                debug!(depth, cursor, "Cursor moved");
            }
            StateChange::Resolved {
                depth,
                slot,
                stage,
                resolution,
            } => {
                debug!(
                    depth,
                    slot = %slot,
                    stage = stage.name(),
                    resolution = resolution.name(),
                    "Stage resolved"
                );
            }
            StateChange::SubDemoClosed {
                depth,
                slot,
                resolution,
            } => {
                info!(
                    depth,
                    slot = %slot,
                    resolution = resolution.name(),
                    "Nested demo closed"
                );
            }
        }
    }

    fn on_sub_demo_opened(&self, request: &SubDemoRequest) {
        info!(
            depth = request.depth,
            label = %request.label,
            size = request.left.size(),
            "Nested demo opened"
        );
    }
}

/// Null object pattern: discards every notification.
pub struct NoOpObserver;

impl NoOpObserver {
    /// Create a new no-op observer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoObserver for NoOpObserver {
    fn on_state_change(&self, _change: &StateChange) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Slot;
    use crate::matrix::Matrix;
    use crate::registry::Algorithm;

    fn moved() -> StateChange {
        StateChange::Moved {
            depth: 0,
            cursor: 1,
        }
    }

    #[test]
    fn noop_observer_does_nothing() {
        let observer = NoOpObserver::new();
        observer.on_state_change(&moved());
    }

    #[test]
    fn logging_observer_does_not_panic() {
        let observer = LoggingObserver::new();
        observer.on_state_change(&moved());
        observer.on_state_change(&StateChange::Generated { depth: 0, size: 4 });
    }

    #[test]
    fn channel_observer_sends() {
        let (tx, rx) = crossbeam_channel::bounded(10);
        let observer = ChannelObserver::new(tx);

        observer.on_state_change(&moved());
        observer.on_sub_demo_opened(&SubDemoRequest {
            label: "A12 × B21".into(),
            left_label: "A12".into(),
            right_label: "B21".into(),
            left: Matrix::zeros(4),
            right: Matrix::zeros(4),
            depth: 1,
            algorithm: Algorithm::Naive,
            slot: Slot::C11,
        });

        assert_eq!(rx.try_recv().unwrap(), DemoNotification::StateChanged(moved()));
        assert_eq!(
            rx.try_recv().unwrap(),
            DemoNotification::SubDemoOpened {
                label: "A12 × B21".into(),
                depth: 1
            }
        );
    }

    #[test]
    fn channel_observer_full_channel_drops() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let observer = ChannelObserver::new(tx);
        observer.on_state_change(&moved());
        observer.on_state_change(&moved());
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn channel_observer_disconnected_receiver() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let observer = ChannelObserver::new(tx);
        observer.on_state_change(&moved());
    }
}
