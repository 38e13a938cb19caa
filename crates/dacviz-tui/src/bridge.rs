//! Bridge between controller notifications and TUI messages.

use crossbeam_channel::Sender;

use dacviz_core::observers::DemoNotification;
use dacviz_core::{DemoObserver, StateChange, SubDemoRequest};

use crate::messages::TuiMessage;

/// Observer that forwards every controller notification to the TUI channel.
///
/// Registered once on the root controller; nested demos share the root's
/// observer list, so changes at every depth arrive here.
pub struct TuiBridgeObserver {
    tx: Sender<TuiMessage>,
}

impl TuiBridgeObserver {
    #[must_use]
    pub fn new(tx: Sender<TuiMessage>) -> Self {
        Self { tx }
    }
}

impl DemoObserver for TuiBridgeObserver {
    fn on_state_change(&self, change: &StateChange) {
        let _ = self
            .tx
            .try_send(TuiMessage::Demo(DemoNotification::StateChanged(change.clone())));
    }

    fn on_sub_demo_opened(&self, request: &SubDemoRequest) {
        let _ = self.tx.try_send(TuiMessage::Demo(DemoNotification::SubDemoOpened {
            label: request.label.clone(),
            depth: request.depth,
        }));
    }
}
