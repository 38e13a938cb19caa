//! Observer pattern for playback state changes.
//!
//! The core never renders. Hosts register a [`DemoObserver`] and re-read the
//! controller whenever they are told something changed.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::Slot;
use crate::gate::{Resolution, Stage};
use crate::matrix::Matrix;
use crate::registry::Algorithm;

/// What changed. Observers may ignore the payload and just re-read state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// New inputs were generated and the timeline rebuilt.
    Generated { depth: usize, size: usize },
    /// The cursor moved.
    Moved { depth: usize, cursor: usize },
    /// A stage of a slot received a value.
    Resolved {
        depth: usize,
        slot: Slot,
        stage: Stage,
        resolution: Resolution,
    },
    /// A nested demo was closed and its value handed to the parent.
    SubDemoClosed {
        depth: usize,
        slot: Slot,
        resolution: Resolution,
    },
}

impl StateChange {
    /// Nesting depth of the controller that changed.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            StateChange::Generated { depth, .. }
            | StateChange::Moved { depth, .. }
            | StateChange::Resolved { depth, .. }
            | StateChange::SubDemoClosed { depth, .. } => *depth,
        }
    }
}

/// Operands and context of a nested demo being opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDemoRequest {
    /// Description of the product being expanded, e.g. `A11 × B11`.
    pub label: String,
    pub left_label: String,
    pub right_label: String,
    pub left: Matrix,
    pub right: Matrix,
    /// Depth of the new demo; the top level is 0.
    pub depth: usize,
    pub algorithm: Algorithm,
    pub slot: Slot,
}

/// Observer trait for receiving playback notifications.
pub trait DemoObserver: Send + Sync {
    /// Gate or cursor state changed.
    fn on_state_change(&self, change: &StateChange);

    /// A nested demo was opened. Its result comes back through the parent's
    /// `close_sub_demo`.
    fn on_sub_demo_opened(&self, _request: &SubDemoRequest) {}
}

/// Subject that manages a collection of observers.
///
/// Shared between a controller and every nested demo it opens.
pub struct ObserverSubject {
    observers: RwLock<Vec<Arc<dyn DemoObserver>>>,
}

impl ObserverSubject {
    /// Create a new subject with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer.
    pub fn register(&self, observer: Arc<dyn DemoObserver>) {
        self.observers.write().push(observer);
    }

    /// Unregister all observers.
    pub fn clear(&self) {
        self.observers.write().clear();
    }

    /// Notify all observers of a state change.
    pub fn notify(&self, change: &StateChange) {
        for observer in self.observers.read().iter() {
            observer.on_state_change(change);
        }
    }

    /// Notify all observers that a nested demo opened.
    pub fn notify_sub_demo(&self, request: &SubDemoRequest) {
        for observer in self.observers.read().iter() {
            observer.on_sub_demo_opened(request);
        }
    }

    /// Get the number of registered observers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.observers.read().len()
    }
}

impl Default for ObserverSubject {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        changes: Mutex<Vec<StateChange>>,
        opened: Mutex<Vec<String>>,
    }

    impl DemoObserver for Recorder {
        fn on_state_change(&self, change: &StateChange) {
            self.changes.lock().push(change.clone());
        }

        fn on_sub_demo_opened(&self, request: &SubDemoRequest) {
            self.opened.lock().push(request.label.clone());
        }
    }

    #[test]
    fn subject_register_and_count() {
        let subject = ObserverSubject::new();
        assert_eq!(subject.count(), 0);
        subject.register(Arc::new(Recorder::default()));
        assert_eq!(subject.count(), 1);
        subject.clear();
        assert_eq!(subject.count(), 0);
    }

    #[test]
    fn subject_fans_out() {
        let subject = ObserverSubject::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        subject.register(first.clone());
        subject.register(second.clone());

        subject.notify(&StateChange::Moved {
            depth: 0,
            cursor: 2,
        });
        subject.notify_sub_demo(&SubDemoRequest {
            label: "A11 × B11".into(),
            left_label: "A11".into(),
            right_label: "B11".into(),
            left: Matrix::zeros(4),
            right: Matrix::zeros(4),
            depth: 1,
            algorithm: Algorithm::Naive,
            slot: Slot::C11,
        });

        for r in [&first, &second] {
            assert_eq!(r.changes.lock().len(), 1);
            assert_eq!(r.opened.lock().as_slice(), ["A11 × B11".to_string()]);
        }
    }

    #[test]
    fn change_depth() {
        let change = StateChange::SubDemoClosed {
            depth: 2,
            slot: Slot::M4,
            resolution: Resolution::Fallback,
        };
        assert_eq!(change.depth(), 2);
    }
}
