//! # dacviz-core
//!
//! Step-through engine for recursive matrix multiplication. Builds an
//! immutable event timeline for the 8-product divide-and-conquer recursion
//! or Strassen's 7-product recursion, and plays it back behind per-slot
//! computation gates, opening nested demos for sub-products.

pub mod constants;
pub mod controller;
pub mod event;
pub mod gate;
pub mod labels;
pub mod matrix;
pub mod narration;
pub mod observer;
pub mod observers;
pub mod ops;
pub mod options;
pub mod registry;
pub mod strategy;
pub mod timeline;

// Re-exports
pub use constants::{
    exit_codes, DEFAULT_MAX_ENTRY, DEFAULT_SIZE, MAX_DEMO_SIZE, MAX_ENTRY, MIN_DEMO_SIZE,
};
pub use controller::{Navigation, PlaybackController, SubDemo};
pub use event::{Computation, Event, Operand, Placement, Slot, Term, TermKey, TermKind};
pub use gate::{ComputationState, GateOutcome, IgnoreReason, Resolution, Stage};
pub use matrix::{Matrix, MatrixError, Quadrant};
pub use observer::{DemoObserver, ObserverSubject, StateChange, SubDemoRequest};
pub use ops::{CellStep, Counted, OpCounts};
pub use options::Options;
pub use registry::{Algorithm, DefaultFactory, MultiplierFactory};
pub use strategy::Multiplier;
pub use timeline::Timeline;

/// Multiply two matrices with the chosen recursion.
///
/// # Example
/// ```
/// use dacviz_core::{multiply, Algorithm, Matrix};
///
/// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
/// let product = multiply(&a, &b, Algorithm::Strassen).unwrap();
/// assert_eq!(product.value.to_rows(), vec![vec![19, 22], vec![43, 50]]);
/// assert_eq!(product.counts.multiplications, 8);
/// ```
pub fn multiply(a: &Matrix, b: &Matrix, algorithm: Algorithm) -> Result<Counted<Matrix>, MatrixError> {
    algorithm.multiplier().multiply(a, b)
}
