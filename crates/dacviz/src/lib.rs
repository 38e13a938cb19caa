//! dacviz library: application logic for the matrix multiplication visualizer.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
