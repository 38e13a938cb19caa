//! Errors raised by the text front end.

use std::io;

use dacviz_core::registry::UnknownAlgorithm;
use dacviz_core::MatrixError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Algorithm(#[from] UnknownAlgorithm),

    #[error("output error: {0}")]
    Io(#[from] io::Error),

    /// Autoplay could neither resolve the gate nor move past it.
    #[error("playback stuck at event {cursor} (depth {depth})")]
    Stuck { depth: usize, cursor: usize },
}
