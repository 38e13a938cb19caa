//! Error handling and exit codes.

use dacviz_core::constants::exit_codes;
use dacviz_core::registry::UnknownAlgorithm;

/// Errors raised by the application layer.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("multipliers disagree on the product")]
    Mismatch,

    #[error("interrupted")]
    Interrupted,
}

/// Exit code for an application error.
pub fn handle_error(err: &DemoError) -> i32 {
    match err {
        DemoError::Config(_) => exit_codes::ERROR_CONFIG,
        DemoError::Mismatch => exit_codes::ERROR_MISMATCH,
        DemoError::Interrupted => exit_codes::ERROR_INTERRUPTED,
    }
}

/// Exit code for any error that reached `main`.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(demo) = err.downcast_ref::<DemoError>() {
        return handle_error(demo);
    }
    if err.downcast_ref::<UnknownAlgorithm>().is_some() {
        return exit_codes::ERROR_CONFIG;
    }
    exit_codes::ERROR_GENERIC
}
