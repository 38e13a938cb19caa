//! Constants for demo sizing, recursion base cases and exit codes.

/// Default matrix size for a generated demo.
pub const DEFAULT_SIZE: usize = 4;

/// Smallest matrix size a timeline can be built for.
pub const MIN_DEMO_SIZE: usize = 2;

/// Largest matrix size the hosts will generate.
///
/// The engine itself has no limit; beyond this the rendered matrices stop
/// fitting on a terminal.
pub const MAX_DEMO_SIZE: usize = 64;

/// Random entries are drawn from `0..DEFAULT_MAX_ENTRY`.
pub const DEFAULT_MAX_ENTRY: i64 = 10;

/// Upper bound for generated entries.
///
/// Strassen's sums double entry magnitudes at each of the six levels of a
/// `MAX_DEMO_SIZE` demo; products of such sums, accumulated over a row,
/// must still fit in `i64`.
pub const MAX_ENTRY: i64 = 1_000_000;

/// Block size at which both recursions stop and multiply directly.
///
/// Operands of this size get a step-by-step breakdown instead of a nested demo.
pub const BASE_CASE_SIZE: usize = 2;

/// Name given to the left input of a top-level demo.
pub const LEFT_NAME: &str = "A";

/// Name given to the right input of a top-level demo.
pub const RIGHT_NAME: &str = "B";

/// Exit codes for the command-line host.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Two algorithms disagreed on a product.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// Interrupted by the user (Ctrl+C).
    pub const ERROR_INTERRUPTED: i32 = 130;
}
