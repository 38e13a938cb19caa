//! Demo options and configuration.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::constants::{DEFAULT_MAX_ENTRY, DEFAULT_SIZE, MAX_ENTRY, MIN_DEMO_SIZE};
use crate::registry::Algorithm;

/// Options for building and playing a demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Recursion to animate.
    pub algorithm: Algorithm,
    /// Size of generated inputs (0 = default).
    pub size: usize,
    /// Generated entries are drawn from `0..max_entry` (0 = default, capped
    /// at [`MAX_ENTRY`]).
    pub max_entry: i64,
    /// Commit Strassen products strictly in order. Ignored for naive.
    pub sequential: bool,
    /// Seed for generated inputs; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Naive,
            size: DEFAULT_SIZE,
            max_entry: DEFAULT_MAX_ENTRY,
            sequential: true,
            seed: None,
        }
    }
}

impl Options {
    /// Options for `algorithm` with everything else at its default.
    #[must_use]
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Normalize options, applying defaults where values are zero or invalid.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.size < MIN_DEMO_SIZE || !self.size.is_power_of_two() {
            self.size = DEFAULT_SIZE;
        }
        if self.max_entry <= 0 {
            self.max_entry = DEFAULT_MAX_ENTRY;
        }
        self.max_entry = self.max_entry.min(MAX_ENTRY);
        self
    }

    /// Whether sequential gating applies to the chosen algorithm.
    #[must_use]
    pub fn sequential_gating(&self) -> bool {
        self.sequential && self.algorithm == Algorithm::Strassen
    }

    /// Random source for generated inputs.
    #[must_use]
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }
}
