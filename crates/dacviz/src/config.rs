//! Application configuration from CLI flags and environment.

use clap::Parser;

use dacviz_cli::AutoplayPolicy;
use dacviz_core::{
    Algorithm, Options, DEFAULT_MAX_ENTRY, DEFAULT_SIZE, MAX_DEMO_SIZE, MAX_ENTRY, MIN_DEMO_SIZE,
};

use crate::errors::DemoError;

/// dacviz: step through divide-and-conquer and Strassen matrix multiplication.
#[derive(Parser, Debug)]
#[command(name = "dacviz", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Matrix size, a power of two from 2 to 64.
    #[arg(short = 'n', long, default_value_t = DEFAULT_SIZE, env = "DACVIZ_SIZE")]
    pub size: usize,

    /// Algorithm to use: naive (or dac), strassen, or all.
    #[arg(long, default_value = "naive")]
    pub algo: String,

    /// Seed for the random inputs.
    #[arg(long, env = "DACVIZ_SEED")]
    pub seed: Option<u64>,

    /// Random entries are drawn from 0 up to this bound (exclusive, at most 1000000).
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRY)]
    pub max_entry: i64,

    /// Launch interactive TUI.
    #[arg(long)]
    pub tui: bool,

    /// Play every step, resolving each computation on the way.
    #[arg(long)]
    pub autoplay: bool,

    /// During autoplay, open nested demos for large products down to this depth.
    #[arg(long, default_value_t = 0)]
    pub depth: usize,

    /// Print the event timeline as JSON.
    #[arg(long)]
    pub json: bool,

    /// Output file path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compare every multiplier on the same inputs.
    #[arg(long)]
    pub compare: bool,

    /// Quiet mode (only output the product).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Let Strassen products be committed in any order.
    #[arg(long)]
    pub no_sequential: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Reject sizes and bounds the demo cannot show.
    pub fn validate(&self) -> Result<(), DemoError> {
        if !self.size.is_power_of_two() || !(MIN_DEMO_SIZE..=MAX_DEMO_SIZE).contains(&self.size) {
            return Err(DemoError::Config(format!(
                "size must be a power of two between {MIN_DEMO_SIZE} and {MAX_DEMO_SIZE}, got {}",
                self.size
            )));
        }
        if self.max_entry <= 0 || self.max_entry > MAX_ENTRY {
            return Err(DemoError::Config(format!(
                "max-entry must be between 1 and {MAX_ENTRY}, got {}",
                self.max_entry
            )));
        }
        Ok(())
    }

    /// Algorithms selected by `--algo`.
    pub fn algorithms(&self) -> Result<Vec<Algorithm>, DemoError> {
        if self.algo.eq_ignore_ascii_case("all") {
            return Ok(Algorithm::ALL.to_vec());
        }
        self.algo
            .parse::<Algorithm>()
            .map(|alg| vec![alg])
            .map_err(|e| DemoError::Config(e.to_string()))
    }

    /// Demo options for one algorithm.
    #[must_use]
    pub fn options(&self, algorithm: Algorithm) -> Options {
        Options {
            algorithm,
            size: self.size,
            max_entry: self.max_entry,
            sequential: !self.no_sequential,
            seed: self.seed,
        }
    }

    /// Autoplay policy: breakdowns are shown only when verbose.
    #[must_use]
    pub fn policy(&self) -> AutoplayPolicy {
        AutoplayPolicy {
            breakdowns: self.verbose,
            max_depth: self.depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> AppConfig {
        let mut argv = vec!["dacviz"];
        argv.extend_from_slice(args);
        AppConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let c = config(&["--size", "4"]);
        assert_eq!(c.algo, "naive");
        assert_eq!(c.max_entry, DEFAULT_MAX_ENTRY);
        assert!(c.validate().is_ok());
        assert_eq!(c.algorithms().unwrap(), vec![Algorithm::Naive]);
        assert!(c.options(Algorithm::Strassen).sequential_gating());
    }

    #[test]
    fn algorithm_selection() {
        assert_eq!(
            config(&["--algo", "dac"]).algorithms().unwrap(),
            vec![Algorithm::Naive]
        );
        assert_eq!(
            config(&["--algo", "ALL"]).algorithms().unwrap(),
            Algorithm::ALL.to_vec()
        );
        assert!(matches!(
            config(&["--algo", "winograd"]).algorithms(),
            Err(DemoError::Config(_))
        ));
    }

    #[test]
    fn size_validation() {
        assert!(config(&["-n", "8"]).validate().is_ok());
        assert!(config(&["-n", "6"]).validate().is_err());
        assert!(config(&["-n", "1"]).validate().is_err());
        assert!(config(&["-n", "128"]).validate().is_err());
        assert!(config(&["-n", "4", "--max-entry", "0"]).validate().is_err());
        assert!(config(&["-n", "64", "--max-entry", "1000000"]).validate().is_ok());
        assert!(config(&["--max-entry", "1000001"]).validate().is_err());
        assert!(config(&["--max-entry", "9223372036854775807", "--seed", "1"])
            .validate()
            .is_err());
    }

    #[test]
    fn options_and_policy() {
        let c = config(&["-n", "8", "--seed", "3", "--no-sequential", "-v", "--depth", "2"]);
        let options = c.options(Algorithm::Strassen);
        assert_eq!(options.size, 8);
        assert_eq!(options.seed, Some(3));
        assert!(!options.sequential_gating());
        assert_eq!(c.policy(), AutoplayPolicy::expanded(2));
    }
}
