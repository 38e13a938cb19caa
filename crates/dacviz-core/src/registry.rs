//! Algorithm selection and the multiplier factory.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::strategy::{Multiplier, NaiveRecursive, Schoolbook, Strassen};

/// The two animated recursions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// 8-product divide and conquer.
    Naive,
    /// 7-product Strassen recursion.
    Strassen,
}

impl Algorithm {
    /// Both algorithms, naive first.
    pub const ALL: [Algorithm; 2] = [Algorithm::Naive, Algorithm::Strassen];

    /// Registry key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Strassen => "strassen",
        }
    }

    /// Heading used by the hosts.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Algorithm::Naive => "Divide and Conquer",
            Algorithm::Strassen => "Strassen",
        }
    }

    /// Strategy that computes products the way this recursion does.
    #[must_use]
    pub fn multiplier(self) -> Arc<dyn Multiplier> {
        match self {
            Algorithm::Naive => Arc::new(NaiveRecursive::new()),
            Algorithm::Strassen => Arc::new(Strassen::new()),
        }
    }

    /// Number of slots in one level of the recursion.
    #[must_use]
    pub fn slot_count(self) -> usize {
        match self {
            Algorithm::Naive => 4,
            Algorithm::Strassen => 7,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for an unrecognized algorithm or multiplier name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm: {0}")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naive" | "dac" => Ok(Algorithm::Naive),
            "strassen" => Ok(Algorithm::Strassen),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Factory trait for looking up multipliers by name.
pub trait MultiplierFactory: Send + Sync {
    /// Get or create a multiplier by name.
    fn get(&self, name: &str) -> Result<Arc<dyn Multiplier>, UnknownAlgorithm>;

    /// List all available multiplier names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    cache: RwLock<HashMap<String, Arc<dyn Multiplier>>>,
}

impl DefaultFactory {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Multiplier for an animated algorithm.
    pub fn for_algorithm(&self, algorithm: Algorithm) -> Result<Arc<dyn Multiplier>, UnknownAlgorithm> {
        self.get(algorithm.key())
    }

    fn create(name: &str) -> Result<Arc<dyn Multiplier>, UnknownAlgorithm> {
        match name {
            "naive" => Ok(Arc::new(NaiveRecursive::new())),
            "strassen" => Ok(Arc::new(Strassen::new())),
            "schoolbook" => Ok(Arc::new(Schoolbook::new())),
            _ => Err(UnknownAlgorithm(name.to_string())),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiplierFactory for DefaultFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn Multiplier>, UnknownAlgorithm> {
        let key = match name {
            "dac" => "naive",
            other => other,
        };
        if let Some(m) = self.cache.read().get(key) {
            return Ok(Arc::clone(m));
        }

        let m = Self::create(key)?;
        self.cache.write().insert(key.to_string(), Arc::clone(&m));
        Ok(m)
    }

    fn available(&self) -> Vec<&str> {
        vec!["naive", "strassen", "schoolbook"]
    }
}
