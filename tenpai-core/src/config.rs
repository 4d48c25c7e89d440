//! Evaluator configuration.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tenpai_engine::shanten::ShantenCache;

/// Tunables for discard evaluation and batch runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Fold only when our shanten is at least this.
    pub fold_min_shanten: u8,
    /// Fold only when the hand holds at most this many dora.
    pub fold_max_dora: u32,
    /// Entries per shanten cache before it is cleared.
    pub cache_capacity: usize,
    /// Threads in the batch pool. None = rayon default (num CPUs).
    pub num_threads: Option<usize>,
    /// Base seed for generated workloads.
    pub base_seed: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            fold_min_shanten: 2,
            fold_max_dora: 1,
            cache_capacity: ShantenCache::DEFAULT_CAPACITY,
            num_threads: None,
            base_seed: 0,
        }
    }
}

impl EvaluatorConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid evaluator config")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn new_cache(&self) -> ShantenCache {
        ShantenCache::with_capacity(self.cache_capacity)
    }
}
