//! Parallel discard ranking with rayon.
//!
//! Ranks many hands on a dedicated rayon ThreadPool. Each worker owns its
//! own [`ShantenCache`] via `map_init`; nothing mutable is shared.

use rayon::prelude::*;
use tenpai_engine::errors::RiichiResult;
use tenpai_engine::shanten::ShantenCache;
use tenpai_engine::tile::{Counts34, COPIES_PER_KIND};

use crate::config::EvaluatorConfig;
use crate::policy::{rank_discards_with, PushPolicy};
use crate::seeding::random_hands;
use crate::ukeire::DiscardCandidate;

/// One hand to rank: concealed tiles, fixed meld count and unseen pool.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub hand: Counts34,
    pub meld_count: u8,
    pub pool: Counts34,
}

impl BatchItem {
    /// A closed hand whose pool is every copy not in the hand.
    pub fn closed(hand: Counts34) -> Self {
        let pool = std::array::from_fn(|k| COPIES_PER_KIND.saturating_sub(hand[k]));
        Self {
            hand,
            meld_count: 0,
            pool,
        }
    }
}

/// Parallel batch evaluator using a dedicated rayon ThreadPool.
pub struct BatchEvaluator {
    pool: rayon::ThreadPool,
    cache_capacity: usize,
}

impl BatchEvaluator {
    pub fn new(config: &EvaluatorConfig) -> anyhow::Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = config.num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;
        Ok(Self {
            pool,
            cache_capacity: config.cache_capacity,
        })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Push-ranks every item. Results keep input order.
    pub fn rank_all(&self, items: &[BatchItem]) -> Vec<RiichiResult<Vec<DiscardCandidate>>> {
        log::debug!(
            "ranking {} hands on {} threads",
            items.len(),
            self.num_threads()
        );
        let capacity = self.cache_capacity;
        self.pool.install(|| {
            items
                .par_iter()
                .map_init(
                    || ShantenCache::with_capacity(capacity),
                    |cache, item| {
                        rank_discards_with(
                            cache,
                            &item.hand,
                            item.meld_count,
                            &item.pool,
                            None,
                            &PushPolicy,
                        )
                    },
                )
                .collect()
        })
    }
}

/// Closed 14-tile hands for benchmarks, reproducible from `config.base_seed`.
pub fn random_workload(config: &EvaluatorConfig, count: usize) -> Vec<BatchItem> {
    random_hands(config.base_seed, count, 14)
        .into_iter()
        .map(BatchItem::closed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::rank_discards;
    use crate::policy::DiscardMode;

    #[test]
    fn batch_matches_sequential() {
        let config = EvaluatorConfig {
            num_threads: Some(2),
            base_seed: 11,
            ..EvaluatorConfig::default()
        };
        let items = random_workload(&config, 16);
        let evaluator = BatchEvaluator::new(&config).unwrap();
        assert_eq!(evaluator.num_threads(), 2);

        let parallel = evaluator.rank_all(&items);
        assert_eq!(parallel.len(), items.len());
        for (item, got) in items.iter().zip(parallel) {
            let expected =
                rank_discards(&item.hand, item.meld_count, &item.pool, DiscardMode::Push).unwrap();
            assert_eq!(got.unwrap(), expected);
        }
    }

    #[test]
    fn bad_item_reports_error_without_failing_batch() {
        let mut bad = [0u8; 34];
        bad[0] = 5;
        let items = vec![
            BatchItem::closed(bad),
            random_workload(&EvaluatorConfig::default(), 1).remove(0),
        ];
        let evaluator = BatchEvaluator::new(&EvaluatorConfig::default()).unwrap();
        let results = evaluator.rank_all(&items);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }
}
