//! Discard ranking policies.
//!
//! A [`DiscardPolicy`] orders [`DiscardCandidate`]s, best first. The push
//! policy plays for speed; the fold policy plays for safety against riichi.
//! [`rank_discards`] wires the two to a [`DiscardMode`].

use std::cmp::Ordering;

use tenpai_engine::errors::RiichiResult;
use tenpai_engine::shanten::ShantenCache;
use tenpai_engine::tile::Counts34;

use crate::config::EvaluatorConfig;
use crate::safety::{SafetyInfo, SafetyTier};
use crate::ukeire::{evaluate_discards, DiscardCandidate};

/// Trait for discard ordering policies.
/// Implemented by the built-in push/fold policies; tests and callers can
/// substitute their own.
pub trait DiscardPolicy {
    /// `Less` means `a` is the better discard.
    fn compare(&self, a: &DiscardCandidate, b: &DiscardCandidate) -> Ordering;

    /// Sorts candidates best first. Stable, so equal candidates keep kind order.
    fn rank(&self, mut candidates: Vec<DiscardCandidate>) -> Vec<DiscardCandidate> {
        candidates.sort_by(|a, b| self.compare(a, b));
        candidates
    }
}

/// Lowest shanten, then widest acceptance.
pub struct PushPolicy;

impl DiscardPolicy for PushPolicy {
    fn compare(&self, a: &DiscardCandidate, b: &DiscardCandidate) -> Ordering {
        a.shanten
            .cmp(&b.shanten)
            .then_with(|| b.ukeire.cmp(&a.ukeire))
    }
}

/// Safest tier first, then the push order.
pub struct FoldPolicy;

impl DiscardPolicy for FoldPolicy {
    fn compare(&self, a: &DiscardCandidate, b: &DiscardCandidate) -> Ordering {
        let tier = |c: &DiscardCandidate| c.safety.unwrap_or(SafetyTier::Other);
        tier(a)
            .cmp(&tier(b))
            .then_with(|| PushPolicy.compare(a, b))
    }
}

/// How to rank discards.
#[derive(Debug, Clone, Copy)]
pub enum DiscardMode<'a> {
    Push,
    /// Defend using what is known about the table.
    Fold(&'a SafetyInfo),
}

impl DiscardMode<'_> {
    pub fn is_fold(&self) -> bool {
        matches!(self, DiscardMode::Fold(_))
    }
}

/// Candidates for every distinct kind in `full_hand`, best first.
pub fn rank_discards(
    full_hand: &Counts34,
    meld_count: u8,
    pool: &Counts34,
    mode: DiscardMode<'_>,
) -> RiichiResult<Vec<DiscardCandidate>> {
    let mut cache = ShantenCache::new();
    match mode {
        DiscardMode::Push => {
            rank_discards_with(&mut cache, full_hand, meld_count, pool, None, &PushPolicy)
        }
        DiscardMode::Fold(safety) => rank_discards_with(
            &mut cache,
            full_hand,
            meld_count,
            pool,
            Some(safety),
            &FoldPolicy,
        ),
    }
}

/// [`rank_discards`] with a caller-owned cache and an arbitrary policy.
/// Safety tiers are attached when `safety` is given.
pub fn rank_discards_with<P: DiscardPolicy + ?Sized>(
    cache: &mut ShantenCache,
    full_hand: &Counts34,
    meld_count: u8,
    pool: &Counts34,
    safety: Option<&SafetyInfo>,
    policy: &P,
) -> RiichiResult<Vec<DiscardCandidate>> {
    let mut candidates = evaluate_discards(cache, full_hand, meld_count, pool)?;
    if let Some(safety) = safety {
        for c in &mut candidates {
            c.safety = Some(safety.tier(c.tile));
        }
    }
    Ok(policy.rank(candidates))
}

/// Fold when an opponent is in riichi and the hand is both slow (shanten at
/// or above the threshold) and cheap (dora at or below the threshold).
pub fn select_mode<'a>(
    safety: &'a SafetyInfo,
    shanten: u8,
    dora: u32,
    config: &EvaluatorConfig,
) -> DiscardMode<'a> {
    if safety.any_riichi() && shanten >= config.fold_min_shanten && dora <= config.fold_max_dora {
        log::debug!("folding: shanten {shanten}, dora {dora} against riichi");
        DiscardMode::Fold(safety)
    } else {
        DiscardMode::Push
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(tile: u8, shanten: u8, ukeire: u32, safety: Option<SafetyTier>) -> DiscardCandidate {
        DiscardCandidate {
            tile,
            shanten,
            ukeire,
            accepted: Vec::new(),
            safety,
        }
    }

    #[test]
    fn push_prefers_shanten_then_ukeire() {
        let ranked = PushPolicy.rank(vec![
            cand(0, 2, 40, None),
            cand(1, 1, 10, None),
            cand(2, 1, 20, None),
        ]);
        let order: Vec<u8> = ranked.iter().map(|c| c.tile).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn fold_prefers_safety() {
        let ranked = FoldPolicy.rank(vec![
            cand(0, 1, 20, Some(SafetyTier::Other)),
            cand(1, 3, 0, Some(SafetyTier::Genbutsu)),
            cand(2, 2, 10, Some(SafetyTier::Suji)),
            cand(3, 2, 12, Some(SafetyTier::Suji)),
        ]);
        let order: Vec<u8> = ranked.iter().map(|c| c.tile).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }

    #[test]
    fn mode_selection() {
        let cfg = EvaluatorConfig::default();
        let mut safety = SafetyInfo::new();
        assert!(!select_mode(&safety, 4, 0, &cfg).is_fold());
        safety.on_riichi(1);
        assert!(select_mode(&safety, 2, 1, &cfg).is_fold());
        assert!(!select_mode(&safety, 1, 0, &cfg).is_fold());
        assert!(!select_mode(&safety, 3, 2, &cfg).is_fold());
    }
}
