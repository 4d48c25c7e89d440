//! Tile acceptance (ukeire) per discard candidate.
//!
//! For a 13-tile hand, a kind is accepted if drawing it lowers shanten, or,
//! at tenpai, if it completes the hand. Ukeire is the number of unseen copies
//! of accepted kinds.

use serde::{Deserialize, Serialize};
use tenpai_engine::agari::is_agari;
use tenpai_engine::errors::{RiichiError, RiichiResult};
use tenpai_engine::shanten::{validate_shanten_input, ShantenCache};
use tenpai_engine::tile::{Counts34, COPIES_PER_KIND, NUM_TILE_TYPES};
use tenpai_engine::types::max_concealed;

use crate::safety::SafetyTier;

/// Acceptance of one waiting hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acceptance {
    pub shanten: u8,
    /// Unseen copies across `tiles`.
    pub count: u32,
    /// Accepted kinds, ascending.
    pub tiles: Vec<u8>,
}

/// One possible discard and the hand it leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardCandidate {
    pub tile: u8,
    pub shanten: u8,
    pub ukeire: u32,
    pub accepted: Vec<u8>,
    /// Filled in when ranked against a threat.
    pub safety: Option<SafetyTier>,
}

/// Acceptance of a hand holding `13 - 3 * meld_count` tiles.
///
/// A hand that is already complete (`14 - 3 * meld_count` tiles forming a
/// win) accepts nothing.
pub fn ukeire(
    cache: &mut ShantenCache,
    hand: &Counts34,
    meld_count: u8,
    pool: &Counts34,
) -> RiichiResult<Acceptance> {
    validate_shanten_input(hand, meld_count)?;
    let total: usize = hand.iter().map(|&c| c as usize).sum();
    let full = max_concealed(meld_count);
    if total == full && is_agari(hand) {
        return Ok(Acceptance::default());
    }
    if total + 1 != full {
        return Err(RiichiError::MalformedHand {
            message: format!(
                "acceptance needs {} concealed tiles with {meld_count} melds, got {total}",
                full - 1
            ),
        });
    }

    let shanten = cache.shanten(hand, meld_count)?;
    let mut work = *hand;
    let mut out = Acceptance {
        shanten,
        ..Acceptance::default()
    };

    for kind in 0..NUM_TILE_TYPES {
        if pool[kind] == 0 || work[kind] >= COPIES_PER_KIND {
            continue;
        }
        work[kind] += 1;
        let accepted = if shanten == 0 {
            is_agari(&work)
        } else {
            cache.shanten(&work, meld_count)? < shanten
        };
        work[kind] -= 1;
        if accepted {
            out.tiles.push(kind as u8);
            out.count += u32::from(pool[kind]);
        }
    }
    Ok(out)
}

/// One candidate per distinct kind in a `14 - 3 * meld_count` tile hand,
/// in kind order.
pub fn evaluate_discards(
    cache: &mut ShantenCache,
    full_hand: &Counts34,
    meld_count: u8,
    pool: &Counts34,
) -> RiichiResult<Vec<DiscardCandidate>> {
    validate_shanten_input(full_hand, meld_count)?;
    let total: usize = full_hand.iter().map(|&c| c as usize).sum();
    if total != max_concealed(meld_count) {
        return Err(RiichiError::MalformedHand {
            message: format!(
                "discard evaluation needs {} concealed tiles with {meld_count} melds, got {total}",
                max_concealed(meld_count)
            ),
        });
    }

    let mut work = *full_hand;
    let mut out = Vec::new();
    for kind in 0..NUM_TILE_TYPES {
        if work[kind] == 0 {
            continue;
        }
        work[kind] -= 1;
        let acc = ukeire(cache, &work, meld_count, pool)?;
        work[kind] += 1;
        out.push(DiscardCandidate {
            tile: kind as u8,
            shanten: acc.shanten,
            ukeire: acc.count,
            accepted: acc.tiles,
            safety: None,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenpai_engine::parser::parse_hand;
    use tenpai_engine::tile::counts_from_tiles;

    fn counts(s: &str) -> Counts34 {
        let (tiles, _) = parse_hand(s).unwrap();
        counts_from_tiles(&tiles).unwrap()
    }

    /// Everything not in `hand` is unseen.
    fn pool_for(hand: &Counts34) -> Counts34 {
        std::array::from_fn(|k| COPIES_PER_KIND - hand[k])
    }

    #[test]
    fn tenpai_counts_winning_tiles() {
        let hand = counts("123m456m789m23p55s");
        let mut cache = ShantenCache::new();
        let acc = ukeire(&mut cache, &hand, 0, &pool_for(&hand)).unwrap();
        assert_eq!(acc.shanten, 0);
        assert_eq!(acc.tiles, vec![9, 12]);
        assert_eq!(acc.count, 8);
    }

    #[test]
    fn exhausted_wait_is_not_counted() {
        let hand = counts("123m456m789m23p55s");
        let mut pool = pool_for(&hand);
        pool[9] = 0; // every 1p is visible
        let acc = ukeire(&mut ShantenCache::new(), &hand, 0, &pool).unwrap();
        assert_eq!(acc.tiles, vec![12]);
        assert_eq!(acc.count, 4);
    }

    #[test]
    fn complete_hand_accepts_nothing() {
        let hand = counts("123m456m789m123p55s");
        let acc = ukeire(&mut ShantenCache::new(), &hand, 0, &pool_for(&hand)).unwrap();
        assert_eq!(acc, Acceptance::default());
    }

    #[test]
    fn iishanten_counts_improving_tiles() {
        // 123m 456m 78m 23p 55s 9s: 6m/9m and 1p/4p all improve.
        let hand = counts("123m456m78m23p559s");
        let mut cache = ShantenCache::new();
        let acc = ukeire(&mut cache, &hand, 0, &pool_for(&hand)).unwrap();
        assert_eq!(acc.shanten, 1);
        assert!(acc.tiles.contains(&5));
        assert!(acc.tiles.contains(&8));
        assert!(acc.tiles.contains(&9));
        assert!(acc.tiles.contains(&12));
        assert!(acc.count > 0);
    }

    #[test]
    fn wrong_size_is_rejected() {
        let hand = counts("123m456m");
        let err = ukeire(&mut ShantenCache::new(), &hand, 0, &pool_for(&hand));
        assert!(matches!(err, Err(RiichiError::MalformedHand { .. })));
        let err = evaluate_discards(&mut ShantenCache::new(), &hand, 0, &pool_for(&hand));
        assert!(err.is_err());
    }

    #[test]
    fn discards_cover_each_kind_once() {
        let hand = counts("123m456m789m23p559s");
        let cands =
            evaluate_discards(&mut ShantenCache::new(), &hand, 0, &pool_for(&hand)).unwrap();
        assert_eq!(cands.len(), 13);
        let nine_s = cands.iter().find(|c| c.tile == 26).unwrap();
        assert_eq!(nine_s.shanten, 0);
        assert_eq!(nine_s.ukeire, 8);
        let one_m = cands.iter().find(|c| c.tile == 0).unwrap();
        assert_eq!(one_m.shanten, 1);
    }
}
