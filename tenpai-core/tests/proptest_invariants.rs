//! Property-based invariant tests for shanten, scoring and acceptance.
//!
//! Winning hands are generated as four sets plus a pair; random hands come
//! from the seeded dealer.

use proptest::prelude::*;
use tenpai_core::seeding::random_hands;
use tenpai_core::ukeire::ukeire;
use tenpai_engine::agari::{enumerate_winning_shapes, waits, HandShape};
use tenpai_engine::hand_evaluator::score;
use tenpai_engine::rule::GameRule;
use tenpai_engine::shanten::{max_standard_shanten, shanten, ShantenCache};
use tenpai_engine::tile::{
    is_sequence_start, permute_counts, Counts34, Tile, ALL_PERMUTATIONS,
    NUM_TILE_TYPES,
};
use tenpai_engine::types::Conditions;

/// Four sets and a pair; sequences only where a run can start.
fn winning_hand() -> impl Strategy<Value = Counts34> {
    (
        prop::collection::vec((0u8..34, any::<bool>()), 4),
        0u8..34,
    )
        .prop_filter_map("more than four copies", |(sets, pair)| {
            let mut c = [0u8; NUM_TILE_TYPES];
            for (k, seq) in sets {
                let k = k as usize;
                if seq && is_sequence_start(k as u8) {
                    c[k] += 1;
                    c[k + 1] += 1;
                    c[k + 2] += 1;
                } else {
                    c[k] += 3;
                }
            }
            c[pair as usize] += 2;
            c.iter().all(|&x| x <= 4).then_some(c)
        })
}

fn tiles_of(counts: &Counts34) -> Vec<Tile> {
    (0..NUM_TILE_TYPES as u8)
        .flat_map(|k| std::iter::repeat(k).take(counts[k as usize] as usize))
        .map(|k| Tile::from_index(k).unwrap())
        .collect()
}

fn full_pool(hand: &Counts34) -> Counts34 {
    std::array::from_fn(|k| 4 - hand[k])
}

// ---------------------------------------------------------------------------
// Property-based tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Complete hands report shanten 0 (raw -1) and every tile removed from
    /// them leaves a tenpai hand that waits on it.
    #[test]
    fn winning_hands_are_tenpai_minus_any_tile(hand in winning_hand()) {
        prop_assert_eq!(shanten(&hand, 0).unwrap(), 0);
        prop_assert_eq!(ShantenCache::new().shanten_raw(&hand, 0).unwrap(), -1);

        for k in 0..NUM_TILE_TYPES {
            if hand[k] == 0 {
                continue;
            }
            let mut h13 = hand;
            h13[k] -= 1;
            prop_assert_eq!(shanten(&h13, 0).unwrap(), 0, "kind {}", k);
            prop_assert!(waits(&h13).contains(&(k as u8)), "kind {} not a wait", k);

            let win = Tile::from_index(k as u8).unwrap();
            let shapes = enumerate_winning_shapes(&tiles_of(&h13), &[], win).unwrap();
            prop_assert!(!shapes.is_empty());
        }
    }

    /// Scoring the same win twice gives the same result; a closed tsumo
    /// always has a yaku.
    #[test]
    fn scoring_is_idempotent(hand in winning_hand(), pick in 0usize..14) {
        let tiles = tiles_of(&hand);
        let win = tiles[pick];
        let cond = Conditions { tsumo: true, ..Conditions::default() };
        let rule = GameRule::default();
        let a = score(&tiles, &[], win, &cond, &rule).unwrap();
        let b = score(&tiles, &[], win, &cond, &rule).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert!(a.is_win);
        prop_assert!(a.score.total > 0);
        if let Some(HandShape::SevenPairs { .. }) = a.shape {
            prop_assert_eq!(a.fu, 25);
        }
    }

    /// A tenpai hand accepts exactly its waits, counted through the win check.
    #[test]
    fn tenpai_ukeire_matches_waits(hand in winning_hand(), pick in 0usize..14) {
        let tiles = tiles_of(&hand);
        let mut h13 = hand;
        h13[tiles[pick].index()] -= 1;
        let pool = full_pool(&h13);
        let acc = ukeire(&mut ShantenCache::new(), &h13, 0, &pool).unwrap();
        let w = waits(&h13);
        prop_assert_eq!(acc.shanten, 0);
        prop_assert_eq!(&acc.tiles, &w);
        let expected: u32 = w.iter().map(|&k| u32::from(pool[k as usize])).sum();
        prop_assert_eq!(acc.count, expected);

        let done = ukeire(&mut ShantenCache::new(), &hand, 0, &full_pool(&hand)).unwrap();
        prop_assert_eq!(done.count, 0);
    }

    /// Shanten stays within bounds and a tiny cache agrees with fresh calls.
    #[test]
    fn shanten_bounds_and_cache(seed in 0u64..10_000, size in prop::sample::select(vec![1usize, 4, 7, 10, 13, 14])) {
        let mut cache = ShantenCache::with_capacity(4);
        for hand in random_hands(seed, 8, size) {
            let fresh = shanten(&hand, 0).unwrap();
            prop_assert!(i16::from(fresh) <= i16::from(max_standard_shanten(0)));
            prop_assert_eq!(cache.shanten(&hand, 0).unwrap(), fresh);
            prop_assert_eq!(cache.shanten(&hand, 0).unwrap(), fresh);
        }
        prop_assert!(cache.len() <= 4);
    }

    /// Relabelling the suits changes neither shanten nor acceptance count.
    #[test]
    fn suit_permutation_invariance(seed in 0u64..10_000, perm in 0usize..6) {
        let perm = &ALL_PERMUTATIONS[perm];
        let mut cache = ShantenCache::new();
        for hand in random_hands(seed, 4, 13) {
            let moved = permute_counts(&hand, perm);
            prop_assert_eq!(cache.shanten(&hand, 0).unwrap(), cache.shanten(&moved, 0).unwrap());
            let a = ukeire(&mut cache, &hand, 0, &full_pool(&hand)).unwrap();
            let b = ukeire(&mut cache, &moved, 0, &full_pool(&moved)).unwrap();
            prop_assert_eq!(a.count, b.count);
        }
    }
}

