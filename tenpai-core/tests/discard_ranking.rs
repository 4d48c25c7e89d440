//! End-to-end discard ranking: push for speed, fold against riichi, and
//! custom policies through the trait.

use std::cmp::Ordering;

use tenpai_core::config::EvaluatorConfig;
use tenpai_core::policy::{
    rank_discards, rank_discards_with, select_mode, DiscardMode, DiscardPolicy,
};
use tenpai_core::safety::{SafetyInfo, SafetyTier};
use tenpai_core::ukeire::DiscardCandidate;
use tenpai_engine::errors::RiichiError;
use tenpai_engine::parser::parse_hand;
use tenpai_engine::shanten::ShantenCache;
use tenpai_engine::tile::{counts_from_tiles, Counts34};

fn counts(s: &str) -> Counts34 {
    let (tiles, _) = parse_hand(s).unwrap();
    counts_from_tiles(&tiles).unwrap()
}

fn unseen(hand: &Counts34) -> Counts34 {
    std::array::from_fn(|k| 4 - hand[k])
}

#[test]
fn push_discards_the_isolated_tile() {
    let hand = counts("123m456m789m23p559s");
    let ranked = rank_discards(&hand, 0, &unseen(&hand), DiscardMode::Push).unwrap();
    assert_eq!(ranked[0].tile, 26); // 9s
    assert_eq!(ranked[0].shanten, 0);
    assert_eq!(ranked[0].accepted, vec![9, 12]);
    assert!(ranked.iter().all(|c| c.safety.is_none()));
    assert!(ranked.windows(2).all(|w| w[0].shanten <= w[1].shanten));
}

#[test]
fn push_with_melds() {
    // Two melds leave eight concealed tiles; 9s is the dead one.
    let (tiles, melds) = parse_hand("456m23p559s(123m)(p777z)").unwrap();
    let hand = counts_from_tiles(&tiles).unwrap();
    let ranked =
        rank_discards(&hand, melds.len() as u8, &unseen(&hand), DiscardMode::Push).unwrap();
    assert_eq!(ranked[0].tile, 26);
    assert_eq!(ranked[0].ukeire, 8);
}

#[test]
fn fold_puts_genbutsu_first() {
    let hand = counts("123m456m789m23p559s");
    let mut safety = SafetyInfo::new();
    safety.on_riichi(0);
    safety.on_discard(1, 0); // 2m is genbutsu
    safety.on_discard(13, 0); // 5p -> 2p and 8p suji
    let pool = safety.remaining_pool(&hand);

    let ranked = rank_discards(&hand, 0, &pool, DiscardMode::Fold(&safety)).unwrap();
    assert_eq!(ranked[0].tile, 1);
    assert_eq!(ranked[0].safety, Some(SafetyTier::Genbutsu));
    assert_eq!(ranked[1].tile, 10);
    assert_eq!(ranked[1].safety, Some(SafetyTier::Suji));
    assert!(ranked
        .windows(2)
        .all(|w| w[0].safety.unwrap() <= w[1].safety.unwrap()));
}

#[test]
fn mode_follows_config() {
    let hand = counts("159m2468p17s13577z");
    let mut safety = SafetyInfo::new();
    safety.on_riichi(2);
    let cfg = EvaluatorConfig::default();
    let mut cache = ShantenCache::new();
    let mut h13 = hand;
    h13[33] -= 1;
    let sh = cache.shanten(&h13, 0).unwrap();
    assert!(sh >= cfg.fold_min_shanten);

    let mode = select_mode(&safety, sh, 0, &cfg);
    assert!(mode.is_fold());
    let ranked = rank_discards(&hand, 0, &safety.remaining_pool(&hand), mode).unwrap();
    // Nothing is genbutsu or suji yet; honors and terminals go first.
    assert_eq!(ranked[0].safety, Some(SafetyTier::TerminalOrHonor));

    assert!(!select_mode(&safety, sh, 3, &cfg).is_fold());
}

/// Prefers discarding the highest kind, ignoring everything else.
struct HighestFirst;

impl DiscardPolicy for HighestFirst {
    fn compare(&self, a: &DiscardCandidate, b: &DiscardCandidate) -> Ordering {
        b.tile.cmp(&a.tile)
    }
}

#[test]
fn custom_policy_is_pluggable() {
    let hand = counts("123m456m789m23p559s");
    let mut cache = ShantenCache::new();
    let ranked =
        rank_discards_with(&mut cache, &hand, 0, &unseen(&hand), None, &HighestFirst).unwrap();
    let tiles: Vec<u8> = ranked.iter().map(|c| c.tile).collect();
    let mut sorted = tiles.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(tiles, sorted);

    let boxed: Box<dyn DiscardPolicy> = Box::new(HighestFirst);
    let again =
        rank_discards_with(&mut cache, &hand, 0, &unseen(&hand), None, boxed.as_ref()).unwrap();
    assert_eq!(ranked, again);
    let (hits, _) = cache.stats();
    assert!(hits > 0);
}

#[test]
fn malformed_hands_are_errors() {
    let mut hand = counts("123m456m789m23p559s");
    hand[0] = 5;
    let err = rank_discards(&hand, 0, &[4; 34], DiscardMode::Push);
    assert!(matches!(err, Err(RiichiError::MalformedHand { .. })));

    let hand = counts("123m456m789m23p559s");
    assert!(rank_discards(&hand, 5, &[4; 34], DiscardMode::Push).is_err());
    assert!(rank_discards(&hand, 1, &[4; 34], DiscardMode::Push).is_err());
}
