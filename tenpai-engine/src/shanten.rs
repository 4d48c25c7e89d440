//! Shanten (tiles-away-from-tenpai) calculation.
//!
//! The standard form (sets + pair) is found by a depth-first search over tile
//! kinds in index order, memoized on the remaining histogram. Seven pairs uses
//! a closed formula. Thirteen orphans is recognised as a winning shape by the
//! agari module but does not take part here.
//!
//! All memo state lives in [`ShantenCache`], which the caller owns. Evaluators
//! that ask many related questions (ukeire, batch ranking) keep one cache per
//! worker; the free function [`shanten`] builds a throwaway one.

use ahash::AHashMap;

use crate::errors::{RiichiError, RiichiResult};
use crate::tile::{is_sequence_start, validate_counts, Counts34, JIHAI_START, NUM_TILE_TYPES};
use crate::types::max_concealed;

/// Largest number of fixed melds a hand can carry.
pub const MAX_MELDS: u8 = 4;

/// Shanten of the smallest legal hand: `8 - 2m` for the standard form.
#[inline]
pub const fn max_standard_shanten(meld_count: u8) -> i8 {
    2 * (MAX_MELDS as i8 - meld_count as i8)
}

/// Checks that `counts` can be the concealed part of a hand with
/// `meld_count` fixed melds.
pub fn validate_shanten_input(counts: &Counts34, meld_count: u8) -> RiichiResult<()> {
    if meld_count > MAX_MELDS {
        return Err(RiichiError::malformed(format!(
            "meld count {meld_count} exceeds {MAX_MELDS}"
        )));
    }
    validate_counts(counts)?;
    let total: usize = counts.iter().map(|&c| c as usize).sum();
    if total > max_concealed(meld_count) {
        return Err(RiichiError::malformed(format!(
            "{total} concealed tiles with {meld_count} melds (at most {})",
            max_concealed(meld_count)
        )));
    }
    Ok(())
}

/// Seven-pairs shanten. Only meaningful for a hand with no melds.
pub fn calc_chitoi(tiles: &Counts34) -> i8 {
    let mut pairs = 0u8;
    let mut kinds = 0u8;
    for &c in tiles.iter() {
        if c > 0 {
            kinds += 1;
            if c >= 2 {
                pairs += 1;
            }
        }
    }
    let redunct = 7u8.saturating_sub(kinds) as i8;
    6 - pairs as i8 + redunct
}

// ---------------------------------------------------------------------------
// Standard-form search
// ---------------------------------------------------------------------------

/// Inner memo key: the remaining histogram (3 bits per kind) plus the
/// partial decomposition built so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SearchKey {
    packed: u128,
    pos: u8,
    sets: u8,
    partials: u8,
    head: bool,
}

fn pack(counts: &Counts34) -> u128 {
    counts
        .iter()
        .enumerate()
        .fold(0u128, |acc, (i, &c)| acc | (c as u128) << (3 * i))
}

struct Search<'a> {
    hand: Counts34,
    packed: u128,
    need: u8,
    memo: &'a mut AHashMap<SearchKey, i8>,
}

impl Search<'_> {
    #[inline]
    fn take(&mut self, idx: usize, n: u8) {
        self.hand[idx] -= n;
        self.packed -= (n as u128) << (3 * idx);
    }

    #[inline]
    fn put(&mut self, idx: usize, n: u8) {
        self.hand[idx] += n;
        self.packed += (n as u128) << (3 * idx);
    }

    fn evaluate(&self, sets: u8, partials: u8, head: bool) -> i8 {
        let sets = sets.min(self.need);
        let partials = partials.min(self.need - sets);
        2 * self.need as i8 - 2 * sets as i8 - partials as i8 - head as i8
    }

    fn run(&mut self, mut pos: usize, sets: u8, partials: u8, head: bool) -> i8 {
        while pos < NUM_TILE_TYPES && self.hand[pos] == 0 {
            pos += 1;
        }
        if pos == NUM_TILE_TYPES {
            return self.evaluate(sets, partials, head);
        }

        let key = SearchKey {
            packed: self.packed,
            pos: pos as u8,
            sets,
            partials,
            head,
        };
        if let Some(&v) = self.memo.get(&key) {
            return v;
        }

        let suited = pos < JIHAI_START as usize;
        let num = pos % 9;

        // Leave every remaining copy of this kind unused.
        let c = self.hand[pos];
        self.take(pos, c);
        let mut best = self.run(pos + 1, sets, partials, head);
        self.put(pos, c);

        if self.hand[pos] >= 3 {
            self.take(pos, 3);
            best = best.min(self.run(pos, sets + 1, partials, head));
            self.put(pos, 3);
        }

        if is_sequence_start(pos as u8) && self.hand[pos + 1] > 0 && self.hand[pos + 2] > 0 {
            self.take(pos, 1);
            self.take(pos + 1, 1);
            self.take(pos + 2, 1);
            best = best.min(self.run(pos, sets + 1, partials, head));
            self.put(pos, 1);
            self.put(pos + 1, 1);
            self.put(pos + 2, 1);
        }

        if !head && self.hand[pos] >= 2 {
            self.take(pos, 2);
            best = best.min(self.run(pos, sets, partials, true));
            self.put(pos, 2);
        }

        if sets + partials < self.need {
            // A pair waiting for its third tile.
            if self.hand[pos] >= 2 {
                self.take(pos, 2);
                best = best.min(self.run(pos, sets, partials + 1, head));
                self.put(pos, 2);
            }
            // Ryanmen or penchan.
            if suited && num <= 7 && self.hand[pos + 1] > 0 {
                self.take(pos, 1);
                self.take(pos + 1, 1);
                best = best.min(self.run(pos, sets, partials + 1, head));
                self.put(pos, 1);
                self.put(pos + 1, 1);
            }
            // Kanchan.
            if suited && num <= 6 && self.hand[pos + 2] > 0 {
                self.take(pos, 1);
                self.take(pos + 2, 1);
                best = best.min(self.run(pos, sets, partials + 1, head));
                self.put(pos, 1);
                self.put(pos + 2, 1);
            }
        }

        self.memo.insert(key, best);
        best
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Memoization for shanten queries, owned by the caller.
///
/// Holds the per-hand result cache, keyed on `(meld count, histogram)`, and a
/// scratch memo for the search that is cleared and reused between queries.
/// When the result cache reaches its capacity it is emptied wholesale.
#[derive(Debug, Clone)]
pub struct ShantenCache {
    results: AHashMap<(u8, Counts34), i8>,
    memo: AHashMap<SearchKey, i8>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for ShantenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ShantenCache {
    pub const DEFAULT_CAPACITY: usize = 1 << 16;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A cache holding at most `capacity` hand results (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: AHashMap::new(),
            memo: AHashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Shanten clamped at 0: a complete hand and a tenpai hand both report 0.
    pub fn shanten(&mut self, counts: &Counts34, meld_count: u8) -> RiichiResult<u8> {
        Ok(self.shanten_raw(counts, meld_count)?.max(0) as u8)
    }

    /// Unclamped shanten: -1 for a complete standard or seven-pairs hand.
    pub fn shanten_raw(&mut self, counts: &Counts34, meld_count: u8) -> RiichiResult<i8> {
        validate_shanten_input(counts, meld_count)?;
        if let Some(&v) = self.results.get(&(meld_count, *counts)) {
            self.hits += 1;
            return Ok(v);
        }
        self.misses += 1;

        let mut value = self.standard(counts, meld_count);
        if meld_count == 0 {
            value = value.min(calc_chitoi(counts));
        }

        if self.results.len() >= self.capacity {
            log::trace!(
                "shanten cache full ({} entries), clearing",
                self.results.len()
            );
            self.results.clear();
        }
        self.results.insert((meld_count, *counts), value);
        Ok(value)
    }

    /// Standard-form shanten of an already validated histogram.
    fn standard(&mut self, counts: &Counts34, meld_count: u8) -> i8 {
        self.memo.clear();
        let mut search = Search {
            hand: *counts,
            packed: pack(counts),
            need: MAX_MELDS - meld_count,
            memo: &mut self.memo,
        };
        search.run(0, 0, 0, false)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.memo.clear();
    }
}

/// Shanten of a concealed histogram with `meld_count` fixed melds, clamped
/// at 0. Uses a fresh cache; hold a [`ShantenCache`] for repeated queries.
pub fn shanten(counts: &Counts34, meld_count: u8) -> RiichiResult<u8> {
    ShantenCache::new().shanten(counts, meld_count)
}
