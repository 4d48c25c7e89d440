//! Deterministic random hands.
//!
//! Every generated hand derives from `(session seed, index)` through a
//! SHA-256 KDF feeding `ChaCha8Rng`, so workloads are identical on any
//! platform and thread count.
//!
//! # Determinism guarantee
//!
//! Given the same `(seed, index)`, `generate_wall` produces an identical
//! 136-tile wall, and `deal_hand` the same hand from it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tenpai_engine::tile::{tile136_to_type, Counts34, NUM_TILES_136, NUM_TILE_TYPES};

/// Number of tiles in a standard 4-player wall.
pub const WALL_SIZE: usize = NUM_TILES_136;

/// Fisher-Yates shuffle kept local so output does not drift with
/// `rand::seq::SliceRandom` internals across versions.
pub fn fisher_yates_shuffle<T>(slice: &mut [T], rng: &mut impl Rng) {
    for i in (1..slice.len()).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// `SHA-256(session_seed || index_le)`.
pub fn derive_seed(session_seed: &[u8; 32], index: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(session_seed);
    hasher.update(index.to_le_bytes());
    hasher.finalize().into()
}

/// Expands a `u64` into a 32-byte session seed.
pub fn session_seed(seed: u64) -> [u8; 32] {
    Sha256::digest(seed.to_le_bytes()).into()
}

/// Shuffled wall of 136-format tile ids for the `index`-th draw of a session.
pub fn generate_wall(session_seed: &[u8; 32], index: u64) -> [u8; WALL_SIZE] {
    let mut rng = ChaCha8Rng::from_seed(derive_seed(session_seed, index));
    let mut wall = [0u8; WALL_SIZE];
    for (i, tile) in wall.iter_mut().enumerate() {
        // WALL_SIZE = 136 fits in u8
        *tile = i as u8;
    }
    fisher_yates_shuffle(&mut wall, &mut rng);
    wall
}

/// Histogram of the first `size` tiles of `wall`.
pub fn deal_hand(wall: &[u8], size: usize) -> Counts34 {
    let mut counts = [0u8; NUM_TILE_TYPES];
    for &t in wall.iter().take(size) {
        counts[tile136_to_type(t).index()] += 1;
    }
    counts
}

/// A deterministic stream of dealt hands.
///
/// ```
/// use tenpai_core::seeding::HandRng;
///
/// let mut rng = HandRng::new(7);
/// let a = rng.next_hand(14);
/// let b = rng.next_hand(14);
/// assert_eq!(a.iter().map(|&c| c as usize).sum::<usize>(), 14);
/// assert_ne!(a, b);
/// ```
pub struct HandRng {
    seed: [u8; 32],
    index: u64,
}

impl HandRng {
    pub fn new(seed: u64) -> Self {
        Self::from_seed_bytes(session_seed(seed))
    }

    pub fn from_seed_bytes(seed: [u8; 32]) -> Self {
        Self { seed, index: 0 }
    }

    /// Number of hands dealt so far.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Deals `size` tiles from a fresh wall and advances the stream.
    pub fn next_hand(&mut self, size: usize) -> Counts34 {
        let wall = generate_wall(&self.seed, self.index);
        self.index += 1;
        deal_hand(&wall, size)
    }
}

/// `count` hands of `size` tiles, identical for the same `seed`.
pub fn random_hands(seed: u64, count: usize, size: usize) -> Vec<Counts34> {
    let mut rng = HandRng::new(seed);
    (0..count).map(|_| rng.next_hand(size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED: [u8; 32] = [
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E,
        0x1F, 0x20,
    ];

    #[test]
    fn wall_determinism_same_inputs() {
        let wall_a = generate_wall(&TEST_SEED, 42);
        let wall_b = generate_wall(&TEST_SEED, 42);
        assert_eq!(wall_a, wall_b, "same inputs must produce identical walls");
    }

    #[test]
    fn wall_different_index() {
        assert_ne!(generate_wall(&TEST_SEED, 0), generate_wall(&TEST_SEED, 1));
    }

    #[test]
    fn wall_contains_all_tiles() {
        let wall = generate_wall(&TEST_SEED, 0);
        let mut counts = [0u32; WALL_SIZE];
        for &tile in &wall {
            counts[tile as usize] += 1;
        }
        assert!(counts.iter().all(|&c| c == 1));
    }

    #[test]
    fn dealt_hands_are_legal() {
        for hand in random_hands(3, 50, 14) {
            assert_eq!(hand.iter().map(|&c| c as usize).sum::<usize>(), 14);
            assert!(hand.iter().all(|&c| c <= 4));
        }
    }

    #[test]
    fn hand_stream_is_reproducible() {
        assert_eq!(random_hands(9, 5, 13), random_hands(9, 5, 13));
        assert_ne!(random_hands(9, 5, 13), random_hands(10, 5, 13));
        let mut rng = HandRng::new(9);
        rng.next_hand(13);
        assert_eq!(rng.index(), 1);
    }

    #[test]
    fn fisher_yates_empty_and_single() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let mut empty: Vec<u8> = vec![];
        fisher_yates_shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());
        let mut single = vec![42u8];
        fisher_yates_shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![42]);
    }

    #[test]
    fn derive_seed_sensitivity() {
        assert_eq!(derive_seed(&TEST_SEED, 0), derive_seed(&TEST_SEED, 0));
        assert_ne!(derive_seed(&TEST_SEED, 0), derive_seed(&TEST_SEED, 1));
        assert_ne!(session_seed(1), session_seed(2));
    }
}
