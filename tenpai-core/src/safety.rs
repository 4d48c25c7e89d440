//! Defensive tile reading: genbutsu, suji and visible copies.
//!
//! Updated incrementally on each discard, call, pass and dora reveal, and
//! queried by the fold policy through [`SafetyInfo::tier`].

use serde::{Deserialize, Serialize};
use tenpai_engine::tile::{is_yaochuu, Counts34, COPIES_PER_KIND, JIHAI_START, NUM_TILE_TYPES};

/// Number of opponents to track safety against.
pub const NUM_OPPONENTS: usize = 3;

const NUM_TILES: usize = NUM_TILE_TYPES;

/// How safe a discard is against the current threats, safest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SafetyTier {
    Genbutsu,
    /// An honor already discarded at least twice.
    HonorDiscardedTwice,
    Suji,
    TerminalOrHonor,
    Other,
}

/// Safety information for the current player against all opponents.
#[derive(Debug, Clone)]
pub struct SafetyInfo {
    // genbutsu_all[opp][tile]: the opponent cannot ron this tile
    pub genbutsu_all: [[bool; NUM_TILES]; NUM_OPPONENTS],

    // 1.0 = every ryanmen wait on the tile is ruled out, 0.5 = one side of a 4-6
    pub suji: [[f32; NUM_TILES]; NUM_OPPONENTS],

    pub visible_counts: [u8; NUM_TILES],
    /// Discards of each kind by anyone.
    pub discard_counts: [u8; NUM_TILES],

    pub opponent_riichi: [bool; NUM_OPPONENTS],
}

impl SafetyInfo {
    pub fn new() -> Self {
        Self {
            genbutsu_all: [[false; NUM_TILES]; NUM_OPPONENTS],
            suji: [[0.0; NUM_TILES]; NUM_OPPONENTS],
            visible_counts: [0; NUM_TILES],
            discard_counts: [0; NUM_TILES],
            opponent_riichi: [false; NUM_OPPONENTS],
        }
    }

    /// Reset all safety data to initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SafetyInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyInfo {
    /// Update safety info when an opponent discards a tile.
    ///
    /// `opponent_idx`: which opponent (0-2) discarded it, relative to the observing player
    pub fn on_discard(&mut self, tile_type: u8, opponent_idx: usize) {
        let t = tile_type as usize;
        if t >= NUM_TILES || opponent_idx >= NUM_OPPONENTS {
            return;
        }

        self.mark_genbutsu(opponent_idx, t);
        self.discard_counts[t] = self.discard_counts[t].saturating_add(1);
        self.reveal(t);
    }

    /// A tile discarded by someone else went past opponents without a ron.
    /// Riichi players can no longer win on it.
    pub fn on_pass(&mut self, tile_type: u8) {
        let t = tile_type as usize;
        if t >= NUM_TILES {
            return;
        }
        for opp in 0..NUM_OPPONENTS {
            if self.opponent_riichi[opp] {
                self.mark_genbutsu(opp, t);
            }
        }
    }

    /// Our own discard: visible, and safe against every opponent (furiten).
    pub fn on_own_discard(&mut self, tile_type: u8) {
        let t = tile_type as usize;
        if t >= NUM_TILES {
            return;
        }
        self.discard_counts[t] = self.discard_counts[t].saturating_add(1);
        for opp in 0..NUM_OPPONENTS {
            self.mark_genbutsu(opp, t);
        }
        self.reveal(t);
    }

    fn mark_genbutsu(&mut self, opponent_idx: usize, t: usize) {
        self.genbutsu_all[opponent_idx][t] = true;
        self.update_suji(opponent_idx, t);
    }

    fn reveal(&mut self, t: usize) {
        self.visible_counts[t] = self.visible_counts[t].saturating_add(1);
    }
}

impl SafetyInfo {
    /// Recompute suji for the tiles paired with a new genbutsu.
    ///
    /// 1-4-7, 2-5-8, 3-6-9. Ends need one side, 4-6 need both for a full suji.
    /// Honors have no suji.
    fn update_suji(&mut self, opponent_idx: usize, tile: usize) {
        if tile >= JIHAI_START as usize {
            return;
        }
        let suit_offset = (tile / 9) * 9;
        let number = tile - suit_offset;
        if number >= 3 {
            self.refresh_suji(opponent_idx, tile - 3);
        }
        if number + 3 < 9 {
            self.refresh_suji(opponent_idx, tile + 3);
        }
    }

    fn refresh_suji(&mut self, opponent_idx: usize, tile: usize) {
        let suit_offset = (tile / 9) * 9;
        let number = tile - suit_offset;
        let safe = &self.genbutsu_all[opponent_idx];
        // Each side is a ryanmen wait that also accepts the paired tile.
        let mut sides = 0u8;
        let mut cleared = 0u8;
        if number >= 3 {
            sides += 1;
            cleared += u8::from(safe[tile - 3]);
        }
        if number + 3 < 9 {
            sides += 1;
            cleared += u8::from(safe[tile + 3]);
        }
        self.suji[opponent_idx][tile] = f32::from(cleared) / f32::from(sides);
    }
}

impl SafetyInfo {
    /// Update when an opponent declares riichi.
    pub fn on_riichi(&mut self, opponent_idx: usize) {
        if opponent_idx < NUM_OPPONENTS {
            self.opponent_riichi[opponent_idx] = true;
        }
    }

    /// Update visible counts when tiles are revealed via call (chi/pon/kan).
    pub fn on_call(&mut self, tiles: &[u8]) {
        for &t in tiles {
            let idx = t as usize;
            if idx < NUM_TILES {
                self.reveal(idx);
            }
        }
    }

    /// Update visible counts when a dora indicator is revealed.
    pub fn on_dora_revealed(&mut self, tile_type: u8) {
        let idx = tile_type as usize;
        if idx < NUM_TILES {
            self.reveal(idx);
        }
    }

    pub fn any_riichi(&self) -> bool {
        self.opponent_riichi.iter().any(|&r| r)
    }

    /// Opponents to defend against: those in riichi, or everyone if none is.
    fn threats(&self) -> impl Iterator<Item = usize> + '_ {
        let any = self.any_riichi();
        (0..NUM_OPPONENTS).filter(move |&opp| !any || self.opponent_riichi[opp])
    }

    /// Safety tier of discarding `tile_type` against every current threat.
    pub fn tier(&self, tile_type: u8) -> SafetyTier {
        let t = tile_type as usize;
        if t >= NUM_TILES {
            return SafetyTier::Other;
        }
        if self.threats().all(|opp| self.genbutsu_all[opp][t]) {
            SafetyTier::Genbutsu
        } else if tile_type >= JIHAI_START && self.discard_counts[t] >= 2 {
            SafetyTier::HonorDiscardedTwice
        } else if self.threats().all(|opp| self.suji[opp][t] >= 1.0) {
            SafetyTier::Suji
        } else if is_yaochuu(tile_type) {
            SafetyTier::TerminalOrHonor
        } else {
            SafetyTier::Other
        }
    }

    /// Copies of each kind not visible to us: four minus what is on the table
    /// minus what is in `own_hand`.
    pub fn remaining_pool(&self, own_hand: &Counts34) -> Counts34 {
        let mut pool = [0u8; NUM_TILES];
        for (k, slot) in pool.iter_mut().enumerate() {
            *slot = COPIES_PER_KIND
                .saturating_sub(self.visible_counts[k])
                .saturating_sub(own_hand[k]);
        }
        pool
    }
}
