//! Winning-shape detection and decomposition.
//!
//! A complete hand is the concealed histogram (including the winning tile)
//! plus any fixed melds. [`find_divisions`] lists every way the concealed part
//! splits into a pair and sets; [`enumerate_winning_shapes`] turns those into
//! [`HandShape`]s, one per choice of the group the winning tile completed.

use serde::{Deserialize, Serialize};

use crate::errors::{RiichiError, RiichiResult};
use crate::shanten::MAX_MELDS;
use crate::tile::{
    counts_from_tiles, is_sequence_start, Counts34, Tile, COPIES_PER_KIND, NUM_TILE_TYPES, YAOCHUU,
};
use crate::types::{max_concealed, Meld, MeldType, TILE_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mentsu {
    Koutsu(u8),
    Shuntsu(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub head: u8,
    pub body: Vec<Mentsu>,
}

// ---------------------------------------------------------------------------
// Agari checks
// ---------------------------------------------------------------------------

/// True if the histogram is a finished hand: standard, seven pairs, or
/// thirteen orphans. Works for any concealed size `14 - 3m`.
pub fn is_agari(counts: &Counts34) -> bool {
    if is_kokushi(counts) || is_chiitoitsu(counts) {
        return true;
    }
    let mut work = *counts;
    is_standard_agari(&mut work)
}

pub fn is_kokushi(counts: &Counts34) -> bool {
    let mut pair_found = false;
    let mut total = 0u8;
    for &idx in &YAOCHUU {
        let c = counts[idx as usize];
        match c {
            1 => {}
            2 if !pair_found => pair_found = true,
            _ => return false,
        }
        total += c;
    }
    // No tiles outside the thirteen kinds.
    pair_found && counts.iter().map(|&c| c as u32).sum::<u32>() == total as u32
}

pub fn is_chiitoitsu(counts: &Counts34) -> bool {
    let mut pairs = 0;
    for &c in counts.iter() {
        match c {
            0 => {}
            2 => pairs += 1,
            _ => return false,
        }
    }
    pairs == 7
}

/// Pair plus sets, consuming every tile. Restores `counts` before returning.
pub fn is_standard_agari(counts: &mut Counts34) -> bool {
    for i in 0..TILE_MAX {
        if counts[i] >= 2 {
            counts[i] -= 2;
            let ok = decompose(counts, 0);
            counts[i] += 2;
            if ok {
                return true;
            }
        }
    }
    false
}

fn decompose(counts: &mut Counts34, start_idx: usize) -> bool {
    let mut i = start_idx;
    while i < TILE_MAX && counts[i] == 0 {
        i += 1;
    }
    if i == TILE_MAX {
        return true;
    }

    if counts[i] >= 3 {
        counts[i] -= 3;
        let ok = decompose(counts, i);
        counts[i] += 3;
        if ok {
            return true;
        }
    }

    if is_sequence_start(i as u8) && counts[i + 1] > 0 && counts[i + 2] > 0 {
        counts[i] -= 1;
        counts[i + 1] -= 1;
        counts[i + 2] -= 1;
        let ok = decompose(counts, i);
        counts[i] += 1;
        counts[i + 1] += 1;
        counts[i + 2] += 1;
        if ok {
            return true;
        }
    }
    false
}

/// Tile kinds that complete the hand. Kinds already held four times are
/// skipped since no copy can be drawn.
pub fn waits(counts: &Counts34) -> Vec<u8> {
    let mut work = *counts;
    let mut out = Vec::new();
    for i in 0..NUM_TILE_TYPES {
        if work[i] >= COPIES_PER_KIND {
            continue;
        }
        work[i] += 1;
        if is_agari(&work) {
            out.push(i as u8);
        }
        work[i] -= 1;
    }
    out
}

pub fn is_tenpai(counts: &Counts34) -> bool {
    !waits(counts).is_empty()
}

/// Tiles of each kind locked in fixed melds.
pub fn meld_counts(melds: &[Meld]) -> Counts34 {
    let mut out = [0u8; NUM_TILE_TYPES];
    for t in melds.iter().flat_map(|m| m.tiles()) {
        out[t.index()] += 1;
    }
    out
}

/// [`waits`] minus kinds whose every copy sits in the hand or its melds.
pub fn live_waits(counts: &Counts34, in_melds: &Counts34) -> Vec<u8> {
    waits(counts)
        .into_iter()
        .filter(|&k| counts[k as usize] + in_melds[k as usize] < COPIES_PER_KIND)
        .collect()
}

// ---------------------------------------------------------------------------
// Divisions
// ---------------------------------------------------------------------------

/// Every pair + sets split of `counts`, deduplicated.
pub fn find_divisions(counts: &Counts34) -> Vec<Division> {
    let mut divisions = Vec::new();
    for i in 0..TILE_MAX {
        if counts[i] >= 2 {
            let mut work = *counts;
            work[i] -= 2;
            let mut bodies = Vec::new();
            let mut current_body = Vec::new();
            decompose_all(&mut work, 0, &mut current_body, &mut bodies);
            for mut body in bodies {
                body.sort();
                let division = Division {
                    head: i as u8,
                    body,
                };
                if !divisions.contains(&division) {
                    divisions.push(division);
                }
            }
        }
    }
    divisions
}

fn decompose_all(
    counts: &mut Counts34,
    start_idx: usize,
    current_body: &mut Vec<Mentsu>,
    results: &mut Vec<Vec<Mentsu>>,
) {
    let mut i = start_idx;
    while i < TILE_MAX && counts[i] == 0 {
        i += 1;
    }

    if i == TILE_MAX {
        results.push(current_body.clone());
        return;
    }

    if counts[i] >= 3 {
        counts[i] -= 3;
        current_body.push(Mentsu::Koutsu(i as u8));
        decompose_all(counts, i, current_body, results);
        current_body.pop();
        counts[i] += 3;
    }

    if is_sequence_start(i as u8) && counts[i + 1] > 0 && counts[i + 2] > 0 {
        counts[i] -= 1;
        counts[i + 1] -= 1;
        counts[i + 2] -= 1;
        current_body.push(Mentsu::Shuntsu(i as u8));
        decompose_all(counts, i, current_body, results);
        current_body.pop();
        counts[i] += 1;
        counts[i + 1] += 1;
        counts[i + 2] += 1;
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// How the winning tile related to the partial group it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wait {
    /// Open two-sided wait (45 waiting on 3 or 6).
    Ryanmen,
    /// Closed middle wait (46 waiting on 5).
    Kanchan,
    /// Edge wait (12 waiting on 3, 89 waiting on 7).
    Penchan,
    /// Two pairs, one becoming a triplet.
    Shanpon,
    /// Single tile waiting for its pair.
    Tanki,
}

impl Wait {
    pub const fn fu(self) -> u32 {
        match self {
            Wait::Kanchan | Wait::Penchan | Wait::Tanki => 2,
            Wait::Ryanmen | Wait::Shanpon => 0,
        }
    }

    fn of_sequence(base: u8, win: u8) -> Self {
        let num = base % 9;
        if win == base + 1 {
            Wait::Kanchan
        } else if (win == base + 2 && num == 0) || (win == base && num == 6) {
            Wait::Penchan
        } else {
            Wait::Ryanmen
        }
    }
}

/// One set of a finished hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Sequence { base: u8, open: bool },
    Triplet { tile: u8, open: bool },
    Quad { tile: u8, open: bool },
}

impl Group {
    fn from_meld(meld: &Meld) -> Self {
        let base = meld.base().id();
        let open = meld.is_open();
        match meld.meld_type() {
            MeldType::Chi => Group::Sequence { base, open },
            MeldType::Pon => Group::Triplet { tile: base, open },
            MeldType::Daiminkan | MeldType::Ankan | MeldType::Kakan => {
                Group::Quad { tile: base, open }
            }
        }
    }

    fn from_mentsu(m: Mentsu) -> Self {
        match m {
            Mentsu::Koutsu(tile) => Group::Triplet { tile, open: false },
            Mentsu::Shuntsu(base) => Group::Sequence { base, open: false },
        }
    }

    /// Lowest tile kind in the group.
    pub fn base(&self) -> u8 {
        match *self {
            Group::Sequence { base, .. } => base,
            Group::Triplet { tile, .. } | Group::Quad { tile, .. } => tile,
        }
    }

    pub fn is_open(&self) -> bool {
        match *self {
            Group::Sequence { open, .. }
            | Group::Triplet { open, .. }
            | Group::Quad { open, .. } => open,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Group::Sequence { .. })
    }

    /// Triplet or quad.
    pub fn is_pon_like(&self) -> bool {
        !self.is_sequence()
    }

    pub fn is_quad(&self) -> bool {
        matches!(self, Group::Quad { .. })
    }

    pub fn contains(&self, kind: u8) -> bool {
        match *self {
            Group::Sequence { base, .. } => (base..base + 3).contains(&kind),
            Group::Triplet { tile, .. } | Group::Quad { tile, .. } => tile == kind,
        }
    }
}

/// Which group the winning tile finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinGroup {
    Pair,
    /// Index into [`StandardShape::groups`].
    Set(usize),
}

/// Four sets and a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardShape {
    pub pair: u8,
    /// Fixed melds first, then concealed sets in ascending order.
    pub groups: Vec<Group>,
    pub win_group: WinGroup,
    pub wait: Wait,
    pub win_tile: u8,
    /// The 13-tile hand accepted exactly one tile kind.
    pub single_wait: bool,
}

impl StandardShape {
    /// Fu for the wait. A single accepted kind counts as a 2-fu wait when
    /// `single_wait_fu` is on.
    pub fn wait_fu(&self, single_wait_fu: bool) -> u32 {
        if single_wait_fu && self.single_wait {
            2
        } else {
            self.wait.fu()
        }
    }

    /// Whether a group counts as concealed for fu and sanankou: a concealed
    /// set finished by a discard is treated as open.
    pub fn is_concealed_group(&self, idx: usize, tsumo: bool) -> bool {
        let group = &self.groups[idx];
        if group.is_open() {
            return false;
        }
        tsumo || self.win_group != WinGroup::Set(idx) || group.is_quad()
    }

    pub fn is_menzen(&self) -> bool {
        self.groups.iter().all(|g| !g.is_open())
    }
}

/// A candidate reading of a finished hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandShape {
    Standard(StandardShape),
    SevenPairs {
        pairs: [u8; 7],
        win_tile: u8,
        single_wait: bool,
    },
    ThirteenOrphans {
        win_tile: u8,
        /// The 13-tile hand held one of each orphan (13-sided wait).
        thirteen_wait: bool,
    },
}

impl HandShape {
    pub fn win_tile(&self) -> u8 {
        match self {
            HandShape::Standard(s) => s.win_tile,
            HandShape::SevenPairs { win_tile, .. } | HandShape::ThirteenOrphans { win_tile, .. } => {
                *win_tile
            }
        }
    }
}

/// Concealed tiles including the winning tile.
///
/// `concealed` may hold `13 - 3m` tiles (the winning tile is appended) or
/// `14 - 3m` tiles that already include it.
pub fn concealed_with_win(
    concealed: &[Tile],
    melds: &[Meld],
    win_tile: Tile,
) -> RiichiResult<Vec<Tile>> {
    if melds.len() > MAX_MELDS as usize {
        return Err(RiichiError::malformed(format!("{} melds", melds.len())));
    }
    let full = max_concealed(melds.len() as u8);
    let mut tiles = concealed.to_vec();
    if tiles.len() + 1 == full {
        tiles.push(win_tile);
    } else if tiles.len() == full {
        if !tiles.iter().any(|t| t.kind() == win_tile.kind()) {
            return Err(RiichiError::malformed(format!(
                "winning tile {} missing from {}-tile hand",
                win_tile.kind(),
                full
            )));
        }
    } else {
        return Err(RiichiError::malformed(format!(
            "{} concealed tiles with {} melds (expected {} or {})",
            tiles.len(),
            melds.len(),
            full - 1,
            full
        )));
    }

    let mut all = tiles.clone();
    all.extend(melds.iter().flat_map(|m| m.tiles().iter().copied()));
    counts_from_tiles(&all)?;
    Ok(tiles)
}

/// All winning readings of the hand; empty if it is not a finished hand.
pub fn enumerate_winning_shapes(
    concealed: &[Tile],
    melds: &[Meld],
    win_tile: Tile,
) -> RiichiResult<Vec<HandShape>> {
    let tiles = concealed_with_win(concealed, melds, win_tile)?;
    let counts = counts_from_tiles(&tiles)?;
    Ok(shapes_from_counts(&counts, melds, win_tile.kind().id()))
}

/// [`enumerate_winning_shapes`] on an already validated histogram that
/// includes the winning tile.
///
/// The single-wait flag is decided on the waits that still have a copy
/// outside the hand and its melds.
pub(crate) fn shapes_from_counts(counts: &Counts34, melds: &[Meld], win: u8) -> Vec<HandShape> {
    if counts.get(win as usize).copied().unwrap_or(0) == 0 {
        return Vec::new();
    }
    let mut before_win = *counts;
    before_win[win as usize] -= 1;
    let in_melds = meld_counts(melds);
    let accepted = live_waits(&before_win, &in_melds);
    let single_wait = accepted.len() == 1;

    let mut shapes = Vec::new();
    let meld_groups: Vec<Group> = melds.iter().map(Group::from_meld).collect();

    for division in find_divisions(counts) {
        let mut groups = meld_groups.clone();
        groups.extend(division.body.iter().copied().map(Group::from_mentsu));

        let base = StandardShape {
            pair: division.head,
            groups,
            win_group: WinGroup::Pair,
            wait: Wait::Tanki,
            win_tile: win,
            single_wait,
        };
        if division.head == win {
            shapes.push(HandShape::Standard(base.clone()));
        }
        for (j, m) in division.body.iter().enumerate() {
            // Identical sets give identical shapes.
            if division.body[..j].contains(m) {
                continue;
            }
            let wait = match *m {
                Mentsu::Koutsu(t) if t == win => Wait::Shanpon,
                Mentsu::Shuntsu(b) if (b..b + 3).contains(&win) => Wait::of_sequence(b, win),
                _ => continue,
            };
            shapes.push(HandShape::Standard(StandardShape {
                win_group: WinGroup::Set(meld_groups.len() + j),
                wait,
                ..base.clone()
            }));
        }
    }

    if melds.is_empty() && is_chiitoitsu(counts) {
        let mut pairs = [0u8; 7];
        for (slot, kind) in pairs
            .iter_mut()
            .zip((0..NUM_TILE_TYPES as u8).filter(|&k| counts[k as usize] == 2))
        {
            *slot = kind;
        }
        shapes.push(HandShape::SevenPairs {
            pairs,
            win_tile: win,
            single_wait,
        });
    }

    if melds.is_empty() && is_kokushi(counts) {
        shapes.push(HandShape::ThirteenOrphans {
            win_tile: win,
            thirteen_wait: YAOCHUU.iter().all(|&k| before_win[k as usize] == 1),
        });
    }

    shapes
}
