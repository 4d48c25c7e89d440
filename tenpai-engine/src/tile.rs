//! Tile identity, classification, and the 34-kind histogram.
//!
//! Provides the 34-tile type system, red-five handling, 136-format conversion,
//! the dora successor cycle, and suit permutation (6 permutations of
//! manzu/pinzu/souzu) which leaves every hand-shape property unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{RiichiError, RiichiResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Total number of distinct tile types (0-33).
pub const NUM_TILE_TYPES: usize = 34;

/// Number of tiles per suited category (1-9).
pub const NUM_SUIT_TILES: usize = 9;

/// Total physical tiles in a standard mahjong set.
pub const NUM_TILES_136: usize = 136;

/// Copies of each tile kind in the set.
pub const COPIES_PER_KIND: u8 = 4;

// Suit range starts (tile type indices).
pub const MANZU_START: u8 = 0;
pub const PINZU_START: u8 = 9;
pub const SOUZU_START: u8 = 18;
pub const JIHAI_START: u8 = 27;

// Named honor tile indices for readability.
pub const EAST: u8 = 27;
pub const SOUTH: u8 = 28;
pub const WEST: u8 = 29;
pub const NORTH: u8 = 30;
pub const HAKU: u8 = 31;
pub const HATSU: u8 = 32;
pub const CHUN: u8 = 33;

/// Terminals and honors (yaochuuhai), in index order.
pub const YAOCHUU: [u8; 13] = [0, 8, 9, 17, 18, 26, 27, 28, 29, 30, 31, 32, 33];

/// A histogram over the 34 tile kinds.
pub type Counts34 = [u8; NUM_TILE_TYPES];

/// Copy index that carries the red-five flag: 136-format ids 16, 52 and 88.
pub const AKA_COPY: u8 = 0;

// ---------------------------------------------------------------------------
// Suit
// ---------------------------------------------------------------------------

/// The four tile categories in Riichi Mahjong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Manzu = 0,
    Pinzu = 1,
    Souzu = 2,
    Jihai = 3,
}

impl Suit {
    /// Returns the starting tile type index for this suit.
    #[inline]
    pub const fn start(self) -> u8 {
        match self {
            Suit::Manzu => MANZU_START,
            Suit::Pinzu => PINZU_START,
            Suit::Souzu => SOUZU_START,
            Suit::Jihai => JIHAI_START,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'm' => Some(Suit::Manzu),
            'p' => Some(Suit::Pinzu),
            's' => Some(Suit::Souzu),
            'z' => Some(Suit::Jihai),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TileType newtype
// ---------------------------------------------------------------------------

/// A tile kind in the range 0-33. Wraps a `u8` for type safety.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileType(u8);

impl TileType {
    /// Creates a `TileType` if `id` is in range 0..34.
    #[inline]
    pub const fn new(id: u8) -> Option<Self> {
        if id < NUM_TILE_TYPES as u8 {
            Some(TileType(id))
        } else {
            None
        }
    }

    /// Raw numeric id (0-33).
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Histogram index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Which suit this tile belongs to.
    #[inline]
    pub const fn suit(self) -> Suit {
        match self.0 {
            0..9 => Suit::Manzu,
            9..18 => Suit::Pinzu,
            18..27 => Suit::Souzu,
            _ => Suit::Jihai,
        }
    }

    /// 1-based number within the suit (1-9), or `None` for honor tiles.
    #[inline]
    pub const fn number(self) -> Option<u8> {
        if self.0 < JIHAI_START {
            Some((self.0 % NUM_SUIT_TILES as u8) + 1)
        } else {
            None
        }
    }

    /// True for 1 or 9 of any suit.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        is_number_terminal(self.0)
    }

    /// True for wind or dragon tiles (indices 27-33).
    #[inline]
    pub const fn is_honor(self) -> bool {
        self.0 >= JIHAI_START
    }

    /// True for terminals or honors (yaochuuhai).
    #[inline]
    pub const fn is_terminal_or_honor(self) -> bool {
        is_yaochuu(self.0)
    }

    /// True for 2-8 of a suit (chunchanpai).
    #[inline]
    pub const fn is_simple(self) -> bool {
        !self.is_terminal_or_honor()
    }

    /// True for manzu, pinzu, or souzu (not jihai).
    #[inline]
    pub const fn is_suited(self) -> bool {
        self.0 < JIHAI_START
    }

    /// True for the three dragons.
    #[inline]
    pub const fn is_dragon(self) -> bool {
        self.0 >= HAKU
    }

    /// The tile made dora by this indicator.
    #[inline]
    pub const fn next_dora(self) -> TileType {
        TileType(next_dora_kind(self.0))
    }
}

impl fmt::Debug for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileType({}={})", self.0, tile_type_name(self.0))
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(tile_type_name(self.0))
    }
}

// ---------------------------------------------------------------------------
// Raw-index classification (hot paths work on u8 kinds directly)
// ---------------------------------------------------------------------------

/// 1 or 9 of a suit.
#[inline]
pub const fn is_number_terminal(kind: u8) -> bool {
    kind < JIHAI_START && (kind % 9 == 0 || kind % 9 == 8)
}

/// Terminal or honor.
#[inline]
pub const fn is_yaochuu(kind: u8) -> bool {
    kind >= JIHAI_START || is_number_terminal(kind)
}

/// Whether `kind` can start a sequence (1-7 of a suit).
#[inline]
pub const fn is_sequence_start(kind: u8) -> bool {
    kind < JIHAI_START && kind % 9 <= 6
}

/// Dora successor for a tile kind. Out-of-range input is returned unchanged.
#[inline]
pub const fn next_dora_kind(kind: u8) -> u8 {
    match kind {
        // Suits: 1 -> 2 -> ... -> 9 -> 1
        0..=26 => (kind / 9) * 9 + (kind % 9 + 1) % 9,
        // Winds: E -> S -> W -> N -> E
        27..=30 => EAST + (kind - EAST + 1) % 4,
        // Dragons: haku -> hatsu -> chun -> haku
        31..=33 => HAKU + (kind - HAKU + 1) % 3,
        _ => kind,
    }
}

// ---------------------------------------------------------------------------
// Tile: kind plus optional physical copy
// ---------------------------------------------------------------------------

/// A tile as handed over by the host: a kind, optionally pinned to one of the
/// four physical copies. Copy 0 of a suited five is the red five.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    kind: TileType,
    copy: Option<u8>,
}

impl Tile {
    /// A tile known only by kind.
    #[inline]
    pub const fn from_kind(kind: TileType) -> Self {
        Self { kind, copy: None }
    }

    /// A tile pinned to a physical copy (0-3).
    pub fn with_copy(kind: TileType, copy: u8) -> RiichiResult<Self> {
        if copy >= COPIES_PER_KIND {
            return Err(RiichiError::Parse {
                input: format!("{kind}{copy}"),
                message: format!("copy index {copy} out of range 0..4"),
            });
        }
        Ok(Self {
            kind,
            copy: Some(copy),
        })
    }

    /// A tile from a raw kind index (0-33).
    pub fn from_index(id: u8) -> RiichiResult<Self> {
        TileType::new(id)
            .map(Self::from_kind)
            .ok_or_else(|| RiichiError::Parse {
                input: id.to_string(),
                message: "tile kind out of range 0..34".to_string(),
            })
    }

    /// A tile from a 136-format id (kind * 4 + copy).
    pub fn from_136(tile136: u8) -> RiichiResult<Self> {
        if tile136 as usize >= NUM_TILES_136 {
            return Err(RiichiError::Parse {
                input: tile136.to_string(),
                message: "136-format id out of range".to_string(),
            });
        }
        Ok(Self {
            kind: tile136_to_type(tile136),
            copy: Some(tile136 % 4),
        })
    }

    /// The red five of the given suit.
    pub const fn red_five(suit: Suit) -> Option<Self> {
        match suit {
            Suit::Jihai => None,
            _ => Some(Self {
                kind: TileType(suit.start() + 4),
                copy: Some(AKA_COPY),
            }),
        }
    }

    #[inline]
    pub const fn kind(self) -> TileType {
        self.kind
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.kind.0 as usize
    }

    #[inline]
    pub const fn copy(self) -> Option<u8> {
        self.copy
    }

    /// True for copy 0 of 5m, 5p or 5s.
    #[inline]
    pub const fn is_red(self) -> bool {
        matches!(self.copy, Some(AKA_COPY)) && self.kind.is_suited() && self.kind.0 % 9 == 4
    }

    /// 136-format id, if the copy is known.
    pub fn to_136(self) -> Option<u8> {
        self.copy.map(|c| self.kind.0 * 4 + c)
    }
}

impl From<TileType> for Tile {
    fn from(kind: TileType) -> Self {
        Self::from_kind(kind)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.copy {
            Some(c) => write!(f, "Tile({}#{c})", self.kind),
            None => write!(f, "Tile({})", self.kind),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_red() {
            write!(f, "{}r", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl FromStr for Tile {
    type Err = RiichiError;

    /// Accepts `"5m"`, `"5m2"` (kind + copy index), `"0m"` / `"5mr"` (red five),
    /// `"1z"`..`"7z"`, and the letters `E S W N P F C`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |message: &str| RiichiError::Parse {
            input: s.to_string(),
            message: message.to_string(),
        };

        if let Some(pos) = HONOR_LETTERS.iter().position(|&h| h == s) {
            return Ok(Self::from_kind(TileType(JIHAI_START + pos as u8)));
        }

        let mut chars = s.chars();
        let num = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| err("expected a leading digit"))? as u8;
        let suit = chars
            .next()
            .and_then(Suit::from_char)
            .ok_or_else(|| err("expected suit letter m/p/s/z"))?;
        let rest: String = chars.collect();

        let max = if suit == Suit::Jihai { 7 } else { 9 };
        if num > max || (num == 0 && suit == Suit::Jihai) {
            return Err(err("tile number out of range"));
        }

        if num == 0 || rest == "r" {
            if num == 0 && !rest.is_empty() {
                return Err(err("unexpected suffix after red five"));
            }
            if num != 0 && num != 5 {
                return Err(err("only fives can be red"));
            }
            return Self::red_five(suit).ok_or_else(|| err("honors have no red copy"));
        }

        let kind = TileType(suit.start() + num - 1);
        if rest.is_empty() {
            return Ok(Self::from_kind(kind));
        }
        let copy: u8 = rest.parse().map_err(|_| err("invalid copy index"))?;
        Self::with_copy(kind, copy)
    }
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Normalizes tiles to kinds and counts them.
///
/// Fails on more than four of a kind or on a physical copy given twice.
pub fn counts_from_tiles(tiles: &[Tile]) -> RiichiResult<Counts34> {
    let mut counts = [0u8; NUM_TILE_TYPES];
    let mut copies_seen = [[false; COPIES_PER_KIND as usize]; NUM_TILE_TYPES];
    for tile in tiles {
        let idx = tile.index();
        if let Some(c) = tile.copy {
            if copies_seen[idx][c as usize] {
                return Err(RiichiError::MalformedHand {
                    message: format!("copy {c} of {} given twice", tile.kind),
                });
            }
            copies_seen[idx][c as usize] = true;
        }
        counts[idx] += 1;
        if counts[idx] > COPIES_PER_KIND {
            return Err(RiichiError::MalformedHand {
                message: format!("more than four copies of {}", tile.kind),
            });
        }
    }
    Ok(counts)
}

/// Rejects histograms with an entry above four.
pub fn validate_counts(counts: &Counts34) -> RiichiResult<()> {
    match counts.iter().position(|&c| c > COPIES_PER_KIND) {
        Some(idx) => Err(RiichiError::MalformedHand {
            message: format!(
                "{} copies of {} in histogram",
                counts[idx],
                tile_type_name(idx as u8)
            ),
        }),
        None => Ok(()),
    }
}

/// Number of red fives among `tiles`.
pub fn count_red(tiles: &[Tile]) -> u8 {
    tiles.iter().filter(|t| t.is_red()).count() as u8
}

// ---------------------------------------------------------------------------
// 136-format conversion
// ---------------------------------------------------------------------------

/// Converts a 136-format tile id (0-135) to its tile type (0-33).
#[inline]
pub const fn tile136_to_type(tile136: u8) -> TileType {
    TileType(tile136 / 4)
}

// ---------------------------------------------------------------------------
// Suit permutation
// ---------------------------------------------------------------------------

/// All 6 permutations of the 3 suits [manzu, pinzu, souzu].
/// Each entry maps [manzu_target, pinzu_target, souzu_target].
pub const ALL_PERMUTATIONS: [[u8; 3]; 6] = [
    [0, 1, 2], // identity
    [0, 2, 1], // swap pin-sou
    [1, 0, 2], // swap man-pin
    [1, 2, 0], // rotate right
    [2, 0, 1], // rotate left
    [2, 1, 0], // swap man-sou
];

/// Permutes a tile type (0-33) according to the given suit permutation.
/// Honor tiles pass through unchanged.
#[inline]
pub const fn permute_tile_type(tile_type: u8, perm: &[u8; 3]) -> u8 {
    if tile_type >= JIHAI_START {
        return tile_type;
    }
    let suit = tile_type / NUM_SUIT_TILES as u8;
    let num = tile_type % NUM_SUIT_TILES as u8;
    perm[suit as usize] * NUM_SUIT_TILES as u8 + num
}

/// Permutes a whole histogram.
pub fn permute_counts(counts: &Counts34, perm: &[u8; 3]) -> Counts34 {
    let mut out = [0u8; NUM_TILE_TYPES];
    for (i, &c) in counts.iter().enumerate() {
        out[permute_tile_type(i as u8, perm) as usize] = c;
    }
    out
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Short text names for tile types.
const TILE_NAMES: [&str; NUM_TILE_TYPES] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "1p", "2p", "3p", "4p", "5p", "6p", "7p",
    "8p", "9p", "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", "E", "S", "W", "N", "P", "F",
    "C",
];

const HONOR_LETTERS: [&str; 7] = ["E", "S", "W", "N", "P", "F", "C"];

/// Returns the short text name for a tile type (0-33).
/// Out-of-range values return "??".
#[inline]
pub fn tile_type_name(tile_type: u8) -> &'static str {
    TILE_NAMES.get(tile_type as usize).copied().unwrap_or("??")
}

/// Compact listing of a histogram, e.g. `"123m 55p EEE"`.
pub fn counts_to_string(counts: &Counts34) -> String {
    let mut groups: Vec<String> = Vec::new();
    for suit in [Suit::Manzu, Suit::Pinzu, Suit::Souzu] {
        let start = suit.start() as usize;
        let mut digits = String::new();
        for n in 0..NUM_SUIT_TILES {
            for _ in 0..counts[start + n] {
                digits.push(char::from(b'1' + n as u8));
            }
        }
        if !digits.is_empty() {
            let suffix = match suit {
                Suit::Manzu => 'm',
                Suit::Pinzu => 'p',
                _ => 's',
            };
            digits.push(suffix);
            groups.push(digits);
        }
    }
    let mut honors = String::new();
    for i in JIHAI_START as usize..NUM_TILE_TYPES {
        for _ in 0..counts[i] {
            honors.push_str(TILE_NAMES[i]);
        }
    }
    if !honors.is_empty() {
        groups.push(honors);
    }
    groups.join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Tile {
        s.parse().unwrap()
    }

    #[test]
    fn tile_type_new_valid() {
        for i in 0..34u8 {
            assert!(
                TileType::new(i).is_some(),
                "TileType::new({i}) should be Some"
            );
        }
        assert!(TileType::new(34).is_none());
        assert!(TileType::new(255).is_none());
    }

    #[test]
    fn suit_classification() {
        for i in 0..9u8 {
            let t = TileType::new(i).unwrap();
            assert_eq!(t.suit(), Suit::Manzu, "tile {i} should be Manzu");
            assert!(t.is_suited());
            assert!(!t.is_honor());
        }
        for i in 9..18u8 {
            assert_eq!(TileType::new(i).unwrap().suit(), Suit::Pinzu, "tile {i} should be Pinzu");
        }
        for i in 18..27u8 {
            assert_eq!(TileType::new(i).unwrap().suit(), Suit::Souzu, "tile {i} should be Souzu");
        }
        for i in 27..34u8 {
            let t = TileType::new(i).unwrap();
            assert_eq!(t.suit(), Suit::Jihai, "tile {i} should be Jihai");
            assert!(t.is_honor());
            assert!(!t.is_suited());
        }
    }

    #[test]
    fn terminal_and_simple_detection() {
        for &i in &[0u8, 8, 9, 17, 18, 26] {
            let t = TileType::new(i).unwrap();
            assert!(t.is_terminal(), "tile {i} should be terminal");
            assert!(t.is_terminal_or_honor());
            assert!(!t.is_simple());
        }
        for &i in &[1u8, 4, 10, 14, 19, 23] {
            let t = TileType::new(i).unwrap();
            assert!(!t.is_terminal(), "tile {i} should NOT be terminal");
            assert!(t.is_simple());
        }
        for i in 27..34u8 {
            let t = TileType::new(i).unwrap();
            assert!(!t.is_terminal());
            assert!(t.is_terminal_or_honor());
            assert_eq!(t.is_dragon(), i >= HAKU);
        }
        assert_eq!(
            YAOCHUU.iter().filter(|&&k| is_yaochuu(k)).count(),
            13,
            "every listed yaochuu tile classifies as one"
        );
    }

    #[test]
    fn next_dora_examples() {
        // West indicator -> North
        assert_eq!(next_dora_kind(WEST), NORTH);
        // North wraps to East
        assert_eq!(next_dora_kind(NORTH), EAST);
        // 9 of each suit wraps to 1 of the same suit
        assert_eq!(next_dora_kind(8), 0);
        assert_eq!(next_dora_kind(17), 9);
        assert_eq!(next_dora_kind(26), 18);
        // Chun wraps to haku
        assert_eq!(next_dora_kind(CHUN), HAKU);
        assert_eq!(next_dora_kind(99), 99);
        assert_eq!(TileType::new(4).unwrap().next_dora(), TileType::new(5).unwrap());
    }

    #[test]
    fn next_dora_cycles_return_home() {
        for k in 0..34u8 {
            let period = match k {
                0..=26 => 9,
                27..=30 => 4,
                _ => 3,
            };
            let mut cur = k;
            for step in 1..=period {
                cur = next_dora_kind(cur);
                if step < period {
                    assert_ne!(cur, k, "tile {k} returned early after {step} steps");
                }
            }
            assert_eq!(cur, k, "tile {k} should cycle in {period} steps");
        }
    }

    #[test]
    fn parse_kind_and_composite_forms() {
        assert_eq!(t("5m").kind().id(), 4);
        assert_eq!(t("5m").copy(), None);
        assert_eq!(t("5m2").copy(), Some(2));
        assert_eq!(t("5m2").kind(), t("5m").kind());
        assert!(t("0p").is_red());
        assert!(t("5sr").is_red());
        assert!(!t("5s1").is_red());
        assert!(t("5m0").is_red());
        assert_eq!(t("E").kind().id(), EAST);
        assert_eq!(t("7z").kind().id(), CHUN);
        assert!("8z".parse::<Tile>().is_err());
        assert!("0z".parse::<Tile>().is_err());
        assert!("3mr".parse::<Tile>().is_err());
        assert!("5m7".parse::<Tile>().is_err());
        assert!("m5".parse::<Tile>().is_err());
        assert!("0m1".parse::<Tile>().is_err());
        assert!("0pr".parse::<Tile>().is_err());
    }

    #[test]
    fn tile136_round_trip_and_aka() {
        for id in 0..136u8 {
            let tile = Tile::from_136(id).unwrap();
            assert_eq!(tile.to_136(), Some(id));
            assert_eq!(tile.is_red(), matches!(id, 16 | 52 | 88), "red flag of {id}");
        }
        assert!(Tile::from_136(136).is_err());
        assert_eq!(tile136_to_type(52).id(), 13);
    }

    #[test]
    fn counts_reject_fifth_copy_and_duplicate_copy() {
        let four = vec![t("1m"); 4];
        assert_eq!(counts_from_tiles(&four).unwrap()[0], 4);
        let five = vec![t("1m"); 5];
        assert!(matches!(
            counts_from_tiles(&five),
            Err(RiichiError::MalformedHand { .. })
        ));
        assert!(counts_from_tiles(&[t("0m"), t("5mr")]).is_err());
        assert!(counts_from_tiles(&[t("0m"), t("5m"), t("5m1")]).is_ok());
    }

    #[test]
    fn validate_counts_flags_overflow() {
        let mut counts = [0u8; 34];
        counts[33] = 4;
        assert!(validate_counts(&counts).is_ok());
        counts[33] = 5;
        assert!(validate_counts(&counts).is_err());
    }

    #[test]
    fn permutation_is_bijection_and_keeps_honors() {
        for perm in &ALL_PERMUTATIONS {
            let mut seen = [false; NUM_TILE_TYPES];
            for i in 0..34u8 {
                let out = permute_tile_type(i, perm) as usize;
                assert!(!seen[out], "duplicate output {out} for perm {perm:?}");
                seen[out] = true;
                if i >= JIHAI_START {
                    assert_eq!(out as u8, i);
                }
            }
        }
        assert_eq!(permute_tile_type(0, &ALL_PERMUTATIONS[2]), 9);
    }

    #[test]
    fn display_names() {
        assert_eq!(format!("{}", TileType::new(0).unwrap()), "1m");
        assert_eq!(format!("{}", TileType::new(27).unwrap()), "E");
        assert_eq!(format!("{}", t("0s")), "5sr");
        assert_eq!(tile_type_name(99), "??");
        let mut counts = [0u8; 34];
        counts[0] = 1;
        counts[1] = 1;
        counts[2] = 1;
        counts[13] = 2;
        counts[EAST as usize] = 3;
        assert_eq!(counts_to_string(&counts), "123m 55p EEE");
    }
}
