use serde::{Deserialize, Serialize};

use crate::errors::{RiichiError, RiichiResult};
use crate::tile::{Tile, TileType, EAST, NUM_TILE_TYPES};

pub const TILE_MAX: usize = NUM_TILE_TYPES;

/// Most tiles a concealed hand can hold with `meld_count` fixed melds.
#[inline]
pub const fn max_concealed(meld_count: u8) -> usize {
    14 - 3 * meld_count as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldType {
    Chi = 0,
    Pon = 1,
    Daiminkan = 2,
    Ankan = 3,
    Kakan = 4,
}

impl MeldType {
    pub const fn is_kan(self) -> bool {
        matches!(self, MeldType::Daiminkan | MeldType::Ankan | MeldType::Kakan)
    }

    const fn tile_count(self) -> usize {
        if self.is_kan() {
            4
        } else {
            3
        }
    }
}

/// Represents wind directions in mahjong, used for player seats and round wind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Wind {
    #[default]
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Wind {
    /// Histogram index of this wind's tile.
    pub const fn tile(self) -> u8 {
        EAST + self as u8
    }
}

impl From<u8> for Wind {
    fn from(val: u8) -> Self {
        match val % 4 {
            0 => Wind::East,
            1 => Wind::South,
            2 => Wind::West,
            _ => Wind::North,
        }
    }
}

/// A called or declared group. Immutable once built: construction checks that
/// the tiles really form the declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    meld_type: MeldType,
    tiles: Vec<Tile>,
}

impl Meld {
    pub fn new(meld_type: MeldType, mut tiles: Vec<Tile>) -> RiichiResult<Self> {
        let invalid = |message: String| RiichiError::InvalidMeld { message };
        if tiles.len() != meld_type.tile_count() {
            return Err(invalid(format!(
                "{meld_type:?} needs {} tiles, got {}",
                meld_type.tile_count(),
                tiles.len()
            )));
        }
        tiles.sort_by_key(|t| (t.kind(), t.copy()));
        let first = tiles[0].kind();
        match meld_type {
            MeldType::Chi => {
                let ids: Vec<u8> = tiles.iter().map(|t| t.kind().id()).collect();
                let is_run = first.is_suited()
                    && first.id() % 9 <= 6
                    && ids[1] == ids[0] + 1
                    && ids[2] == ids[0] + 2;
                if !is_run {
                    return Err(invalid(format!(
                        "chi tiles {} {} {} are not a suited run",
                        tiles[0], tiles[1], tiles[2]
                    )));
                }
            }
            _ => {
                if tiles.iter().any(|t| t.kind() != first) {
                    return Err(invalid(format!("{meld_type:?} mixes tile kinds")));
                }
            }
        }
        Ok(Self { meld_type, tiles })
    }

    /// Convenience constructor from kinds only.
    pub fn from_kinds(meld_type: MeldType, kinds: &[u8]) -> RiichiResult<Self> {
        let tiles = kinds
            .iter()
            .map(|&k| Tile::from_index(k))
            .collect::<RiichiResult<Vec<_>>>()?;
        Self::new(meld_type, tiles)
    }

    pub fn meld_type(&self) -> MeldType {
        self.meld_type
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Lowest kind in the meld (the kind itself for triplets and quads).
    pub fn base(&self) -> TileType {
        self.tiles[0].kind()
    }

    /// Everything except a closed kan exposes the hand.
    pub fn is_open(&self) -> bool {
        self.meld_type != MeldType::Ankan
    }

    pub fn is_kan(&self) -> bool {
        self.meld_type.is_kan()
    }
}

/// Situational context for one win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conditions {
    pub tsumo: bool,
    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    pub haitei: bool,
    pub houtei: bool,
    pub rinshan: bool,
    pub player_wind: Wind,
    pub round_wind: Wind,
    pub chankan: bool,
    /// Uninterrupted first draw: tenhou for the dealer, chiihou otherwise.
    pub tsumo_first_turn: bool,
    pub riichi_sticks: u32,
    pub honba: u32,
    pub num_players: u8,
    pub dora_indicators: Vec<Tile>,
    /// Back-dora indicators, only counted for riichi hands.
    pub ura_indicators: Vec<Tile>,
}

impl Conditions {
    /// The East seat deals.
    pub fn is_dealer(&self) -> bool {
        self.player_wind == Wind::East
    }
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            tsumo: false,
            riichi: false,
            double_riichi: false,
            ippatsu: false,
            haitei: false,
            houtei: false,
            rinshan: false,
            player_wind: Wind::East,
            round_wind: Wind::East,
            chankan: false,
            tsumo_first_turn: false,
            riichi_sticks: 0,
            honba: 0,
            num_players: 4,
            dora_indicators: Vec::new(),
            ura_indicators: Vec::new(),
        }
    }
}
