//! Hand-text notation.
//!
//! `"123m456p0s(p555z)(k1111m)"`: digits followed by a suit letter, `0` for a
//! red five, parenthesized groups for melds. Meld prefixes: none = chi,
//! `p` = pon, `k` = closed kan (`k...1` with a trailing digit = open kan),
//! `s` = added kan. Every tile gets a distinct physical copy; red fives take
//! copy 0 and plain fives prefer the other copies.

use std::iter::Peekable;
use std::str::Chars;

use crate::errors::{RiichiError, RiichiResult};
use crate::tile::{Suit, Tile, TileType, AKA_COPY, COPIES_PER_KIND, NUM_TILE_TYPES};
use crate::types::{Meld, MeldType};

/// Hands out unused physical copies so a parsed hand never repeats one.
struct CopyAllocator {
    used: [[bool; COPIES_PER_KIND as usize]; NUM_TILE_TYPES],
}

impl CopyAllocator {
    fn new() -> Self {
        Self {
            used: [[false; COPIES_PER_KIND as usize]; NUM_TILE_TYPES],
        }
    }

    fn take(&mut self, kind: TileType, red: bool) -> Result<Tile, String> {
        let is_five = kind.is_suited() && kind.id() % 9 == 4;
        let order: &[u8] = match (is_five, red) {
            (true, true) => &[AKA_COPY],
            (true, false) => &[1, 2, 3, AKA_COPY],
            (false, _) => &[0, 1, 2, 3],
        };
        let copy = order
            .iter()
            .copied()
            .find(|&c| !self.used[kind.index()][c as usize])
            .ok_or_else(|| format!("no more copies of {kind}"))?;
        self.used[kind.index()][copy as usize] = true;
        Tile::with_copy(kind, copy).map_err(|e| e.to_string())
    }
}

/// Parses hand text into concealed tiles and melds.
pub fn parse_hand(text: &str) -> RiichiResult<(Vec<Tile>, Vec<Meld>)> {
    let err = |message: String| RiichiError::Parse {
        input: text.to_string(),
        message,
    };
    let mut alloc = CopyAllocator::new();
    let mut tiles = Vec::new();
    let mut melds = Vec::new();

    let mut chars = text.chars().peekable();
    let mut pending: Vec<u8> = Vec::new();

    while let Some(c) = chars.next() {
        if c == '(' {
            if !pending.is_empty() {
                return Err(err("digits without suit before meld".to_string()));
            }
            melds.push(parse_meld(&mut chars, &mut alloc)?);
        } else if let Some(d) = c.to_digit(10) {
            pending.push(d as u8);
        } else if let Some(suit) = suit_of(c) {
            for &d in &pending {
                let (kind, red) = kind_of(suit, d).map_err(&err)?;
                tiles.push(alloc.take(kind, red).map_err(&err)?);
            }
            pending.clear();
        } else if !c.is_whitespace() {
            return Err(err(format!("unexpected character '{c}'")));
        }
    }

    if !pending.is_empty() {
        return Err(err("pending digits without suit".to_string()));
    }

    Ok((tiles, melds))
}

/// Parses text holding exactly one tile.
pub fn parse_tile(text: &str) -> RiichiResult<Tile> {
    let (tiles, melds) = parse_hand(text)?;
    if !melds.is_empty() || tiles.len() != 1 {
        return Err(RiichiError::Parse {
            input: text.to_string(),
            message: format!(
                "expected exactly one tile, found {} tiles and {} melds",
                tiles.len(),
                melds.len()
            ),
        });
    }
    Ok(tiles[0])
}

fn suit_of(c: char) -> Option<Suit> {
    match c {
        'm' => Some(Suit::Manzu),
        'p' => Some(Suit::Pinzu),
        's' => Some(Suit::Souzu),
        'z' => Some(Suit::Jihai),
        _ => None,
    }
}

fn kind_of(suit: Suit, digit: u8) -> Result<(TileType, bool), String> {
    let (offset, red) = match (suit, digit) {
        (Suit::Jihai, 1..=7) => (digit - 1, false),
        (Suit::Jihai, _) => return Err(format!("honor digit {digit} out of range 1..=7")),
        (_, 0) => (4, true),
        (_, d) => (d - 1, false),
    };
    TileType::new(suit.start() + offset)
        .map(|k| (k, red))
        .ok_or_else(|| format!("tile {digit} out of range"))
}

fn parse_meld(chars: &mut Peekable<Chars>, alloc: &mut CopyAllocator) -> RiichiResult<Meld> {
    let mut content = String::new();
    let mut closed = false;
    for c in chars.by_ref() {
        if c == ')' {
            closed = true;
            break;
        }
        content.push(c);
    }
    let err = |message: String| RiichiError::Parse {
        input: content.clone(),
        message,
    };
    if !closed {
        return Err(err("unterminated meld".to_string()));
    }

    let (prefix, rest) = match content.chars().next() {
        Some(p @ ('p' | 'k' | 's')) => (Some(p), &content[1..]),
        _ => (None, content.as_str()),
    };

    let digits: Vec<u8> = rest
        .chars()
        .map_while(|c| c.to_digit(10).map(|d| d as u8))
        .collect();
    let mut tail = rest.chars().skip(digits.len());
    let suit = tail
        .next()
        .and_then(suit_of)
        .ok_or_else(|| err("missing suit in meld".to_string()))?;
    let called = tail.next().is_some_and(|c| c.is_ascii_digit() && c != '0');

    let meld_type = match prefix {
        None => MeldType::Chi,
        Some('p') => MeldType::Pon,
        Some('k') if called => MeldType::Daiminkan,
        Some('k') => MeldType::Ankan,
        _ => MeldType::Kakan,
    };

    let mut tiles = Vec::new();
    if meld_type == MeldType::Chi {
        if digits.len() != 3 {
            return Err(err("chi needs three digits".to_string()));
        }
        for &d in &digits {
            let (kind, red) = kind_of(suit, d).map_err(&err)?;
            tiles.push(alloc.take(kind, red).map_err(&err)?);
        }
    } else {
        let first = *digits
            .first()
            .ok_or_else(|| err("meld without tiles".to_string()))?;
        let (kind, red) = kind_of(suit, first).map_err(&err)?;
        let size = if meld_type.is_kan() { 4 } else { 3 };
        if red {
            tiles.push(alloc.take(kind, true).map_err(&err)?);
        }
        while tiles.len() < size {
            tiles.push(alloc.take(kind, false).map_err(&err)?);
        }
    }

    Meld::new(meld_type, tiles)
}
