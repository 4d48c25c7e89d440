use serde::{Deserialize, Serialize};

use crate::agari::{self, HandShape};
use crate::errors::{RiichiError, RiichiResult};
use crate::rule::GameRule;
use crate::score::{self, LimitHand, Score};
use crate::shanten::MAX_MELDS;
use crate::tile::{count_red, counts_from_tiles, next_dora_kind, Counts34, Tile};
use crate::types::{max_concealed, Conditions, Meld};
use crate::yaku::{self, YakuContext, YakuEntry};

/// Full valuation of one win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Legal win: a winning shape with at least one yaku.
    pub is_win: bool,
    pub has_win_shape: bool,
    pub yakuman: bool,
    /// Total han, dora included.
    pub han: u32,
    pub fu: u32,
    pub yaku: Vec<YakuEntry>,
    pub dora: u32,
    pub aka_dora: u32,
    pub ura_dora: u32,
    pub limit: LimitHand,
    pub base_points: u32,
    pub score: Score,
    pub shape: Option<HandShape>,
}

impl ScoreResult {
    fn dora_total(&self) -> u32 {
        self.dora + self.aka_dora + self.ura_dora
    }
}

pub struct HandEvaluator {
    concealed: Vec<Tile>,
    melds: Vec<Meld>,
    /// Concealed kinds only.
    hand: Counts34,
}

impl HandEvaluator {
    pub fn hand_from_text(text: &str) -> RiichiResult<Self> {
        let (tiles, melds) = crate::parser::parse_hand(text)?;
        Self::new(&tiles, &melds)
    }

    pub fn new(concealed: &[Tile], melds: &[Meld]) -> RiichiResult<Self> {
        if melds.len() > MAX_MELDS as usize {
            return Err(RiichiError::malformed(format!("{} melds", melds.len())));
        }
        if concealed.len() > max_concealed(melds.len() as u8) {
            return Err(RiichiError::malformed(format!(
                "{} concealed tiles with {} melds",
                concealed.len(),
                melds.len()
            )));
        }
        let mut all = concealed.to_vec();
        all.extend(melds.iter().flat_map(|m| m.tiles().iter().copied()));
        counts_from_tiles(&all)?;

        Ok(Self {
            concealed: concealed.to_vec(),
            melds: melds.to_vec(),
            hand: counts_from_tiles(concealed)?,
        })
    }

    /// Scores the hand completed by `win_tile`.
    pub fn calc(
        &self,
        win_tile: Tile,
        conditions: &Conditions,
        rule: &GameRule,
    ) -> RiichiResult<ScoreResult> {
        if !matches!(conditions.num_players, 3 | 4) {
            return Err(RiichiError::malformed(format!(
                "{} players",
                conditions.num_players
            )));
        }
        let tiles = agari::concealed_with_win(&self.concealed, &self.melds, win_tile)?;
        let counts = counts_from_tiles(&tiles)?;

        let mut all = tiles.clone();
        all.extend(self.melds.iter().flat_map(|m| m.tiles().iter().copied()));
        let full = counts_from_tiles(&all)?;

        let dora = count_dora(&full, &conditions.dora_indicators);
        let ura_dora = if conditions.riichi || conditions.double_riichi {
            count_dora(&full, &conditions.ura_indicators)
        } else {
            0
        };
        let aka_dora = if rule.red_fives {
            u32::from(count_red(&all))
        } else {
            0
        };

        let shapes = agari::shapes_from_counts(&counts, &self.melds, win_tile.kind().id());
        if shapes.is_empty() {
            log::warn!(
                "no winning shape for {} + {}; scoring dora only",
                crate::tile::counts_to_string(&self.hand),
                win_tile
            );
            let mut res = ScoreResult {
                dora,
                aka_dora,
                ura_dora,
                ..ScoreResult::default()
            };
            res.han = res.dora_total();
            return Ok(res);
        }

        let ctx = YakuContext::new(conditions, rule);
        let best = shapes
            .into_iter()
            .map(|shape| self.value_shape(shape, &full, &ctx, conditions, (dora, aka_dora, ura_dora)))
            .max_by_key(|r| (r.is_win, r.score.total, r.han, r.fu));

        Ok(best.unwrap_or_default())
    }

    fn value_shape(
        &self,
        shape: HandShape,
        full: &Counts34,
        ctx: &YakuContext,
        conditions: &Conditions,
        (dora, aka_dora, ura_dora): (u32, u32, u32),
    ) -> ScoreResult {
        let yaku_res = yaku::evaluate_shape(&shape, full, ctx);
        let mut res = ScoreResult {
            has_win_shape: true,
            yakuman: yaku_res.yakuman_count > 0,
            fu: yaku_res.fu,
            dora,
            aka_dora,
            ura_dora,
            shape: Some(shape),
            ..ScoreResult::default()
        };

        // Dora alone is not a yaku.
        if yaku_res.yaku.is_empty() {
            res.han = res.dora_total();
            return res;
        }

        let (base, limit) = if res.yakuman {
            res.han = yaku_res.han;
            score::yakuman_base_points(yaku_res.yakuman_count)
        } else {
            res.han = yaku_res.han + res.dora_total();
            score::base_points(res.han, res.fu, &ctx.rule)
        };

        res.is_win = true;
        res.yaku = yaku_res.yaku;
        res.limit = limit;
        res.base_points = base;
        res.score = score::make_score_result(
            base,
            ctx.is_dealer,
            ctx.is_tsumo,
            conditions.honba,
            conditions.riichi_sticks,
            conditions.num_players,
        );
        res
    }

    /// True if the concealed part is one tile short of a finished hand.
    pub fn is_tenpai(&self) -> bool {
        !self.waits().is_empty()
    }

    /// Kinds that finish the hand and still have an unseen copy.
    pub fn waits(&self) -> Vec<u8> {
        if self.concealed.len() + 1 != max_concealed(self.melds.len() as u8) {
            return Vec::new();
        }
        agari::live_waits(&self.hand, &agari::meld_counts(&self.melds))
    }
}

fn count_dora(full: &Counts34, indicators: &[Tile]) -> u32 {
    indicators
        .iter()
        .map(|ind| u32::from(full[next_dora_kind(ind.kind().id()) as usize]))
        .sum()
}

/// Scores a win. A hand without a winning shape yields a zero-payment result
/// carrying only its dora; a shape without yaku is flagged `is_win == false`.
pub fn score(
    concealed: &[Tile],
    melds: &[Meld],
    win_tile: Tile,
    conditions: &Conditions,
    rule: &GameRule,
) -> RiichiResult<ScoreResult> {
    HandEvaluator::new(concealed, melds)?.calc(win_tile, conditions, rule)
}
