use serde::{Deserialize, Serialize};

use crate::rule::GameRule;

/// Payment breakdown for one win. `total` is what the winner collects,
/// honba and riichi deposits included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub total: u32,
    pub pay_ron: u32,
    pub pay_tsumo_oya: u32,
    pub pay_tsumo_ko: u32,
}

/// Named scoring tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitHand {
    #[default]
    None,
    Mangan,
    Haneman,
    Baiman,
    Sanbaiman,
    /// 13+ han from regular yaku and dora.
    KazoeYakuman,
    /// Pattern yakuman, with the multiplier.
    Yakuman(u32),
}

/// Base points and tier for a non-yakuman hand.
pub fn base_points(han: u32, fu: u32, rule: &GameRule) -> (u32, LimitHand) {
    match han {
        0 => (0, LimitHand::None),
        13.. if rule.counted_yakuman => (8000, LimitHand::KazoeYakuman),
        11.. => (6000, LimitHand::Sanbaiman),
        8..=10 => (4000, LimitHand::Baiman),
        6 | 7 => (3000, LimitHand::Haneman),
        5 => (2000, LimitHand::Mangan),
        _ => {
            let fu = round_up_fu(fu);
            let kiriage = rule.kiriage_mangan
                && ((han == 4 && fu == 30) || (han == 3 && fu == 60));
            let bp = fu * 2u32.pow(han + 2);
            if bp >= 2000 || kiriage {
                (2000, LimitHand::Mangan)
            } else {
                (bp, LimitHand::None)
            }
        }
    }
}

/// Base points for `count` stacked yakuman.
pub fn yakuman_base_points(count: u32) -> (u32, LimitHand) {
    (8000 * count, LimitHand::Yakuman(count))
}

/// Payments under default rules. 13+ han counts as `han / 13` yakuman.
pub fn calculate_score(
    han: u32,
    fu: u32,
    is_oya: bool,
    is_tsumo: bool,
    honba: u32,
    num_players: u8,
) -> Score {
    let (base, _) = if han >= 13 {
        yakuman_base_points(han / 13)
    } else {
        base_points(han, fu, &GameRule::default())
    };
    make_score_result(base, is_oya, is_tsumo, honba, 0, num_players)
}

/// Converts base points into transfers. Each tsumo payer's share is rounded
/// separately; in three-player games one non-dealer seat is missing.
pub fn make_score_result(
    base_points: u32,
    is_oya: bool,
    is_tsumo: bool,
    honba: u32,
    riichi_sticks: u32,
    num_players: u8,
) -> Score {
    let payers = u32::from(num_players.max(2)) - 1;
    let deposits = riichi_sticks * 1000;

    if !is_tsumo {
        let ron = if is_oya {
            ceil_100(base_points * 6)
        } else {
            ceil_100(base_points * 4)
        } + honba * 300;
        return Score {
            total: ron + deposits,
            pay_ron: ron,
            pay_tsumo_oya: 0,
            pay_tsumo_ko: 0,
        };
    }

    let (pay_oya, pay_ko) = if is_oya {
        (0, ceil_100(base_points * 2) + honba * 100)
    } else {
        (
            ceil_100(base_points * 2) + honba * 100,
            ceil_100(base_points) + honba * 100,
        )
    };
    let collected = if is_oya {
        pay_ko * payers
    } else {
        pay_oya + pay_ko * (payers - 1)
    };

    Score {
        total: collected + deposits,
        pay_ron: 0,
        pay_tsumo_oya: pay_oya,
        pay_tsumo_ko: pay_ko,
    }
}

/// Seven pairs keeps its fixed 25.
pub fn round_up_fu(fu: u32) -> u32 {
    if fu == 25 {
        return 25;
    }
    fu.div_ceil(10) * 10
}

pub fn ceil_100(val: u32) -> u32 {
    val.div_ceil(100) * 100
}
