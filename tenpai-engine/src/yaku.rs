use serde::{Deserialize, Serialize};

use crate::agari::{Group, HandShape, StandardShape, WinGroup};
use crate::rule::GameRule;
use crate::tile::{
    is_number_terminal, is_yaochuu, Counts34, CHUN, HAKU, HATSU, JIHAI_START, NUM_TILE_TYPES,
};
use crate::types::Conditions;

/// Scoring patterns. Ids follow the Mahjong Soul numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Yaku {
    MenzenTsumo,
    Riichi,
    Chankan,
    Rinshan,
    Haitei,
    Houtei,
    Haku,
    Hatsu,
    Chun,
    SeatWind,
    RoundWind,
    Tanyao,
    Iipeikou,
    Pinfu,
    Chanta,
    Ittsu,
    SanshokuDoujun,
    DoubleRiichi,
    SanshokuDoukou,
    Sankantsu,
    Toitoi,
    Sanankou,
    Shousangen,
    Honroutou,
    Chiitoitsu,
    Junchan,
    Honitsu,
    Ryanpeikou,
    Chinitsu,
    Ippatsu,
    Tenhou,
    Chiihou,
    Daisangen,
    Suuankou,
    Tsuuiisou,
    Ryuuiisou,
    Chinroutou,
    ChuurenPoutou,
    Kokushi,
    Shousuushii,
    Suukantsu,
    JunseiChuuren,
    SuuankouTanki,
    Kokushi13,
    Daisuushii,
}

impl Yaku {
    pub const fn id(self) -> u32 {
        match self {
            Yaku::MenzenTsumo => 1,
            Yaku::Riichi => 2,
            Yaku::Chankan => 3,
            Yaku::Rinshan => 4,
            Yaku::Haitei => 5,
            Yaku::Houtei => 6,
            Yaku::Haku => 7,
            Yaku::Hatsu => 8,
            Yaku::Chun => 9,
            Yaku::SeatWind => 10,
            Yaku::RoundWind => 11,
            Yaku::Tanyao => 12,
            Yaku::Iipeikou => 13,
            Yaku::Pinfu => 14,
            Yaku::Chanta => 15,
            Yaku::Ittsu => 16,
            Yaku::SanshokuDoujun => 17,
            Yaku::DoubleRiichi => 18,
            Yaku::SanshokuDoukou => 19,
            Yaku::Sankantsu => 20,
            Yaku::Toitoi => 21,
            Yaku::Sanankou => 22,
            Yaku::Shousangen => 23,
            Yaku::Honroutou => 24,
            Yaku::Chiitoitsu => 25,
            Yaku::Junchan => 26,
            Yaku::Honitsu => 27,
            Yaku::Ryanpeikou => 28,
            Yaku::Chinitsu => 29,
            Yaku::Ippatsu => 30,
            Yaku::Tenhou => 35,
            Yaku::Chiihou => 36,
            Yaku::Daisangen => 37,
            Yaku::Suuankou => 38,
            Yaku::Tsuuiisou => 39,
            Yaku::Ryuuiisou => 40,
            Yaku::Chinroutou => 41,
            Yaku::Kokushi => 42,
            Yaku::Shousuushii => 43,
            Yaku::Suukantsu => 44,
            Yaku::ChuurenPoutou => 45,
            Yaku::JunseiChuuren => 47,
            Yaku::SuuankouTanki => 48,
            Yaku::Kokushi13 => 49,
            Yaku::Daisuushii => 50,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Yaku::MenzenTsumo => "Menzen Tsumo",
            Yaku::Riichi => "Riichi",
            Yaku::Chankan => "Chankan",
            Yaku::Rinshan => "Rinshan Kaihou",
            Yaku::Haitei => "Haitei Raoyue",
            Yaku::Houtei => "Houtei Raoyui",
            Yaku::Haku => "Yakuhai (Haku)",
            Yaku::Hatsu => "Yakuhai (Hatsu)",
            Yaku::Chun => "Yakuhai (Chun)",
            Yaku::SeatWind => "Yakuhai (Seat Wind)",
            Yaku::RoundWind => "Yakuhai (Round Wind)",
            Yaku::Tanyao => "Tanyao",
            Yaku::Iipeikou => "Iipeikou",
            Yaku::Pinfu => "Pinfu",
            Yaku::Chanta => "Chanta",
            Yaku::Ittsu => "Ittsu",
            Yaku::SanshokuDoujun => "Sanshoku Doujun",
            Yaku::DoubleRiichi => "Double Riichi",
            Yaku::SanshokuDoukou => "Sanshoku Doukou",
            Yaku::Sankantsu => "Sankantsu",
            Yaku::Toitoi => "Toitoi",
            Yaku::Sanankou => "Sanankou",
            Yaku::Shousangen => "Shousangen",
            Yaku::Honroutou => "Honroutou",
            Yaku::Chiitoitsu => "Chiitoitsu",
            Yaku::Junchan => "Junchan",
            Yaku::Honitsu => "Honitsu",
            Yaku::Ryanpeikou => "Ryanpeikou",
            Yaku::Chinitsu => "Chinitsu",
            Yaku::Ippatsu => "Ippatsu",
            Yaku::Tenhou => "Tenhou",
            Yaku::Chiihou => "Chiihou",
            Yaku::Daisangen => "Daisangen",
            Yaku::Suuankou => "Suuankou",
            Yaku::Tsuuiisou => "Tsuuiisou",
            Yaku::Ryuuiisou => "Ryuuiisou",
            Yaku::Chinroutou => "Chinroutou",
            Yaku::ChuurenPoutou => "Chuuren Poutou",
            Yaku::Kokushi => "Kokushi Musou",
            Yaku::Shousuushii => "Shousuushii",
            Yaku::Suukantsu => "Suukantsu",
            Yaku::JunseiChuuren => "Junsei Chuuren Poutou",
            Yaku::SuuankouTanki => "Suuankou Tanki",
            Yaku::Kokushi13 => "Kokushi Musou 13-wait",
            Yaku::Daisuushii => "Daisuushii",
        }
    }
}

/// One scored pattern and what it contributed. Yakuman entries carry
/// 13 han per yakuman.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YakuEntry {
    pub yaku: Yaku,
    pub han: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YakuResult {
    pub han: u32,
    pub fu: u32,
    pub yaku: Vec<YakuEntry>,
    pub yakuman_count: u32,
}

impl YakuResult {
    fn push(&mut self, yaku: Yaku, han: u32) {
        self.han += han;
        self.yaku.push(YakuEntry { yaku, han });
    }

    fn push_yakuman(&mut self, yaku: Yaku, count: u32) {
        self.yakuman_count += count;
        self.push(yaku, 13 * count);
    }

    pub fn has(&self, yaku: Yaku) -> bool {
        self.yaku.iter().any(|e| e.yaku == yaku)
    }
}

/// Everything about the win that is not the tiles themselves.
#[derive(Debug, Clone)]
pub struct YakuContext {
    pub is_tsumo: bool,
    pub is_reach: bool,
    pub is_daburu_reach: bool,
    pub is_ippatsu: bool,
    pub is_haitei: bool,
    pub is_houtei: bool,
    pub is_rinshan: bool,
    pub is_chankan: bool,
    pub is_tsumo_first_turn: bool,
    pub is_dealer: bool,
    pub round_wind: u8, // 27=East, 28=South, etc.
    pub seat_wind: u8,
    pub rule: GameRule,
}

impl YakuContext {
    pub fn new(cond: &Conditions, rule: &GameRule) -> Self {
        Self {
            is_tsumo: cond.tsumo,
            is_reach: cond.riichi || cond.double_riichi,
            is_daburu_reach: cond.double_riichi,
            is_ippatsu: cond.ippatsu,
            is_haitei: cond.haitei,
            is_houtei: cond.houtei,
            is_rinshan: cond.rinshan,
            is_chankan: cond.chankan,
            is_tsumo_first_turn: cond.tsumo_first_turn,
            is_dealer: cond.is_dealer(),
            round_wind: cond.round_wind.tile(),
            seat_wind: cond.player_wind.tile(),
            rule: *rule,
        }
    }

    fn is_yakuhai_tile(&self, tile: u8) -> bool {
        tile >= HAKU || tile == self.round_wind || tile == self.seat_wind
    }
}

impl Default for YakuContext {
    fn default() -> Self {
        Self::new(&Conditions::default(), &GameRule::default())
    }
}

/// Yaku and fu for one reading of the hand. `full` counts every tile of the
/// hand, meld tiles included. Dora is not counted here.
pub fn evaluate_shape(shape: &HandShape, full: &Counts34, ctx: &YakuContext) -> YakuResult {
    match shape {
        HandShape::Standard(st) => evaluate_standard(st, full, ctx),
        HandShape::SevenPairs { .. } => evaluate_seven_pairs(full, ctx),
        HandShape::ThirteenOrphans { thirteen_wait, .. } => {
            let mut res = YakuResult::default();
            if *thirteen_wait {
                let count = if ctx.rule.is_kokushi_musou_13machi_double { 2 } else { 1 };
                res.push_yakuman(Yaku::Kokushi13, count);
            } else {
                res.push_yakuman(Yaku::Kokushi, 1);
            }
            apply_first_turn(&mut res, ctx, true);
            res.fu = 30;
            res
        }
    }
}

fn evaluate_seven_pairs(full: &Counts34, ctx: &YakuContext) -> YakuResult {
    let mut res = YakuResult::default();
    if is_tsuu_iisou(full) {
        res.push_yakuman(Yaku::Tsuuiisou, 1);
    }
    apply_first_turn(&mut res, ctx, true);
    res.fu = 25;
    if res.yakuman_count > 0 {
        return res;
    }

    res.push(Yaku::Chiitoitsu, 2);
    apply_static_yaku(&mut res, ctx, true);
    if is_tanyao(full) {
        res.push(Yaku::Tanyao, 1);
    }
    if is_chinitsu(full) {
        res.push(Yaku::Chinitsu, 6);
    } else if is_honitsu(full) {
        res.push(Yaku::Honitsu, 3);
    }
    if is_honroutou(full) {
        res.push(Yaku::Honroutou, 2);
    }
    res
}

fn evaluate_standard(st: &StandardShape, full: &Counts34, ctx: &YakuContext) -> YakuResult {
    let menzen = st.is_menzen();

    let mut res = YakuResult::default();
    apply_yakuman(&mut res, st, full, ctx);
    if res.yakuman_count > 0 {
        res.fu = calculate_fu(st, ctx, false);
        return res;
    }

    apply_static_yaku(&mut res, ctx, menzen);

    if is_tanyao(full) && (menzen || ctx.rule.open_tanyao) {
        res.push(Yaku::Tanyao, 1);
    }

    let pinfu = check_pinfu(st, ctx);
    if pinfu {
        res.push(Yaku::Pinfu, 1);
    }
    res.fu = calculate_fu(st, ctx, pinfu);

    // Yakuhai: a double wind scores both entries.
    for g in st.groups.iter().filter(|g| g.is_pon_like()) {
        let t = g.base();
        match t {
            HAKU => res.push(Yaku::Haku, 1),
            HATSU => res.push(Yaku::Hatsu, 1),
            CHUN => res.push(Yaku::Chun, 1),
            _ => {}
        }
        if t == ctx.seat_wind {
            res.push(Yaku::SeatWind, 1);
        }
        if t == ctx.round_wind {
            res.push(Yaku::RoundWind, 1);
        }
    }

    let dragon_sets = count_pon_like(st, |t| t >= HAKU);
    if dragon_sets == 2 && st.pair >= HAKU {
        res.push(Yaku::Shousangen, 2);
    }

    if st.groups.iter().all(|g| g.is_pon_like()) {
        res.push(Yaku::Toitoi, 2);
    }
    if concealed_triplets(st, ctx.is_tsumo) == 3 {
        res.push(Yaku::Sanankou, 2);
    }
    if st.groups.iter().filter(|g| g.is_quad()).count() == 3 {
        res.push(Yaku::Sankantsu, 2);
    }

    if menzen {
        match identical_sequence_pairs(st) {
            2 => res.push(Yaku::Ryanpeikou, 3),
            1 => res.push(Yaku::Iipeikou, 1),
            _ => {}
        }
    }

    let closed_bonus = |closed: u32, open: u32| if menzen { closed } else { open };
    if check_ittsu(st) {
        res.push(Yaku::Ittsu, closed_bonus(2, 1));
    }
    if is_sanshoku_doujun(st) {
        res.push(Yaku::SanshokuDoujun, closed_bonus(2, 1));
    }
    if is_sanshoku_doukou(st) {
        res.push(Yaku::SanshokuDoukou, 2);
    }

    if is_chinitsu(full) {
        res.push(Yaku::Chinitsu, closed_bonus(6, 5));
    } else if is_honitsu(full) {
        res.push(Yaku::Honitsu, closed_bonus(3, 2));
    }

    if is_honroutou(full) {
        res.push(Yaku::Honroutou, 2);
    } else if is_junchan(st) {
        res.push(Yaku::Junchan, closed_bonus(3, 2));
    } else if is_chantai(st) {
        res.push(Yaku::Chanta, closed_bonus(2, 1));
    }

    res
}

fn apply_static_yaku(res: &mut YakuResult, ctx: &YakuContext, menzen: bool) {
    if ctx.is_daburu_reach {
        res.push(Yaku::DoubleRiichi, 2);
    } else if ctx.is_reach {
        res.push(Yaku::Riichi, 1);
    }
    if ctx.is_ippatsu && ctx.is_reach {
        res.push(Yaku::Ippatsu, 1);
    }
    if menzen && ctx.is_tsumo {
        res.push(Yaku::MenzenTsumo, 1);
    }
    if ctx.is_haitei && ctx.is_tsumo {
        res.push(Yaku::Haitei, 1);
    }
    if ctx.is_houtei && !ctx.is_tsumo {
        res.push(Yaku::Houtei, 1);
    }
    if ctx.is_rinshan && ctx.is_tsumo {
        res.push(Yaku::Rinshan, 1);
    }
    if ctx.is_chankan && !ctx.is_tsumo {
        res.push(Yaku::Chankan, 1);
    }
}

fn apply_first_turn(res: &mut YakuResult, ctx: &YakuContext, menzen: bool) {
    if ctx.is_tsumo_first_turn && ctx.is_tsumo && menzen {
        if ctx.is_dealer {
            res.push_yakuman(Yaku::Tenhou, 1);
        } else {
            res.push_yakuman(Yaku::Chiihou, 1);
        }
    }
}

fn apply_yakuman(res: &mut YakuResult, st: &StandardShape, full: &Counts34, ctx: &YakuContext) {
    let rule = &ctx.rule;
    let menzen = st.is_menzen();

    if count_pon_like(st, |t| t >= HAKU) == 3 {
        res.push_yakuman(Yaku::Daisangen, 1);
    }

    if concealed_triplets(st, ctx.is_tsumo) == 4 {
        if st.win_group == WinGroup::Pair {
            let count = if rule.is_suuankou_tanki_double { 2 } else { 1 };
            res.push_yakuman(Yaku::SuuankouTanki, count);
        } else {
            res.push_yakuman(Yaku::Suuankou, 1);
        }
    }

    let wind_sets = count_pon_like(st, |t| (JIHAI_START..HAKU).contains(&t));
    let wind_pair = (JIHAI_START..HAKU).contains(&st.pair);
    if wind_sets == 4 {
        let count = if rule.is_daisuushii_double { 2 } else { 1 };
        res.push_yakuman(Yaku::Daisuushii, count);
    } else if wind_sets == 3 && wind_pair {
        res.push_yakuman(Yaku::Shousuushii, 1);
    }

    if is_tsuu_iisou(full) {
        res.push_yakuman(Yaku::Tsuuiisou, 1);
    }
    if is_chinroutou(full) {
        res.push_yakuman(Yaku::Chinroutou, 1);
    }
    if is_ryuu_iisou(full) {
        res.push_yakuman(Yaku::Ryuuiisou, 1);
    }

    if st.groups.iter().all(|g| !g.is_open() && !g.is_quad()) && is_chuuren_poutou(full) {
        if is_chuuren_9_wait(full, st.win_tile) {
            let count = if rule.is_junsei_chuurenpoutou_double { 2 } else { 1 };
            res.push_yakuman(Yaku::JunseiChuuren, count);
        } else {
            res.push_yakuman(Yaku::ChuurenPoutou, 1);
        }
    }

    if st.groups.iter().filter(|g| g.is_quad()).count() == 4 {
        res.push_yakuman(Yaku::Suukantsu, 1);
    }

    apply_first_turn(res, ctx, menzen);
}

// ---------------------------------------------------------------------------
// Fu
// ---------------------------------------------------------------------------

/// Fu for a standard shape, rounded up to the next 10.
pub fn calculate_fu(st: &StandardShape, ctx: &YakuContext, pinfu: bool) -> u32 {
    if pinfu && ctx.is_tsumo {
        return 20;
    }

    let menzen = st.is_menzen();
    let mut fu: u32 = 20;
    if ctx.is_tsumo {
        fu += 2;
    } else if menzen {
        fu += 10;
    }

    if st.pair >= HAKU {
        fu += 2;
    }
    if st.pair == ctx.seat_wind {
        fu += 2;
    }
    if st.pair == ctx.round_wind {
        fu += 2;
    }

    fu += st.wait_fu(ctx.rule.single_wait_fu);

    for (idx, g) in st.groups.iter().enumerate() {
        if !g.is_pon_like() {
            continue;
        }
        let mut f = if st.is_concealed_group(idx, ctx.is_tsumo) {
            4
        } else {
            2
        };
        if is_yaochuu(g.base()) {
            f *= 2;
        }
        if g.is_quad() {
            f *= 4;
        }
        fu += f;
    }

    // Only an open ron hand with nothing else lands on exactly 20 here.
    if fu == 20 && ctx.rule.open_ron_30_fu {
        return 30;
    }
    fu.div_ceil(10) * 10
}

fn check_pinfu(st: &StandardShape, ctx: &YakuContext) -> bool {
    st.is_menzen()
        && st.groups.iter().all(|g| g.is_sequence())
        && !ctx.is_yakuhai_tile(st.pair)
        && st.wait == crate::agari::Wait::Ryanmen
        && !(ctx.rule.single_wait_fu && st.single_wait)
}

// ---------------------------------------------------------------------------
// Group patterns
// ---------------------------------------------------------------------------

fn count_pon_like(st: &StandardShape, pred: impl Fn(u8) -> bool) -> usize {
    st.groups
        .iter()
        .filter(|g| g.is_pon_like() && pred(g.base()))
        .count()
}

fn concealed_triplets(st: &StandardShape, tsumo: bool) -> usize {
    st.groups
        .iter()
        .enumerate()
        .filter(|(idx, g)| g.is_pon_like() && st.is_concealed_group(*idx, tsumo))
        .count()
}

fn identical_sequence_pairs(st: &StandardShape) -> usize {
    let mut bases: Vec<u8> = st
        .groups
        .iter()
        .filter(|g| g.is_sequence())
        .map(|g| g.base())
        .collect();
    bases.sort_unstable();
    let mut pairs = 0;
    let mut i = 0;
    while i + 1 < bases.len() {
        if bases[i] == bases[i + 1] {
            pairs += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    pairs
}

fn has_sequence(st: &StandardShape, base: u8) -> bool {
    st.groups
        .iter()
        .any(|g| matches!(g, Group::Sequence { base: b, .. } if *b == base))
}

fn check_ittsu(st: &StandardShape) -> bool {
    [0u8, 9, 18]
        .iter()
        .any(|&s| has_sequence(st, s) && has_sequence(st, s + 3) && has_sequence(st, s + 6))
}

fn is_sanshoku_doujun(st: &StandardShape) -> bool {
    (0u8..7).any(|i| has_sequence(st, i) && has_sequence(st, i + 9) && has_sequence(st, i + 18))
}

fn is_sanshoku_doukou(st: &StandardShape) -> bool {
    let has_set = |t: u8| st.groups.iter().any(|g| g.is_pon_like() && g.base() == t);
    (0u8..9).any(|i| has_set(i) && has_set(i + 9) && has_set(i + 18))
}

/// Group touches a 1 or 9 of a suit.
fn has_number_terminal(g: &Group) -> bool {
    match *g {
        Group::Sequence { base, .. } => base % 9 == 0 || base % 9 == 6,
        Group::Triplet { tile, .. } | Group::Quad { tile, .. } => is_number_terminal(tile),
    }
}

fn has_yaochuu(g: &Group) -> bool {
    has_number_terminal(g) || (g.is_pon_like() && g.base() >= JIHAI_START)
}

fn is_junchan(st: &StandardShape) -> bool {
    is_number_terminal(st.pair)
        && st.groups.iter().all(has_number_terminal)
        && st.groups.iter().any(|g| g.is_sequence())
}

fn is_chantai(st: &StandardShape) -> bool {
    let has_honor =
        st.pair >= JIHAI_START || st.groups.iter().any(|g| g.is_pon_like() && g.base() >= JIHAI_START);
    is_yaochuu(st.pair)
        && st.groups.iter().all(has_yaochuu)
        && st.groups.iter().any(|g| g.is_sequence())
        && has_honor
}

// ---------------------------------------------------------------------------
// Whole-hand patterns
// ---------------------------------------------------------------------------

fn present(full: &Counts34) -> impl Iterator<Item = u8> + '_ {
    (0..NUM_TILE_TYPES as u8).filter(move |&i| full[i as usize] > 0)
}

fn is_tanyao(full: &Counts34) -> bool {
    present(full).all(|t| !is_yaochuu(t))
}

fn is_honroutou(full: &Counts34) -> bool {
    present(full).all(is_yaochuu)
}

/// Suits present: bitmask over man/pin/sou, plus whether honors appear.
fn suit_profile(full: &Counts34) -> (u8, bool) {
    let mut suits = 0u8;
    let mut honors = false;
    for t in present(full) {
        if t >= JIHAI_START {
            honors = true;
        } else {
            suits |= 1 << (t / 9);
        }
    }
    (suits, honors)
}

fn is_honitsu(full: &Counts34) -> bool {
    let (suits, honors) = suit_profile(full);
    suits.count_ones() == 1 && honors
}

fn is_chinitsu(full: &Counts34) -> bool {
    let (suits, honors) = suit_profile(full);
    suits.count_ones() == 1 && !honors
}

fn is_tsuu_iisou(full: &Counts34) -> bool {
    present(full).all(|t| t >= JIHAI_START)
}

fn is_chinroutou(full: &Counts34) -> bool {
    present(full).all(is_number_terminal)
}

fn is_ryuu_iisou(full: &Counts34) -> bool {
    const GREEN: [u8; 6] = [19, 20, 21, 23, 25, HATSU];
    present(full).all(|t| GREEN.contains(&t))
}

fn is_chuuren_poutou(full: &Counts34) -> bool {
    let (suits, honors) = suit_profile(full);
    if suits.count_ones() != 1 || honors {
        return false;
    }
    let start = suits.trailing_zeros() as usize * 9;
    let c = &full[start..start + 9];
    c[0] >= 3 && c[8] >= 3 && !c[1..8].contains(&0)
}

/// The 13 tiles before the win were exactly 1112345678999.
fn is_chuuren_9_wait(full: &Counts34, win_tile: u8) -> bool {
    if win_tile >= JIHAI_START {
        return false;
    }
    let start = (win_tile / 9 * 9) as usize;
    let mut c = [0u8; 9];
    c.copy_from_slice(&full[start..start + 9]);
    c[(win_tile % 9) as usize] -= 1;
    c == [3, 1, 1, 1, 1, 1, 1, 1, 3]
}
