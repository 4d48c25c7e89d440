use serde::{Deserialize, Serialize};

use crate::errors::RiichiResult;

/// Table rules that change what a hand is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRule {
    /// Tanyao counts on an open hand (kuitan).
    pub open_tanyao: bool,
    /// Red fives add one han each.
    pub red_fives: bool,
    /// 4 han 30 fu and 3 han 60 fu are rounded up to mangan.
    pub kiriage_mangan: bool,
    /// 13+ han without yakuman is scored as yakuman instead of sanbaiman.
    pub counted_yakuman: bool,

    pub is_kokushi_musou_13machi_double: bool,
    pub is_suuankou_tanki_double: bool,
    pub is_junsei_chuurenpoutou_double: bool,
    pub is_daisuushii_double: bool,

    /// A 13-tile hand that accepts a single tile kind always scores a 2-fu wait
    /// and cannot be pinfu.
    pub single_wait_fu: bool,
    /// An open ron hand with no fu beyond the base 20 is lifted to 30.
    pub open_ron_30_fu: bool,
}

impl Default for GameRule {
    fn default() -> Self {
        Self::default_tenhou()
    }
}

impl GameRule {
    pub fn default_tenhou() -> Self {
        Self {
            open_tanyao: true,
            red_fives: true,
            kiriage_mangan: false,
            counted_yakuman: true,

            is_kokushi_musou_13machi_double: false,
            is_suuankou_tanki_double: false,
            is_junsei_chuurenpoutou_double: false,
            is_daisuushii_double: false,

            single_wait_fu: true,
            open_ron_30_fu: false,
        }
    }

    pub fn default_mjsoul() -> Self {
        Self {
            open_tanyao: true,
            red_fives: true,
            kiriage_mangan: false,
            counted_yakuman: true,

            is_kokushi_musou_13machi_double: true,
            is_suuankou_tanki_double: true,
            is_junsei_chuurenpoutou_double: true,
            is_daisuushii_double: true,

            single_wait_fu: true,
            open_ron_30_fu: false,
        }
    }

    /// Reads a rule set from JSON; missing fields take the Tenhou defaults.
    pub fn from_json(json: &str) -> RiichiResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_only_in_doubles() {
        let t = GameRule::default_tenhou();
        let m = GameRule::default_mjsoul();
        assert_eq!(t.open_tanyao, m.open_tanyao);
        assert!(!t.is_daisuushii_double);
        assert!(m.is_daisuushii_double);
        assert_eq!(GameRule::default(), t);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let rule = GameRule::from_json(r#"{"open_tanyao": false, "kiriage_mangan": true}"#).unwrap();
        assert!(!rule.open_tanyao);
        assert!(rule.kiriage_mangan);
        assert!(rule.red_fives);
        assert!(rule.single_wait_fu);
        assert!(!rule.open_ron_30_fu);
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = GameRule::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::errors::RiichiError::Serialization { .. }));
    }
}
