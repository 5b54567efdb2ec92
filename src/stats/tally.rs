use serde::{Deserialize, Serialize};

use crate::game::{GameOutcome, Side};

/// Key under which the tally across every opponent variant is stored.
pub const TOTAL_KEY: &str = "connect4:stats:total";

/// Key for the tally against one opponent variant.
pub fn variant_key(variant: &str) -> String {
    format!("connect4:stats:{}", variant)
}

/// Win/loss/draw counters for one key.
///
/// Older browser builds stored these as `user`/`ai`/`draws`; both spellings
/// load, and absent fields read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tally {
    #[serde(alias = "user")]
    pub human: u64,
    #[serde(alias = "ai")]
    pub opponent: u64,
    pub draws: u64,
}

impl Tally {
    /// Parse a stored tally, treating anything unreadable as all zeros.
    pub fn parse(raw: &str) -> Tally {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Same as [`Tally::parse`] for an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Tally {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Winner(Side::Human) => self.human += 1,
            GameOutcome::Winner(Side::Opponent) => self.opponent += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    pub fn total_games(&self) -> u64 {
        self.human + self.opponent + self.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(variant_key("cnn"), "connect4:stats:cnn");
        assert_eq!(TOTAL_KEY, "connect4:stats:total");
    }

    #[test]
    fn test_parse_current_format() {
        let tally = Tally::parse(r#"{"human":3,"opponent":5,"draws":1}"#);
        assert_eq!(tally, Tally { human: 3, opponent: 5, draws: 1 });
        assert_eq!(tally.total_games(), 9);
    }

    #[test]
    fn test_parse_legacy_field_names() {
        let tally = Tally::parse(r#"{"user":2,"ai":7,"draws":4}"#);
        assert_eq!(tally, Tally { human: 2, opponent: 7, draws: 4 });
    }

    #[test]
    fn test_parse_partial_fills_zeros() {
        let tally = Tally::parse(r#"{"draws":6}"#);
        assert_eq!(tally, Tally { human: 0, opponent: 0, draws: 6 });
    }

    #[test]
    fn test_parse_corrupt_is_default() {
        assert_eq!(Tally::parse("not json"), Tally::default());
        assert_eq!(Tally::parse(r#"{"human":"lots"}"#), Tally::default());
        assert_eq!(Tally::parse(r#"{"human":-1}"#), Tally::default());
        assert_eq!(Tally::parse(""), Tally::default());
    }

    #[test]
    fn test_record_each_outcome() {
        let mut tally = Tally::default();
        tally.record(GameOutcome::Winner(Side::Human));
        tally.record(GameOutcome::Winner(Side::Opponent));
        tally.record(GameOutcome::Winner(Side::Opponent));
        tally.record(GameOutcome::Draw);
        assert_eq!(tally, Tally { human: 1, opponent: 2, draws: 1 });
    }
}
