use super::*;
use crate::Factor;
use crate::Fan;
use crate::Points;
use crate::claims::EarlyResolution;
use crate::scoring::Combination;
use crate::tiles::TileSet;
use crate::turn::Rotate;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Complete rule set for one room. Never mutated after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub players: usize,
    pub tiles: TileSet,
    /// Hands played before the match ends.
    pub rounds: u32,
    pub melds: Melds,
    pub patterns: Patterns,
    pub scoring: Scoring,
    pub timing: Timing,
    pub claims: Claims,
    pub rotation: Rotation,
    pub dismiss: Dismiss,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players: crate::N,
            tiles: TileSet::default(),
            rounds: 8,
            melds: Melds::default(),
            patterns: Patterns::default(),
            scoring: Scoring::default(),
            timing: Timing::default(),
            claims: Claims::default(),
            rotation: Rotation::default(),
            dismiss: Dismiss::default(),
        }
    }
}

/// Which claims and declarations are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Melds {
    pub allow_peng: bool,
    pub allow_gang: bool,
    pub allow_chi: bool,
}

impl Default for Melds {
    fn default() -> Self {
        Self {
            allow_peng: true,
            allow_gang: true,
            allow_chi: false,
        }
    }
}

/// Hand-pattern toggles. Disabled patterns score no fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patterns {
    pub seven_pairs: bool,
    pub all_pungs: bool,
    pub all_honors: bool,
    pub edge_wait: bool,
    pub pair_wait: bool,
    /// Whether self-drawn wins earn the self-draw bonus.
    pub self_draw: bool,
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            seven_pairs: true,
            all_pungs: true,
            all_honors: true,
            edge_wait: true,
            pair_wait: true,
            self_draw: true,
        }
    }
}

/// Fan awarded per matched pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fans {
    pub seven_pairs: Fan,
    pub all_pungs: Fan,
    pub all_honors: Fan,
    pub edge_wait: Fan,
    pub pair_wait: Fan,
}

impl Default for Fans {
    fn default() -> Self {
        Self {
            seven_pairs: 2,
            all_pungs: 2,
            all_honors: 4,
            edge_wait: 1,
            pair_wait: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    pub base_score: Points,
    /// Cap on what any seat nets from a round's hu settlement, won or
    /// paid. Kong bonuses are settled at declaration and sit outside it.
    pub max_score: Points,
    pub dealer_multiplier: Factor,
    pub self_draw_bonus: Factor,
    /// Paid by every other seat to the declarer of each kong.
    pub gang_bonus: Points,
    pub multiple_winners: bool,
    pub combination: Combination,
    pub fans: Fans,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            base_score: 1,
            max_score: 64,
            dealer_multiplier: 2.0,
            self_draw_bonus: 2.0,
            gang_bonus: 1,
            multiple_winners: false,
            combination: Combination::default(),
            fans: Fans::default(),
        }
    }
}

/// Per-phase time limits, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub turn_limit: u64,
    pub action_limit: u64,
    pub auto_trustee: bool,
    pub trustee_timeout: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            turn_limit: 15,
            action_limit: 5,
            auto_trustee: true,
            trustee_timeout: 30,
        }
    }
}

impl Timing {
    pub fn turn(&self) -> Duration {
        Duration::from_secs(self.turn_limit)
    }
    pub fn action(&self) -> Duration {
        Duration::from_secs(self.action_limit)
    }
    pub fn trustee(&self) -> Duration {
        Duration::from_secs(self.trustee_timeout)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claims {
    pub early_resolution: EarlyResolution,
}

/// Dealer rotation after a win by the dealer, a win by anyone else,
/// and an exhaustive draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rotation {
    pub on_win: Rotate,
    pub on_lose: Rotate,
    pub on_draw: Rotate,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            on_win: Rotate::Keep,
            on_lose: Rotate::Advance,
            on_draw: Rotate::Keep,
        }
    }
}

/// Room dissolution rules. Durations in seconds; a zero
/// `auto_dissolve_timeout` disables inactivity dissolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dismiss {
    pub require_all_agree: bool,
    /// Yes votes needed when unanimity is not required.
    pub threshold: usize,
    pub vote_time_limit: u64,
    pub auto_dissolve_timeout: u64,
}

impl Default for Dismiss {
    fn default() -> Self {
        Self {
            require_all_agree: true,
            threshold: 2,
            vote_time_limit: 60,
            auto_dissolve_timeout: 600,
        }
    }
}

impl Dismiss {
    pub fn vote(&self) -> Duration {
        Duration::from_secs(self.vote_time_limit)
    }
    pub fn inactivity(&self) -> Option<Duration> {
        (self.auto_dissolve_timeout > 0).then(|| Duration::from_secs(self.auto_dissolve_timeout))
    }
}

/// Construction and validation.
impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(json)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
    /// Validates and freezes the configuration for sharing with a session.
    pub fn sealed(self) -> Result<Arc<Self>, ConfigError> {
        self.validate()?;
        Ok(Arc::new(self))
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(crate::MIN_SEATS..=crate::MAX_SEATS).contains(&self.players) {
            return Err(ConfigError::Players(self.players));
        }
        if self.rounds == 0 {
            return Err(ConfigError::Rounds);
        }
        let needed = self.players * crate::DEAL + 1;
        if self.tiles.total() < needed {
            return Err(ConfigError::TileShortage {
                set: self.tiles,
                needed,
            });
        }
        if self.patterns.all_honors && !self.tiles.has_honors() {
            return Err(ConfigError::PatternUnavailable {
                pattern: "all_honors",
                set: self.tiles,
            });
        }
        self.validate_scoring()?;
        self.validate_timing()?;
        self.validate_dismiss()
    }
    fn validate_scoring(&self) -> Result<(), ConfigError> {
        let s = &self.scoring;
        let err = |field, reason| Err(ConfigError::Scoring { field, reason });
        if s.base_score <= 0 {
            return err("base_score", "must be positive");
        }
        if s.max_score < s.base_score {
            return err("max_score", "must be at least base_score");
        }
        if !s.dealer_multiplier.is_finite() || s.dealer_multiplier < 1.0 {
            return err("dealer_multiplier", "must be a finite factor of at least 1");
        }
        if !s.self_draw_bonus.is_finite() || s.self_draw_bonus < 1.0 {
            return err("self_draw_bonus", "must be a finite factor of at least 1");
        }
        if s.gang_bonus < 0 {
            return err("gang_bonus", "must not be negative");
        }
        let fans = [
            s.fans.seven_pairs,
            s.fans.all_pungs,
            s.fans.all_honors,
            s.fans.edge_wait,
            s.fans.pair_wait,
        ];
        if fans.iter().any(|f| *f == 0) {
            return err("fans", "must all be at least 1");
        }
        Ok(())
    }
    fn validate_timing(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if t.turn_limit == 0 {
            return Err(ConfigError::Timing { field: "turn_limit" });
        }
        if t.action_limit == 0 {
            return Err(ConfigError::Timing { field: "action_limit" });
        }
        if t.auto_trustee && t.trustee_timeout == 0 {
            return Err(ConfigError::Timing { field: "trustee_timeout" });
        }
        if self.dismiss.vote_time_limit == 0 {
            return Err(ConfigError::Timing { field: "vote_time_limit" });
        }
        Ok(())
    }
    fn validate_dismiss(&self) -> Result<(), ConfigError> {
        let d = &self.dismiss;
        if !d.require_all_agree && !(1..=self.players).contains(&d.threshold) {
            return Err(ConfigError::Threshold {
                threshold: d.threshold,
                players: self.players,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::default().sealed().is_ok());
    }
    #[test]
    fn partial_json_fills_defaults() {
        let config = Config::from_json(
            r#"{ "rounds": 4, "scoring": { "base_score": 2, "multiple_winners": true } }"#,
        )
        .unwrap();
        assert_eq!(config.rounds, 4);
        assert_eq!(config.scoring.base_score, 2);
        assert!(config.scoring.multiple_winners);
        assert_eq!(config.scoring.max_score, Scoring::default().max_score);
        assert_eq!(config.timing, Timing::default());
    }
    #[test]
    fn rejects_bad_player_count() {
        let config = Config {
            players: 5,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Players(5)));
    }
    #[test]
    fn rejects_honor_patterns_without_honors() {
        let config = Config {
            tiles: TileSet::Suited,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PatternUnavailable { .. })
        ));
    }
    #[test]
    fn rejects_inverted_score_bounds() {
        let mut config = Config::default();
        config.scoring.base_score = 10;
        config.scoring.max_score = 5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Scoring { field: "max_score", .. })
        ));
    }
    #[test]
    fn rejects_zero_limits() {
        let mut config = Config::default();
        config.timing.action_limit = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Timing { field: "action_limit" })
        );
    }
    #[test]
    fn rejects_unreachable_threshold() {
        let mut config = Config::default();
        config.dismiss.require_all_agree = false;
        config.dismiss.threshold = 4;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Threshold { threshold: 4, .. })
        ));
    }
    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Config::from_json("{ rounds: }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
