use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Difficulty, Role};
use crate::rules::{MAX_PLAYERS, MIN_PLAYERS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least {min} players are required, got {requested}")]
    TooFewPlayers { requested: usize, min: usize },
    #[error("at most {max} players are supported, got {requested}")]
    TooManyPlayers { requested: usize, max: usize },
    #[error("phase timing `{0}` must be greater than zero")]
    ZeroTiming(&'static str),
    #[error("event log capacity must be greater than zero")]
    ZeroLogCapacity,
    #[error("role list has {actual} entries for {expected} players")]
    RoleListLength { expected: usize, actual: usize },
    #[error("exactly one werewolf is required, got {0}")]
    WerewolfCount(usize),
    #[error("at most one hunter is allowed, got {0}")]
    HunterCount(usize),
    #[error("a hunter was assigned but the hunter is disabled")]
    HunterDisabled,
    #[error("unknown difficulty `{0}` (expected easy, normal or hard)")]
    UnknownDifficulty(String),
    #[error("invalid match config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Phase lengths in milliseconds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PhaseTimings {
    pub night_ms: u64,
    pub day_talk_ms: u64,
    pub day_vote_ms: u64,
    pub hunter_shot_ms: u64,
    /// Minimum gap between two chatter lines during the discussion.
    pub chatter_interval_ms: u64,
}

impl PhaseTimings {
    pub const DEFAULT_NIGHT_MS: u64 = 20_000;
    pub const DEFAULT_DAY_TALK_MS: u64 = 22_000;
    pub const DEFAULT_DAY_VOTE_MS: u64 = 20_000;
    pub const DEFAULT_HUNTER_SHOT_MS: u64 = 15_000;
    pub const DEFAULT_CHATTER_INTERVAL_MS: u64 = 2_200;

    pub fn validate(&self) -> Result<(), ConfigError> {
        let phases = [
            ("night_ms", self.night_ms),
            ("day_talk_ms", self.day_talk_ms),
            ("day_vote_ms", self.day_vote_ms),
            ("hunter_shot_ms", self.hunter_shot_ms),
        ];
        match phases.iter().find(|(_, ms)| *ms == 0) {
            Some((name, _)) => Err(ConfigError::ZeroTiming(*name)),
            None => Ok(()),
        }
    }
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            night_ms: Self::DEFAULT_NIGHT_MS,
            day_talk_ms: Self::DEFAULT_DAY_TALK_MS,
            day_vote_ms: Self::DEFAULT_DAY_VOTE_MS,
            hunter_shot_ms: Self::DEFAULT_HUNTER_SHOT_MS,
            chatter_interval_ms: Self::DEFAULT_CHATTER_INTERVAL_MS,
        }
    }
}

/// Everything `Match::start` needs; fixed for the lifetime of a match.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    pub human_name: String,
    pub player_count: usize,
    pub difficulty: Difficulty,
    pub hunter_enabled: bool,
    pub hints_enabled: bool,
    pub timings: PhaseTimings,
    pub log_capacity: usize,
}

impl MatchConfig {
    pub const DEFAULT_PLAYER_COUNT: usize = 8;
    pub const DEFAULT_LOG_CAPACITY: usize = 80;

    pub fn new(human_name: impl Into<String>, player_count: usize, difficulty: Difficulty, hunter_enabled: bool) -> Self {
        Self { human_name: human_name.into(), player_count, difficulty, hunter_enabled, ..Self::default() }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_count < MIN_PLAYERS {
            return Err(ConfigError::TooFewPlayers { requested: self.player_count, min: MIN_PLAYERS });
        }
        if self.player_count > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers { requested: self.player_count, max: MAX_PLAYERS });
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        self.timings.validate()
    }

    /// Checks a scripted role list against this config.
    pub fn validate_roles(&self, roles: &[Role]) -> Result<(), ConfigError> {
        if roles.len() != self.player_count {
            return Err(ConfigError::RoleListLength { expected: self.player_count, actual: roles.len() });
        }
        let wolves = roles.iter().filter(|r| **r == Role::Werewolf).count();
        if wolves != 1 {
            return Err(ConfigError::WerewolfCount(wolves));
        }
        let hunters = roles.iter().filter(|r| **r == Role::Hunter).count();
        if hunters > 1 {
            return Err(ConfigError::HunterCount(hunters));
        }
        if hunters == 1 && !self.hunter_enabled {
            return Err(ConfigError::HunterDisabled);
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            human_name: String::new(),
            player_count: Self::DEFAULT_PLAYER_COUNT,
            difficulty: Difficulty::Normal,
            hunter_enabled: true,
            hints_enabled: true,
            timings: PhaseTimings::default(),
            log_capacity: Self::DEFAULT_LOG_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timings.night_ms, 20_000);
        assert_eq!(config.timings.hunter_shot_ms, 15_000);
        assert_eq!(config.log_capacity, 80);
    }

    #[test]
    fn rejects_small_rosters() {
        let config = MatchConfig::new("Ana", 3, Difficulty::Easy, false);
        assert!(matches!(config.validate(), Err(ConfigError::TooFewPlayers { requested: 3, min: 4 })));
    }

    #[test]
    fn rejects_zero_timings() {
        let mut config = MatchConfig::default();
        config.timings.day_vote_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTiming("day_vote_ms"))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = MatchConfig::from_json(r#"{"player_count": 6, "difficulty": "hard", "timings": {"night_ms": 5000}}"#)
            .expect("valid config");
        assert_eq!(config.player_count, 6);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.timings.night_ms, 5000);
        assert_eq!(config.timings.day_talk_ms, PhaseTimings::DEFAULT_DAY_TALK_MS);
        assert!(config.hunter_enabled);
    }

    #[test]
    fn json_errors_surface() {
        assert!(matches!(MatchConfig::from_json("{\"player_count\": \"six\"}"), Err(ConfigError::Json(_))));
        assert!(matches!(MatchConfig::from_json("{\"player_count\": 2}"), Err(ConfigError::TooFewPlayers { .. })));
    }

    #[test]
    fn scripted_roles_need_one_wolf() {
        let config = MatchConfig::new("Ana", 4, Difficulty::Normal, false);
        let none = [Role::Villager; 4];
        assert!(matches!(config.validate_roles(&none), Err(ConfigError::WerewolfCount(0))));
        let hunter = [Role::Villager, Role::Werewolf, Role::Hunter, Role::Villager];
        assert!(matches!(config.validate_roles(&hunter), Err(ConfigError::HunterDisabled)));
        let ok = [Role::Villager, Role::Werewolf, Role::Villager, Role::Villager];
        assert!(config.validate_roles(&ok).is_ok());
    }
}
