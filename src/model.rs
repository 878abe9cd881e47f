use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

pub type PlayerId = u32;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role { Villager, Werewolf, Hunter }

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self { Role::Villager => "villager", Role::Werewolf => "werewolf", Role::Hunter => "hunter" }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty { Easy, #[default] Normal, Hard }

impl FromStr for Difficulty {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase { Reveal, Night, DayTalk, DayVote, HunterShot, GameOver }

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Reveal => "reveal",
            Phase::Night => "night",
            Phase::DayTalk => "day_talk",
            Phase::DayVote => "day_vote",
            Phase::HunterShot => "hunter_shot",
            Phase::GameOver => "game_over",
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, Phase::Night | Phase::DayTalk | Phase::DayVote | Phase::HunterShot)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Outcome { VillagersWin, WerewolfWins }

impl Outcome {
    pub fn title(&self) -> &'static str {
        match self {
            Outcome::VillagersWin => "The villagers win",
            Outcome::WerewolfWins => "The werewolf wins",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Outcome::VillagersWin => "The werewolf has been eliminated.",
            Outcome::WerewolfWins => "Only two survivors remain.",
        }
    }
}

/// Ambient suspicion cue shown next to a player for one round.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Hint {
    SeemsSuspicious,
    SeemsCalm,
    AvoidsEyeContact,
    TalksALot,
    AccusesTooFast,
    StaysInBackground,
}

impl Hint {
    pub fn text(&self) -> &'static str {
        match self {
            Hint::SeemsSuspicious => "seems suspicious",
            Hint::SeemsCalm => "seems calm",
            Hint::AvoidsEyeContact => "avoids eye contact (suspect)",
            Hint::TalksALot => "talks a lot",
            Hint::AccusesTooFast => "accuses too fast (suspect)",
            Hint::StaysInBackground => "stays in the background",
        }
    }

    pub fn is_suspect(&self) -> bool {
        matches!(self, Hint::SeemsSuspicious | Hint::AvoidsEyeContact | Hint::AccusesTooFast)
    }

    pub fn is_calm(&self) -> bool { matches!(self, Hint::SeemsCalm) }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.text()) }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub role: Role,
    pub alive: bool,
    pub hint: Option<Hint>,
}

impl Player {
    pub fn has_suspect_hint(&self) -> bool { self.hint.map_or(false, |h| h.is_suspect()) }
    pub fn has_calm_hint(&self) -> bool { self.hint.map_or(false, |h| h.is_calm()) }
}

/// The human's in-flight choice, keyed by the phase that collects it.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingChoice {
    #[default]
    None,
    NightKill { target: Option<PlayerId> },
    Vote { target: Option<PlayerId> },
    HunterShot { shooter: PlayerId, target: Option<PlayerId> },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    MatchStart,
    PhaseChange,
    Intent,
    Elimination,
    VoteResult,
    HunterShot,
    Chatter,
    GameEnd,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub seq: u64,
    pub day: u32,
    pub ty: EventType,
    pub payload: serde_json::Value,
    pub text: String,
    pub emphasis: bool,
    pub state_hash: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub seed: u32,
    pub phase: Phase,
    pub day: u32,
    pub difficulty: Difficulty,
    pub hunter_enabled: bool,
    pub hints_enabled: bool,
    pub human_id: PlayerId,
    pub players: Vec<Player>,
    pub phase_ends_at: Option<u64>,
    pub pending: PendingChoice,
    pub hunter_shot_used: bool,
    pub outcome: Option<Outcome>,
    pub events_seq: u64,
}

impl Game {
    pub fn player(&self, id: PlayerId) -> Option<&Player> { self.players.iter().find(|p| p.id == id) }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> { self.players.iter_mut().find(|p| p.id == id) }

    pub fn human(&self) -> Option<&Player> { self.player(self.human_id) }

    pub fn is_alive(&self, id: PlayerId) -> bool { self.player(id).map_or(false, |p| p.alive) }

    pub fn alive(&self) -> impl Iterator<Item = &Player> + '_ { self.players.iter().filter(|p| p.alive) }

    pub fn alive_ids(&self) -> Vec<PlayerId> { self.alive().map(|p| p.id).collect() }

    pub fn alive_count(&self) -> usize { self.alive().count() }

    pub fn wolves_alive(&self) -> usize { self.alive().filter(|p| p.role == Role::Werewolf).count() }

    pub fn living_werewolf(&self) -> Option<PlayerId> {
        self.alive().find(|p| p.role == Role::Werewolf).map(|p| p.id)
    }

    pub fn name_of(&self, id: PlayerId) -> String {
        self.player(id).map(|p| p.name.clone()).unwrap_or_else(|| format!("#{id}"))
    }

    /// A target an actor may pick: present, alive and not the actor.
    pub fn is_valid_target(&self, actor: PlayerId, target: PlayerId) -> bool {
        target != actor && self.is_alive(target)
    }

    pub fn hunter_shot_pending(&self) -> bool { matches!(self.pending, PendingChoice::HunterShot { .. }) }

    pub fn hunter_shooter_id(&self) -> Option<PlayerId> {
        match self.pending { PendingChoice::HunterShot { shooter, .. } => Some(shooter), _ => None }
    }
}

/// Presentation-side projection of one player; `role` is only filled for the human.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub role: Option<Role>,
    pub alive: bool,
    pub hint: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MatchView {
    pub phase: Phase,
    pub day: u32,
    pub difficulty: Difficulty,
    pub phase_ends_at: Option<u64>,
    pub remaining_ms: Option<u64>,
    pub players: Vec<PlayerView>,
    pub alive_count: usize,
    pub hunter_shooter: Option<PlayerId>,
    pub outcome: Option<Outcome>,
}

/// Which screen the presentation layer should show.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Reveal { role: Role },
    Table { phase: Phase },
    GameOver { outcome: Outcome },
}
