pub mod bot;
pub mod config;
pub mod model;
pub mod rng;
pub mod roster;
pub mod rules;

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use tracing::{debug, info};

use bot::Decision;
pub use config::{ConfigError, MatchConfig, PhaseTimings};
use model::*;
pub use model::{Difficulty, Event, EventType, Game, MatchView, Outcome, Phase, Player, PlayerId, PlayerView, Role, Screen};
use rng::Xorshift32;

fn hash_state_stub(g: &Game) -> String {
    format!("h:{}:{}:{}", g.phase.as_str(), g.day, g.alive_count())
}

fn wall_clock_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or_default()
}

/// How the morning discussion opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dawn { Victim(PlayerId), QuietNight, AfterShot }

/// One match from roster to game over. Owns the authoritative `Game`, the
/// random stream and the narration log; driven by `advance` and the intents.
#[derive(Clone, Debug)]
pub struct Match {
    game: Game,
    rng: Xorshift32,
    timings: PhaseTimings,
    log: VecDeque<Event>,
    log_capacity: usize,
    clock_ms: u64,
    last_chatter_ms: u64,
}

impl Match {
    /// Fresh match seeded from the wall clock and the roster size.
    pub fn start(config: MatchConfig, now_ms: u64) -> Result<Self, ConfigError> {
        let seed = rng::derive_seed(wall_clock_ms(), config.player_count);
        Self::with_seed(config, seed, now_ms)
    }

    pub fn with_seed(config: MatchConfig, seed: u32, now_ms: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Xorshift32::new(seed);
        let players = roster::build_roster(&mut rng, &config.human_name, config.player_count, config.hunter_enabled);
        Ok(Self::open(config, seed, rng, players, now_ms))
    }

    /// Like `with_seed` but with the roles laid out by the caller (index 0 is
    /// the human). Names are still drawn from the seeded stream.
    pub fn with_roles(config: MatchConfig, seed: u32, roles: &[Role], now_ms: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        config.validate_roles(roles)?;
        let mut rng = Xorshift32::new(seed);
        let mut players = roster::draw_players(&mut rng, &config.human_name, config.player_count);
        for (p, &role) in players.iter_mut().zip(roles) { p.role = role; }
        Ok(Self::open(config, seed, rng, players, now_ms))
    }

    fn open(config: MatchConfig, seed: u32, rng: Xorshift32, players: Vec<Player>, now_ms: u64) -> Self {
        let game = Game {
            seed, phase: Phase::Reveal, day: 1, difficulty: config.difficulty,
            hunter_enabled: config.hunter_enabled, hints_enabled: config.hints_enabled,
            human_id: 0, players, phase_ends_at: None, pending: PendingChoice::None,
            hunter_shot_used: false, outcome: None, events_seq: 0,
        };
        let mut m = Match {
            game, rng, timings: config.timings, log: VecDeque::with_capacity(config.log_capacity),
            log_capacity: config.log_capacity, clock_ms: now_ms, last_chatter_ms: 0,
        };
        info!(seed, players = config.player_count, difficulty = ?config.difficulty, hunter = config.hunter_enabled, "match started");
        let n = m.game.players.len();
        m.log_line(EventType::MatchStart, json!({ "seed": seed, "players": n }), "The game begins...", true);
        bot::assign_hints(&mut m.game, &mut m.rng);
        m
    }

    // ---- read-only projections ----

    pub fn game(&self) -> &Game { &self.game }
    pub fn phase(&self) -> Phase { self.game.phase }
    pub fn day(&self) -> u32 { self.game.day }
    pub fn seed(&self) -> u32 { self.game.seed }
    pub fn outcome(&self) -> Option<Outcome> { self.game.outcome }
    pub fn phase_ends_at(&self) -> Option<u64> { self.game.phase_ends_at }
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ { self.log.iter() }
    pub fn human(&self) -> Option<&Player> { self.game.human() }

    pub fn remaining_ms(&self) -> Option<u64> {
        self.game.phase_ends_at.map(|end| end.saturating_sub(self.clock_ms))
    }

    pub fn screen(&self) -> Screen {
        match (self.game.phase, self.game.outcome) {
            (Phase::GameOver, Some(outcome)) => Screen::GameOver { outcome },
            (Phase::Reveal, _) => Screen::Reveal { role: self.game.human().map_or(Role::Villager, |p| p.role) },
            (phase, _) => Screen::Table { phase },
        }
    }

    pub fn snapshot(&self) -> MatchView {
        let g = &self.game;
        let players = g.players.iter().map(|p| PlayerView {
            id: p.id,
            name: p.name.clone(),
            is_human: p.is_human,
            role: p.is_human.then_some(p.role),
            alive: p.alive,
            hint: if g.hints_enabled && p.alive && !p.is_human { p.hint.map(|h| h.text().to_string()) } else { None },
        }).collect();
        MatchView {
            phase: g.phase, day: g.day, difficulty: g.difficulty, phase_ends_at: g.phase_ends_at,
            remaining_ms: self.remaining_ms(), players, alive_count: g.alive_count(),
            hunter_shooter: g.hunter_shooter_id(), outcome: g.outcome,
        }
    }

    // ---- intents ----

    /// Leaves the role reveal for the first night.
    pub fn ready(&mut self) -> bool {
        if self.game.phase != Phase::Reveal { return false; }
        self.enter_night();
        true
    }

    /// The human werewolf's victim for tonight.
    pub fn set_night_target(&mut self, target: PlayerId) -> bool {
        if self.game.phase != Phase::Night || !self.human_is_living(Role::Werewolf) { return false; }
        if !self.game.is_valid_target(self.game.human_id, target) { return false; }
        let PendingChoice::NightKill { target: slot } = &mut self.game.pending else { return false };
        *slot = Some(target);
        self.log_line(EventType::Intent, json!({ "night_target": target }), "You picked a victim.", true);
        true
    }

    /// The human's ballot during the vote, or their shot when they are the fallen hunter.
    pub fn set_vote_target(&mut self, target: PlayerId) -> bool {
        let human = self.game.human_id;
        if !self.game.is_valid_target(human, target) { return false; }
        let human_alive = self.game.is_alive(human);
        let phase = self.game.phase;
        let name = self.game.name_of(target);
        let (payload, text) = match &mut self.game.pending {
            PendingChoice::Vote { target: slot } if phase == Phase::DayVote && human_alive => {
                *slot = Some(target);
                (json!({ "vote_target": target }), format!("You vote against {name}."))
            }
            PendingChoice::HunterShot { shooter, target: slot } if phase == Phase::HunterShot && *shooter == human => {
                *slot = Some(target);
                (json!({ "shot_target": target }), format!("You take aim at {name}."))
            }
            _ => return false,
        };
        self.log_line(EventType::Intent, payload, text, true);
        true
    }

    /// Ends the current phase at the next `advance`. During the reveal this is `ready`.
    pub fn confirm_phase(&mut self) -> bool {
        let allowed = match self.game.phase {
            Phase::Reveal => return self.ready(),
            Phase::Night => self.human_is_living(Role::Werewolf),
            Phase::DayTalk => true,
            Phase::DayVote => self.game.is_alive(self.game.human_id),
            Phase::HunterShot => self.game.hunter_shooter_id() == Some(self.game.human_id),
            Phase::GameOver => false,
        };
        if allowed { self.game.phase_ends_at = Some(self.clock_ms); }
        allowed
    }

    // ---- clock ----

    /// Feeds the clock. Resolves at most one expired phase and returns the
    /// phase the match landed in when it did.
    pub fn advance(&mut self, now_ms: u64) -> Option<Phase> {
        self.clock_ms = self.clock_ms.max(now_ms);
        let phase = self.game.phase;
        if phase == Phase::DayTalk { self.maybe_chatter(); }
        let deadline = self.game.phase_ends_at?;
        if self.clock_ms < deadline { return None; }
        match phase {
            Phase::Night => self.resolve_night(),
            Phase::DayTalk => self.enter_day_vote(),
            Phase::DayVote => self.resolve_vote(),
            Phase::HunterShot => self.resolve_hunter_shot(),
            Phase::Reveal | Phase::GameOver => return None,
        }
        debug!(from = phase.as_str(), to = self.game.phase.as_str(), day = self.game.day, "phase resolved");
        Some(self.game.phase)
    }

    // ---- phase entry ----

    fn enter_night(&mut self) {
        if self.check_win() { return; }
        self.set_phase(Phase::Night, Some(self.timings.night_ms));
        self.game.pending = PendingChoice::NightKill { target: None };
        let day = self.game.day;
        self.log_line(EventType::PhaseChange, json!({ "phase": "night" }), format!("Night {day}... the village falls asleep."), true);
        bot::assign_hints(&mut self.game, &mut self.rng);
    }

    fn enter_day_talk(&mut self, dawn: Dawn) {
        if self.check_win() { return; }
        self.set_phase(Phase::DayTalk, Some(self.timings.day_talk_ms));
        self.game.pending = PendingChoice::None;
        let (victim, text) = match dawn {
            Dawn::Victim(id) => (Some(id), format!("At dawn... {} was found dead.", self.game.name_of(id))),
            Dawn::QuietNight => (None, "At dawn... nobody died tonight.".to_string()),
            Dawn::AfterShot => (None, "The village gathers again.".to_string()),
        };
        self.log_line(EventType::PhaseChange, json!({ "phase": "day_talk", "victim": victim }), text, true);
        bot::assign_hints(&mut self.game, &mut self.rng);
    }

    fn enter_day_vote(&mut self) {
        if self.check_win() { return; }
        self.set_phase(Phase::DayVote, Some(self.timings.day_vote_ms));
        self.game.pending = PendingChoice::Vote { target: None };
        self.log_line(EventType::PhaseChange, json!({ "phase": "day_vote" }), "Time to vote.", true);
        bot::assign_hints(&mut self.game, &mut self.rng);
    }

    fn set_phase(&mut self, phase: Phase, duration_ms: Option<u64>) {
        self.game.phase = phase;
        self.game.phase_ends_at = duration_ms.map(|d| self.clock_ms + d);
    }

    // ---- resolution ----

    fn resolve_night(&mut self) {
        let chosen = match self.game.pending { PendingChoice::NightKill { target } => target, _ => None };
        self.game.pending = PendingChoice::None;
        let Some(wolf) = self.game.living_werewolf() else {
            self.check_win();
            return;
        };
        let human_is_wolf = self.game.human().map_or(false, |p| p.role == Role::Werewolf);
        let target = match chosen.filter(|_| human_is_wolf) {
            Some(t) => Some(t),
            None => bot::bot_pick(&self.game, Decision::NightKill, wolf, &mut self.rng),
        };
        self.apply_night_kill(target);
    }

    fn apply_night_kill(&mut self, target: Option<PlayerId>) {
        match target {
            Some(victim) => {
                if !self.eliminate(victim, "During the night, someone was attacked...".to_string()) {
                    self.enter_day_talk(Dawn::Victim(victim));
                }
            }
            None => self.enter_day_talk(Dawn::QuietNight),
        }
    }

    fn resolve_vote(&mut self) {
        let explicit = match self.game.pending { PendingChoice::Vote { target } => target, _ => None };
        self.game.pending = PendingChoice::None;
        let human = self.game.human_id;
        let alive = self.game.alive_ids();
        let mut tally: Vec<(PlayerId, u32)> = Vec::new();

        if self.game.is_alive(human) {
            let ballot = match explicit {
                Some(t) => Some(t),
                None => {
                    let choices: Vec<PlayerId> = alive.iter().copied().filter(|&id| id != human).collect();
                    self.rng.choose(&choices).copied()
                }
            };
            rules::add_vote(&mut tally, ballot);
        }
        for &voter in alive.iter().filter(|&&id| id != human) {
            let ballot = bot::bot_pick(&self.game, Decision::Vote, voter, &mut self.rng);
            rules::add_vote(&mut tally, ballot);
        }

        let leaders = rules::leading_candidates(&tally);
        let eliminated = self.rng.choose(&leaders).copied();
        debug!(?tally, ?leaders, ?eliminated, day = self.game.day, "vote tallied");
        self.apply_vote_result(eliminated, &tally);
    }

    fn apply_vote_result(&mut self, eliminated: Option<PlayerId>, tally: &[(PlayerId, u32)]) {
        let payload = json!({ "tally": tally, "eliminated": eliminated });
        let Some(out) = eliminated else {
            self.log_line(EventType::VoteResult, payload, "The vote is void (no target).", true);
            self.game.day += 1;
            self.enter_night();
            return;
        };
        let name = self.game.name_of(out);
        self.log_line(EventType::VoteResult, payload, format!("Vote result: {name} is eliminated."), true);
        if !self.eliminate(out, format!("{name} died following the vote.")) {
            self.game.day += 1;
            self.enter_night();
        }
    }

    fn resolve_hunter_shot(&mut self) {
        let (shooter, chosen) = match self.game.pending {
            PendingChoice::HunterShot { shooter, target } => (Some(shooter), target),
            _ => (None, None),
        };
        self.game.pending = PendingChoice::None;
        let Some(shooter) = shooter.filter(|&id| self.game.player(id).is_some()) else {
            self.game.day += 1;
            self.enter_night();
            return;
        };
        let target = match chosen.filter(|_| shooter == self.game.human_id) {
            Some(t) => Some(t),
            None => bot::bot_pick(&self.game, Decision::HunterShot, shooter, &mut self.rng),
        };
        self.apply_hunter_shot(shooter, target);
    }

    fn apply_hunter_shot(&mut self, shooter: PlayerId, target: Option<PlayerId>) {
        match target {
            Some(t) => {
                self.game.hunter_shot_used = true;
                let name = self.game.name_of(t);
                self.log_line(EventType::HunterShot, json!({ "shooter": shooter, "target": t }), format!("The Hunter fires... {name} falls."), true);
                self.eliminate(t, format!("{name} was shot by the Hunter."));
            }
            None => {
                self.log_line(EventType::HunterShot, json!({ "shooter": shooter, "target": null }), "The Hunter did not shoot anyone.", true);
            }
        }
        if self.check_win() { return; }
        self.enter_day_talk(Dawn::AfterShot);
    }

    /// Marks `id` dead. Returns `true` when the death hands the turn to the
    /// hunter's last shot, in which case the caller must not move on.
    fn eliminate(&mut self, id: PlayerId, reason: String) -> bool {
        let role = match self.game.player_mut(id) {
            Some(p) if p.alive => { p.alive = false; p.role }
            _ => return false,
        };
        debug!(id, role = role.as_str(), day = self.game.day, "player eliminated");
        self.log_line(EventType::Elimination, json!({ "id": id }), reason, true);
        if role != Role::Hunter || self.game.hunter_shot_used { return false; }

        self.game.pending = PendingChoice::HunterShot { shooter: id, target: None };
        self.set_phase(Phase::HunterShot, Some(self.timings.hunter_shot_ms));
        self.log_line(EventType::PhaseChange, json!({ "phase": "hunter_shot", "shooter": id }), "The Hunter may fire one last shot...", true);
        true
    }

    fn check_win(&mut self) -> bool {
        if self.game.phase == Phase::GameOver { return true; }
        let Some(outcome) = rules::check_win(&self.game) else { return false };
        self.set_phase(Phase::GameOver, None);
        self.game.pending = PendingChoice::None;
        self.game.outcome = Some(outcome);
        info!(?outcome, day = self.game.day, seed = self.game.seed, "match over");
        self.log_line(EventType::GameEnd, json!({ "outcome": outcome }), format!("{}. {}", outcome.title(), outcome.subtitle()), true);
        true
    }

    // ---- helpers ----

    fn human_is_living(&self, role: Role) -> bool {
        self.game.human().map_or(false, |p| p.alive && p.role == role)
    }

    fn maybe_chatter(&mut self) {
        if self.clock_ms.saturating_sub(self.last_chatter_ms) < self.timings.chatter_interval_ms { return; }
        self.last_chatter_ms = self.clock_ms;
        if let Some((speaker, line)) = bot::chatter_line(&self.game, &mut self.rng) {
            self.log_line(EventType::Chatter, json!({ "speaker": speaker }), line, false);
        }
    }

    fn log_line(&mut self, ty: EventType, payload: serde_json::Value, text: impl Into<String>, emphasis: bool) {
        self.game.events_seq += 1;
        let ev = Event {
            seq: self.game.events_seq, day: self.game.day, ty, payload, text: text.into(), emphasis,
            state_hash: hash_state_stub(&self.game),
        };
        while self.log.len() >= self.log_capacity { self.log.pop_front(); }
        self.log.push_back(ev);
    }
}
