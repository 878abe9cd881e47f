#![allow(dead_code)]

use werewolf_engine::{Difficulty, Match, MatchConfig, Phase, PlayerId, Role};

pub const STEP_MS: u64 = 500;
pub const LIMIT_MS: u64 = 10_000_000;

pub fn config(players: usize, difficulty: Difficulty, hunter: bool) -> MatchConfig {
    MatchConfig { human_name: "Ana".into(), player_count: players, difficulty, hunter_enabled: hunter, ..MatchConfig::default() }
}

pub fn difficulty(i: u8) -> Difficulty {
    [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard][i as usize % 3]
}

/// Ticks the clock until `stop` holds or the match ends; returns every phase landed in.
pub fn tick_until(m: &mut Match, now: &mut u64, mut stop: impl FnMut(&Match) -> bool) -> Vec<Phase> {
    let mut landed = Vec::new();
    while m.outcome().is_none() && *now < LIMIT_MS && !stop(&*m) {
        *now += STEP_MS;
        if let Some(p) = m.advance(*now) { landed.push(p); }
    }
    landed
}

/// A human who always goes after the lowest living id that is not their own.
pub fn lowest_other(m: &Match) -> Option<PlayerId> {
    let me = m.human()?.id;
    m.game().alive().map(|p| p.id).find(|&id| id != me)
}

/// Plays a full match with the scripted human; returns the phases landed in.
pub fn play_scripted(m: &mut Match) -> Vec<Phase> {
    let mut landed = vec![m.phase()];
    m.ready();
    landed.push(m.phase());
    let mut now = 0;
    let mut acted_at: Option<(Phase, u32)> = None;
    while m.outcome().is_none() && now < LIMIT_MS {
        let key = (m.phase(), m.day());
        if acted_at != Some(key) {
            acted_at = Some(key);
            if let Some(t) = lowest_other(m) {
                let is_wolf = m.human().map_or(false, |p| p.role == Role::Werewolf);
                if m.phase() == Phase::Night && is_wolf { m.set_night_target(t); }
                if matches!(m.phase(), Phase::DayVote | Phase::HunterShot) { m.set_vote_target(t); }
            }
        }
        now += STEP_MS;
        if let Some(p) = m.advance(now) { landed.push(p); }
    }
    landed
}
