//! Bot decisions: weighted target picks for the wolf's kill, the day vote and
//! the hunter's last shot, plus the per-round hints and discussion chatter.
//! Every function draws from the match stream and nothing else.

use tracing::trace;

use crate::model::{Game, Hint, Player, PlayerId, Role};
use crate::rng::Xorshift32;
use crate::rules::{self, MAX_HINTS_PER_ROUND, MIN_ALIVE_FOR_CHATTER, MIN_ALIVE_FOR_HINTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision { NightKill, Vote, HunterShot }

pub fn bot_pick(game: &Game, decision: Decision, actor: PlayerId, rng: &mut Xorshift32) -> Option<PlayerId> {
    match decision {
        Decision::NightKill => night_kill_target(game, actor, rng),
        Decision::Vote => vote_target(game, actor, rng),
        Decision::HunterShot => hunter_shot_target(game, actor, rng),
    }
}

/// Probability-proportional draw. Negative weights count as zero, an all-zero
/// table falls back to a uniform draw, and the first id whose running weight
/// reaches the drawn value wins.
pub fn weighted_pick(ids: &[PlayerId], weights: &[f64], rng: &mut Xorshift32) -> Option<PlayerId> {
    if ids.is_empty() { return None; }
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 { return rng.choose(ids).copied(); }
    let mut r = rng.next_f64() * total;
    for (&id, &w) in ids.iter().zip(weights) {
        r -= w.max(0.0);
        if r <= 0.0 { return Some(id); }
    }
    ids.last().copied()
}

fn pick_among<'a>(
    game: &'a Game,
    candidates: impl Iterator<Item = &'a Player>,
    weigh: impl Fn(&Player) -> f64,
    decision: Decision,
    rng: &mut Xorshift32,
) -> Option<PlayerId> {
    let (ids, weights): (Vec<PlayerId>, Vec<f64>) = candidates.map(|p| (p.id, weigh(p))).unzip();
    trace!(?decision, day = game.day, ?ids, ?weights, "bot weights");
    weighted_pick(&ids, &weights, rng)
}

pub fn night_kill_target(game: &Game, wolf: PlayerId, rng: &mut Xorshift32) -> Option<PlayerId> {
    let d = game.difficulty;
    let candidates = game.alive().filter(|p| p.id != wolf && p.role != Role::Werewolf);
    let weigh = |p: &Player| {
        let mut w = 1.0;
        if p.has_suspect_hint() { w *= rules::wolf_suspect_avoidance(d); }
        if p.role == Role::Hunter { w *= rules::wolf_hunter_awareness(d); }
        w
    };
    pick_among(game, candidates, weigh, Decision::NightKill, rng)
}

pub fn vote_target(game: &Game, voter: PlayerId, rng: &mut Xorshift32) -> Option<PlayerId> {
    let voter_role = match game.player(voter) { Some(p) if p.alive => p.role, _ => return None };
    let d = game.difficulty;
    let hints = game.hints_enabled;
    let candidates = game.alive().filter(|p| p.id != voter);
    let weigh = |p: &Player| {
        let mut w = 1.0;
        if hints {
            if p.has_suspect_hint() { w *= rules::VOTE_SUSPECT_BOOST; }
            if p.has_calm_hint() { w *= rules::VOTE_CALM_DAMPING; }
        }
        if p.role == Role::Werewolf { w *= rules::vote_wolf_bias(d); }
        if voter_role == Role::Werewolf {
            w *= if p.role == Role::Werewolf { rules::WOLF_PACK_DAMPING } else { rules::WOLF_DEFLECT_BOOST };
        }
        w
    };
    pick_among(game, candidates, weigh, Decision::Vote, rng)
}

pub fn hunter_shot_target(game: &Game, shooter: PlayerId, rng: &mut Xorshift32) -> Option<PlayerId> {
    let d = game.difficulty;
    let hints = game.hints_enabled;
    let candidates = game.alive().filter(|p| p.id != shooter);
    let weigh = |p: &Player| {
        let mut w = 1.0;
        if p.role == Role::Werewolf { w *= rules::hunter_wolf_bias(d); }
        if hints && p.has_suspect_hint() { w *= rules::HUNTER_SUSPECT_BOOST; }
        w
    };
    pick_among(game, candidates, weigh, Decision::HunterShot, rng)
}

/// Clears every hint, then annotates up to three living bots. A wolf's hint
/// leans suspicious more often on harder difficulties but never always.
pub fn assign_hints(game: &mut Game, rng: &mut Xorshift32) {
    for p in &mut game.players { p.hint = None; }
    if !game.hints_enabled { return; }
    let alive = game.alive_count();
    if alive < MIN_ALIVE_FOR_HINTS { return; }

    let human = game.human_id;
    let mut pool: Vec<usize> = game.players.iter().enumerate()
        .filter(|(_, p)| p.alive && p.id != human)
        .map(|(i, _)| i)
        .collect();
    let bias = rules::hint_truth_bias(game.difficulty);
    for _ in 0..MAX_HINTS_PER_ROUND.min(alive - 1) {
        if pool.is_empty() { break; }
        let slot = pool.remove(rng.below(pool.len()));
        let is_wolf = game.players[slot].role == Role::Werewolf;
        game.players[slot].hint = Some(draw_hint(is_wolf, bias, rng));
    }
}

fn draw_hint(is_wolf: bool, bias: f64, rng: &mut Xorshift32) -> Hint {
    let r = rng.next_f64();
    if r < 0.33 {
        if is_wolf && rng.next_f64() < 0.45 + bias { Hint::SeemsSuspicious } else { Hint::SeemsCalm }
    } else if r < 0.66 {
        if is_wolf && rng.next_f64() < 0.40 + bias { Hint::AvoidsEyeContact } else { Hint::TalksALot }
    } else if is_wolf && rng.next_f64() < 0.35 + bias {
        Hint::AccusesTooFast
    } else {
        Hint::StaysInBackground
    }
}

/// One flavour line for the discussion, or `None` with fewer than three alive.
pub fn chatter_line(game: &Game, rng: &mut Xorshift32) -> Option<(PlayerId, String)> {
    let alive: Vec<&Player> = game.alive().collect();
    if alive.len() < MIN_ALIVE_FOR_CHATTER { return None; }
    let speaker = alive[rng.below(alive.len())];
    let others: Vec<&Player> = alive.iter().copied().filter(|p| p.id != speaker.id).collect();
    let target = others[rng.below(others.len())];
    let (s, t) = (&speaker.name, &target.name);
    let line = match rng.below(6) {
        0 => format!("{s}: \"We have to keep a clear head...\""),
        1 => format!("{s}: \"I have a bad feeling about {t}.\""),
        2 => format!("{s}: \"Why is {t} so quiet?\""),
        3 => format!("{s}: \"Yesterday {t} was accusing way too fast.\""),
        4 => format!("{s}: \"We're short on clues...\""),
        _ => format!("{s}: \"The wolf is trying to blend in.\""),
    };
    Some((speaker.id, line))
}
