use crate::model::{Difficulty, Game, Outcome, PlayerId};

pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 24;

/// Fewer living players than this and no hints are handed out.
pub const MIN_ALIVE_FOR_HINTS: usize = 4;
pub const MAX_HINTS_PER_ROUND: usize = 3;
pub const MIN_ALIVE_FOR_CHATTER: usize = 3;

/// Villagers win once no wolf lives; the wolf wins when at most two remain.
/// "At most" covers a hunter's last shot leaving the wolf alone.
pub fn check_win(game: &Game) -> Option<Outcome> {
    let wolves = game.wolves_alive();
    if wolves == 0 { return Some(Outcome::VillagersWin); }
    if game.alive_count() <= 2 && wolves == 1 { return Some(Outcome::WerewolfWins); }
    None
}

/// Candidates sharing the highest count, in first-vote order.
pub fn leading_candidates(tally: &[(PlayerId, u32)]) -> Vec<PlayerId> {
    let max = tally.iter().map(|&(_, c)| c).max().unwrap_or(0);
    if max == 0 { return vec![]; }
    tally.iter().filter(|&&(_, c)| c == max).map(|&(id, _)| id).collect()
}

pub fn add_vote(tally: &mut Vec<(PlayerId, u32)>, target: Option<PlayerId>) {
    let Some(target) = target else { return };
    match tally.iter_mut().find(|(id, _)| *id == target) {
        Some((_, count)) => *count += 1,
        None => tally.push((target, 1)),
    }
}

/// How strongly a wolf bot favours killing a living hunter.
#[inline] pub fn wolf_hunter_awareness(d: Difficulty) -> f64 {
    match d { Difficulty::Easy => 1.0, Difficulty::Normal => 1.05, Difficulty::Hard => 1.15 }
}

/// Hard wolves avoid players already under suspicion.
#[inline] pub fn wolf_suspect_avoidance(d: Difficulty) -> f64 {
    match d { Difficulty::Hard => 0.7, _ => 1.0 }
}

#[inline] pub fn vote_wolf_bias(d: Difficulty) -> f64 {
    match d { Difficulty::Easy => 1.0, Difficulty::Normal => 1.15, Difficulty::Hard => 1.35 }
}

#[inline] pub fn hunter_wolf_bias(d: Difficulty) -> f64 {
    match d { Difficulty::Easy => 1.05, Difficulty::Normal => 1.25, Difficulty::Hard => 1.7 }
}

/// Added to the chance that a wolf's hint actually reads as suspicious.
#[inline] pub fn hint_truth_bias(d: Difficulty) -> f64 {
    match d { Difficulty::Easy => 0.0, Difficulty::Normal => 0.06, Difficulty::Hard => 0.12 }
}

pub const VOTE_SUSPECT_BOOST: f64 = 1.25;
pub const VOTE_CALM_DAMPING: f64 = 0.9;
pub const WOLF_DEFLECT_BOOST: f64 = 1.15;
pub const WOLF_PACK_DAMPING: f64 = 0.3;
pub const HUNTER_SUSPECT_BOOST: f64 = 1.2;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Game, Phase, PendingChoice, Player, Role};

    fn game(roles: &[(Role, bool)]) -> Game {
        let players = roles.iter().enumerate().map(|(i, &(role, alive))| Player {
            id: i as PlayerId, name: format!("P{i}"), is_human: i == 0, role, alive, hint: None,
        }).collect();
        Game {
            seed: 1, phase: Phase::Night, day: 1, difficulty: Difficulty::Normal, hunter_enabled: true,
            hints_enabled: true, human_id: 0, players, phase_ends_at: None, pending: PendingChoice::None,
            hunter_shot_used: false, outcome: None, events_seq: 0,
        }
    }

    #[test]
    fn dead_wolf_means_villagers_win() {
        let g = game(&[(Role::Villager, true), (Role::Werewolf, false), (Role::Villager, true), (Role::Villager, true)]);
        assert_eq!(check_win(&g), Some(Outcome::VillagersWin));
    }

    #[test]
    fn wolf_wins_at_two_survivors() {
        let g = game(&[(Role::Villager, true), (Role::Werewolf, true), (Role::Villager, false), (Role::Hunter, false)]);
        assert_eq!(check_win(&g), Some(Outcome::WerewolfWins));
    }

    #[test]
    fn lone_wolf_wins() {
        let g = game(&[(Role::Villager, false), (Role::Werewolf, true), (Role::Villager, false), (Role::Hunter, false)]);
        assert_eq!(check_win(&g), Some(Outcome::WerewolfWins));
    }

    #[test]
    fn three_survivors_keep_playing() {
        let g = game(&[(Role::Villager, true), (Role::Werewolf, true), (Role::Villager, true), (Role::Hunter, false)]);
        assert_eq!(check_win(&g), None);
    }

    #[test]
    fn tally_keeps_every_tied_leader() {
        let mut tally = Vec::new();
        for t in [Some(3), Some(1), Some(3), None, Some(1), Some(2)] { add_vote(&mut tally, t); }
        assert_eq!(tally, vec![(3, 2), (1, 2), (2, 1)]);
        assert_eq!(leading_candidates(&tally), vec![3, 1]);
        assert!(leading_candidates(&[]).is_empty());
    }
}
