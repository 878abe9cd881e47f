mod common;

use common::*;
use proptest::prelude::*;
use werewolf_engine::rng::Xorshift32;
use werewolf_engine::roster::build_roster;
use werewolf_engine::{Match, Outcome, Phase, Role};

fn legal_edge(from: Phase, to: Phase) -> bool {
    use Phase::*;
    matches!(
        (from, to),
        (Reveal, Night)
            | (Night, DayTalk | HunterShot | GameOver)
            | (DayTalk, DayVote | GameOver)
            | (DayVote, Night | HunterShot | GameOver)
            | (HunterShot, DayTalk | Night | GameOver)
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rosters_hold_one_wolf(seed in any::<u32>(), count in 4usize..=24, hunter in any::<bool>()) {
        let players = build_roster(&mut Xorshift32::new(seed), "Ana", count, hunter);
        prop_assert_eq!(players.len(), count);
        prop_assert_eq!(players.iter().filter(|p| p.role == Role::Werewolf).count(), 1);
        let hunters = players.iter().filter(|p| p.role == Role::Hunter).count();
        prop_assert_eq!(hunters, usize::from(hunter));
        prop_assert!(players.iter().all(|p| p.alive));
    }

    #[test]
    fn weighted_pick_stays_in_range(seed in any::<u32>(), weights in prop::collection::vec(-2.0f64..5.0, 1..10)) {
        let ids: Vec<u32> = (0..weights.len() as u32).map(|i| i * 3).collect();
        let picked = werewolf_engine::bot::weighted_pick(&ids, &weights, &mut Xorshift32::new(seed));
        prop_assert!(picked.map_or(false, |id| ids.contains(&id)));
    }

    #[test]
    fn matches_end_in_a_legal_state(seed in any::<u32>(), count in 4usize..=12, hunter in any::<bool>(), d in 0u8..3) {
        let mut m = Match::with_seed(config(count, difficulty(d), hunter), seed, 0).expect("valid config");
        prop_assert!(m.ready());
        let mut alive: Vec<bool> = m.game().players.iter().map(|p| p.alive).collect();
        let (mut prev, mut day, mut shots, mut now) = (Phase::Night, 1, 0, 0u64);
        while m.outcome().is_none() && now < LIMIT_MS {
            now += STEP_MS;
            if let Some(p) = m.advance(now) {
                prop_assert!(legal_edge(prev, p), "{:?} -> {:?}", prev, p);
                if p == Phase::HunterShot { shots += 1; }
                prev = p;
            }
            for (was, p) in alive.iter_mut().zip(&m.game().players) {
                prop_assert!(*was || !p.alive, "{} came back", p.name);
                *was = p.alive;
            }
            prop_assert!(m.day() >= day);
            day = m.day();
        }
        let g = m.game();
        prop_assert!(shots <= 1);
        prop_assert_eq!(g.phase, Phase::GameOver);
        match m.outcome() {
            Some(Outcome::VillagersWin) => prop_assert_eq!(g.wolves_alive(), 0),
            Some(Outcome::WerewolfWins) => prop_assert!(g.wolves_alive() == 1 && g.alive_count() <= 2),
            None => prop_assert!(false, "match never ended"),
        }
    }

    #[test]
    fn replays_are_identical(seed in any::<u32>(), count in 4usize..=10) {
        let run = || {
            let mut m = Match::with_seed(config(count, difficulty(seed as u8), true), seed, 0).expect("valid config");
            play_scripted(&mut m);
            m.events().cloned().collect::<Vec<_>>()
        };
        prop_assert_eq!(run(), run());
    }
}
