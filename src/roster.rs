use std::collections::HashSet;

use crate::model::{Player, PlayerId, Role};
use crate::rng::Xorshift32;

pub const NAME_POOL: [&str; 24] = [
    "Aline", "Bastien", "Cedric", "Daria", "Eliot", "Fanny", "Gaspard", "Hugo", "Ines", "Jules", "Khadija", "Leo",
    "Mila", "Nina", "Oscar", "Pia", "Quentin", "Rita", "Sami", "Tara", "Ugo", "Vera", "Wassim", "Yara",
];
/// Used once the pool draw keeps colliding; the only name allowed to repeat.
pub const FALLBACK_NAME: &str = "Villager";
pub const DEFAULT_HUMAN_NAME: &str = "You";
const NAME_DRAW_ATTEMPTS: usize = 50;

/// Human at index 0 (id 0), then `count - 1` named bots, every one a villager.
pub fn draw_players(rng: &mut Xorshift32, human_name: &str, count: usize) -> Vec<Player> {
    let human_name = match human_name.trim() { "" => DEFAULT_HUMAN_NAME, n => n };
    let mut used: HashSet<&str> = HashSet::from([human_name]);
    let mut players = Vec::with_capacity(count);
    players.push(Player { id: 0, name: human_name.to_string(), is_human: true, role: Role::Villager, alive: true, hint: None });
    for i in 1..count {
        let name = draw_name(rng, &mut used);
        players.push(Player { id: i as PlayerId, name: name.to_string(), is_human: false, role: Role::Villager, alive: true, hint: None });
    }
    players
}

fn draw_name(rng: &mut Xorshift32, used: &mut HashSet<&str>) -> &'static str {
    for _ in 0..NAME_DRAW_ATTEMPTS {
        let name = NAME_POOL[rng.below(NAME_POOL.len())];
        if used.insert(name) { return name; }
    }
    FALLBACK_NAME
}

/// Shuffles the ids; the first becomes the werewolf, the second the hunter
/// when enabled. A hunter id equal to the wolf's leaves the match hunterless.
pub fn assign_roles(rng: &mut Xorshift32, players: &mut [Player], hunter_enabled: bool) {
    let mut ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    rng.shuffle(&mut ids);
    let Some(&wolf_id) = ids.first() else { return };
    set_role(players, wolf_id, Role::Werewolf);
    if hunter_enabled {
        if let Some(&hunter_id) = ids.get(1) {
            if hunter_id != wolf_id { set_role(players, hunter_id, Role::Hunter); }
        }
    }
}

pub fn build_roster(rng: &mut Xorshift32, human_name: &str, count: usize, hunter_enabled: bool) -> Vec<Player> {
    let mut players = draw_players(rng, human_name, count);
    assign_roles(rng, &mut players, hunter_enabled);
    players
}

fn set_role(players: &mut [Player], id: PlayerId, role: Role) {
    if let Some(p) = players.iter_mut().find(|p| p.id == id) { p.role = role; }
}
