//! Headless match runner: plays seeded matches with a passive human and
//! prints how often each side wins.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::RngCore;
use werewolf_engine::rng::{derive_seed, Xorshift32};
use werewolf_engine::{Difficulty, Match, MatchConfig, Outcome};

const STEP_MS: u64 = 250;
/// Far beyond the longest possible match with the default timings.
const MAX_CLOCK_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Run headless werewolf matches and report the outcomes")]
#[command(version)]
struct Args {
    /// Base seed; every match derives its own from it
    #[arg(short, long)]
    seed: Option<u32>,

    /// Number of matches to play
    #[arg(short, long, default_value_t = 100)]
    matches: u32,

    /// Players per match, human included
    #[arg(short, long)]
    players: Option<usize>,

    /// easy, normal or hard
    #[arg(short, long)]
    difficulty: Option<String>,

    #[arg(long)]
    no_hunter: bool,

    /// JSON match config; flags given on the command line win over it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every match's narration log
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            MatchConfig::from_json(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => MatchConfig::default(),
    };
    if let Some(players) = args.players { config.player_count = players; }
    if let Some(d) = &args.difficulty { config.difficulty = d.parse::<Difficulty>()?; }
    if args.no_hunter { config.hunter_enabled = false; }
    config.validate()?;
    Ok(config)
}

fn play(config: MatchConfig, seed: u32) -> Result<Match> {
    let mut m = Match::with_seed(config, seed, 0)?;
    m.ready();
    let mut now = 0;
    while m.outcome().is_none() && now < MAX_CLOCK_MS {
        now += STEP_MS;
        m.advance(now);
    }
    Ok(m)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("werewolf_engine=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let base = args.seed.unwrap_or_else(|| {
        let now = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or_default();
        derive_seed(now, config.player_count)
    });
    let mut seeds = Xorshift32::new(base);

    let (mut villagers, mut wolf, mut unfinished) = (0u32, 0u32, 0u32);
    let mut days = 0u64;
    for _ in 0..args.matches {
        let seed = seeds.next_u32();
        let m = play(config.clone(), seed)?;
        match m.outcome() {
            Some(Outcome::VillagersWin) => villagers += 1,
            Some(Outcome::WerewolfWins) => wolf += 1,
            None => unfinished += 1,
        }
        days += u64::from(m.day());
        if args.verbose {
            println!("--- seed {seed} ---");
            for ev in m.events() { println!("[day {}] {}", ev.day, ev.text); }
        }
    }

    let total = args.matches.max(1) as f64;
    println!("base seed      {base}");
    println!("matches        {}", args.matches);
    println!("villagers win  {villagers} ({:.1}%)", 100.0 * villagers as f64 / total);
    println!("werewolf wins  {wolf} ({:.1}%)", 100.0 * wolf as f64 / total);
    if unfinished > 0 { println!("unfinished     {unfinished}"); }
    println!("average days   {:.2}", days as f64 / total);
    Ok(())
}
