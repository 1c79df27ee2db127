//! Headless Battle Runner
//!
//! Fights two encounters one or more times and prints the verdicts as JSON
//! or text. Rosters come from a TOML file or are rolled from a seed.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use formation_clash::battle::{Battle, BattleLog, BattleOutcome, Encounter, Formation, MemoryLog, Strategy};
use formation_clash::combat::Roster;
use formation_clash::core::config::{BattleConfig, DamageVisibility};
use formation_clash::core::error::Result;
use serde::Serialize;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

/// Headless Battle Runner - formation vs formation
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Fight two formations and report who won")]
struct Args {
    /// Roster TOML file ([[fighter]] tables); random rosters when omitted
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Battle config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Party 1 formation, e.g. "a1,a2,a3/a4,-,a6"
    #[arg(long, default_value = "a1,a2,a3/a4,a5,a6")]
    party1: String,

    /// Party 2 formation
    #[arg(long, default_value = "b1,b2,b3/b4,b5,b6")]
    party2: String,

    /// Party 1 strategy: row-sweep, column-sweep, concentrated or custom:...
    #[arg(long, default_value = "row-sweep")]
    strategy1: String,

    /// Party 2 strategy
    #[arg(long, default_value = "column-sweep")]
    strategy2: String,

    /// Number of successive battles with the same rosters
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Random seed for generated rosters
    #[arg(long)]
    seed: Option<u64>,

    /// Hide damage numbers in the battle log
    #[arg(long)]
    hide_damage: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the battle log of every round to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct RoundResult {
    round: u32,
    outcome: BattleOutcome,
    elapsed_ms: u128,
    log_entries: usize,
    party1_standing: usize,
    party2_standing: usize,
}

/// JSON output structure
#[derive(Serialize)]
struct RunnerResult {
    party1: String,
    party2: String,
    strategy1: String,
    strategy2: String,
    seed: Option<u64>,
    rounds: Vec<RoundResult>,
}

fn standing(encounter: &Encounter) -> usize {
    encounter
        .formation()
        .occupants()
        .filter(|(_, combatant)| !combatant.is_defeated())
        .count()
}

fn load_roster(args: &Args) -> Result<(Roster, Option<u64>)> {
    if let Some(path) = &args.roster {
        return Ok((Roster::load(path)?, None));
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut roster = Roster::random("a", 6, seed)?;
    roster.extend(Roster::random("b", 6, seed.wrapping_add(1))?)?;
    Ok((roster, Some(seed)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("formation_clash=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    if args.hide_damage {
        config.damage_visibility = DamageVisibility::Hidden;
    }

    let (roster, seed) = load_roster(&args)?;
    let party1 = Encounter::new(
        Formation::parse(&args.party1, &roster)?,
        args.strategy1.parse::<Strategy>()?,
    );
    let party2 = Encounter::new(
        Formation::parse(&args.party2, &roster)?,
        args.strategy2.parse::<Strategy>()?,
    );

    let mut result = RunnerResult {
        party1: party1.formation().to_string(),
        party2: party2.formation().to_string(),
        strategy1: party1.strategy().to_string(),
        strategy2: party2.strategy().to_string(),
        seed,
        rounds: Vec::new(),
    };

    let (mut party1, mut party2) = (Arc::new(party1), Arc::new(party2));
    for round in 1..=args.rounds.max(1) {
        let memory = Arc::new(MemoryLog::new());
        let sink: Arc<dyn BattleLog> = memory.clone();
        let mut battle = Battle::new(party1, party2, config.clone(), Some(sink))?;

        let started = Instant::now();
        battle.run();
        battle.wait_for_end().await;
        let elapsed = started.elapsed();

        if args.verbose {
            eprintln!("=== Round {} ===", round);
            for entry in memory.entries() {
                eprintln!("  {}", entry);
            }
        }

        result.rounds.push(RoundResult {
            round,
            outcome: battle.outcome(),
            elapsed_ms: elapsed.as_millis(),
            log_entries: memory.len(),
            party1_standing: standing(battle.party1()),
            party2_standing: standing(battle.party2()),
        });

        battle.restore_combatants()?;
        (party1, party2) = battle.into_encounters();
    }

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "text" => {
            println!("Battle Result");
            println!("=============");
            println!("Party 1: {} ({})", result.party1, result.strategy1);
            println!("Party 2: {} ({})", result.party2, result.strategy2);
            for round in &result.rounds {
                println!(
                    "Round {}: {:?} in {} ms ({} log entries, standing {} vs {})",
                    round.round,
                    round.outcome,
                    round.elapsed_ms,
                    round.log_entries,
                    round.party1_standing,
                    round.party2_standing
                );
            }
            if let Some(seed) = result.seed {
                println!("Seed: {}", seed);
            }
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}
