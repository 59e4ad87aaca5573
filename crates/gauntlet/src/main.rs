//! Gauntlet
//!
//! Terminal entry point: fight through a sequence of opponents, one numbered
//! menu choice at a time.

mod console;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gauntlet_core::{
    ConfigError, GameRng, Outcome, PlayerDef, Session, SessionConfig, default_campaign,
    load_encounters,
};

use crate::console::{Console, Printer};

/// Turn-based combat gauntlet
#[derive(Parser, Debug)]
#[command(name = "gauntlet")]
#[command(author, version, about = "Gauntlet - Survive every encounter!", long_about = None)]
struct Args {
    /// Character name (prompted for when omitted)
    #[arg(short = 'u', long = "name")]
    name: Option<String>,

    /// RNG seed for a reproducible run
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// JSON file with the encounter list
    #[arg(short = 'e', long = "encounters")]
    encounters: Option<PathBuf>,

    /// Let boss specials burn and stun the player
    #[arg(long = "status-effects")]
    status_effects: bool,

    /// Chance that running away succeeds (0.0 - 1.0)
    #[arg(long = "flee-chance")]
    flee_chance: Option<f64>,

    /// Don't wait for Enter between rounds
    #[arg(long = "no-pause")]
    no_pause: bool,

    /// Debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut console = Console::new(io::stdin().lock(), !args.no_pause);

    let config = match build_config(&args, &mut console) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    info!(seed = rng.seed(), "rng ready");

    let mut session = match Session::new(config, rng) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    println!("\nWelcome, {}! Your adventure begins...", session.player().name);
    console.press_enter();

    let outcome = session.run(&mut console, &mut Printer);

    game_over(&mut console, outcome, session.player().level());
    ExitCode::SUCCESS
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_config<R: io::BufRead>(
    args: &Args,
    console: &mut Console<R>,
) -> Result<SessionConfig, ConfigError> {
    let encounters = match &args.encounters {
        Some(path) => load_encounters(path)?,
        None => default_campaign(),
    };

    let name = match &args.name {
        Some(name) => name.clone(),
        None => {
            console.header("Gauntlet - Character Creation");
            console
                .prompt("Enter your character's name: ")
                .unwrap_or_default()
        }
    };

    let mut config = SessionConfig {
        player: PlayerDef::default().named(&name),
        encounters,
        player_status_effects: args.status_effects,
        ..SessionConfig::default()
    };
    if let Some(chance) = args.flee_chance {
        config.tuning.flee_chance = chance;
    }
    Ok(config)
}

fn game_over<R: io::BufRead>(console: &mut Console<R>, outcome: Outcome, level: u32) {
    if outcome == Outcome::Abandoned {
        println!("\nGame interrupted. Thanks for playing!");
        return;
    }
    console.press_enter();
    console.header("Game Over");
    match outcome {
        Outcome::Defeat => println!("{}", "You were defeated in battle...".red()),
        _ => println!("Thanks for playing!"),
    }
    println!("\nYou reached level {level}.");
    console.press_enter();
}
