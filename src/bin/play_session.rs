use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use holdem_sim::arena::{
    HoldemSimulationError, PolicyKind, Session, SessionBuilder, SessionConfig, SessionStats,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(name = "play-session")]
#[command(about = "Play a seeded Texas Hold'em session between synthetic players")]
struct Cli {
    /// JSON session config. Flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    players: Option<usize>,

    #[arg(long)]
    stack: Option<u64>,

    #[arg(long)]
    small_blind: Option<u64>,

    #[arg(long)]
    big_blind: Option<u64>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// random, threshold or human_proxy
    #[arg(long, value_parser = parse_policy)]
    policy: Option<PolicyKind>,

    /// Show every hole card in the output.
    #[arg(long)]
    reveal: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play hands and print the final snapshot.
    Play {
        /// Total hands to play. Played in batches of at most 100.
        #[arg(short = 'n', long, default_value_t = 10)]
        hands: usize,
        /// Print every ledger event as well.
        #[arg(short, long)]
        events: bool,
    },
    /// Play hands and print per seat statistics replayed from the ledger.
    Stats {
        #[arg(short = 'n', long, default_value_t = 100)]
        hands: usize,
    },
}

fn parse_policy(s: &str) -> Result<PolicyKind, String> {
    match s {
        "random" => Ok(PolicyKind::Random),
        "threshold" => Ok(PolicyKind::Threshold),
        "human_proxy" | "human-proxy" => Ok(PolicyKind::HumanProxy),
        other => Err(format!("unknown policy {other}")),
    }
}

fn load_config(cli: &Cli) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SessionConfig::default(),
    };
    if let Some(players) = cli.players {
        config.player_count = players;
    }
    if let Some(stack) = cli.stack {
        config.initial_stack = stack;
    }
    if let Some(small_blind) = cli.small_blind {
        config.small_blind = small_blind;
    }
    if let Some(big_blind) = cli.big_blind {
        config.big_blind = big_blind;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    config.reveal_hole_cards |= cli.reveal;
    Ok(config)
}

/// Play `hands` hands in batches, stopping when the session ends.
fn play(session: &mut Session, mut hands: usize) -> Result<(), HoldemSimulationError> {
    while hands > 0 && !session.is_over() {
        let batch = hands.min(100);
        let outcome = session.play_hands(batch)?;
        tracing::info!(
            hands_played = outcome.hands_played,
            ledger_len = outcome.snapshot.ledger_len,
            "Finished batch"
        );
        hands -= batch;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    let mut session = SessionBuilder::default().config(config).build()?;

    match cli.command {
        Commands::Play { hands, events } => {
            play(&mut session, hands)?;
            if events {
                for event in session.events(0) {
                    println!("{}", serde_json::to_string(event)?);
                }
            }
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        }
        Commands::Stats { hands } => {
            play(&mut session, hands)?;
            let stats = SessionStats::replay(session.events(0));
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
