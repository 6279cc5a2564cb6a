//! Draw a gift exchange from the command line
//!
//! Usage:
//!   lottery --file roster.json
//!   lottery --seed 42 anna bertil cecilia
//!   lottery --file roster.json --out assignment.blob --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lottery_cli::{build_roster, draw, render_json, render_text, write_blob};
use lottery_core::{
    AssignmentGenerator, LotteryConfig, SingleParticipantPolicy, DEFAULT_MAX_ATTEMPTS,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lottery")]
#[command(about = "Draw who gives a gift to whom")]
struct Args {
    /// Roster file: {"name": ["forbidden", ...], ...}
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Fixed seed for the draw (random if omitted)
    #[arg(long, short)]
    seed: Option<u64>,

    /// Attempts before the draw gives up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Accept a single participant, who then draws themselves
    #[arg(long)]
    allow_single: bool,

    /// Print a JSON report instead of one line per giver
    #[arg(long)]
    json: bool,

    /// Also write the obfuscated blob the server loads
    #[arg(long)]
    out: Option<PathBuf>,

    /// Extra participants without constraints
    names: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.file.is_none() && args.names.is_empty() {
        anyhow::bail!("Nothing to draw: pass --file and/or participant names");
    }

    let config = LotteryConfig {
        max_attempts: args.max_attempts,
        seed: args.seed,
        single_participant: if args.allow_single {
            SingleParticipantPolicy::SelfAssign
        } else {
            SingleParticipantPolicy::Reject
        },
        claim_deadline: None,
    };
    let generator = AssignmentGenerator::from_config(&config);

    let roster = build_roster(args.file.as_deref(), &args.names).context("Failed to build roster")?;
    let generated = draw(&roster, &generator).context("Draw failed")?;

    if let Some(out) = &args.out {
        write_blob(out, &generated.assignment)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        tracing::info!(path = %out.display(), "Wrote assignment blob");
    }

    if args.json {
        println!("{}", render_json(&generated)?);
    } else {
        print!("{}", render_text(&generated.assignment));
        println!("Seed: {}", generated.seed);
        println!("Retries: {}", generated.attempt);
    }

    Ok(())
}
