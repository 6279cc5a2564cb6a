//! Lottery server CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use lottery_core::{LotteryConfig, SingleParticipantPolicy, DEFAULT_MAX_ATTEMPTS};
use lottery_server::{init_prometheus_recorder, ServerBuilder};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lottery-server")]
#[command(about = "Draw a gift exchange and let each participant see their own recipient")]
struct Args {
    /// Roster file: {"name": ["forbidden", ...], ...}
    #[arg(long, env = "LOTTERY_ROSTER", default_value = "roster.json")]
    roster: PathBuf,

    /// Where the drawn assignment is persisted
    #[arg(long, env = "LOTTERY_STATE", default_value = "assignment.blob")]
    state: PathBuf,

    /// Fixed seed for the draw (random if omitted)
    #[arg(long, env = "LOTTERY_SEED")]
    seed: Option<u64>,

    /// Attempts before the draw gives up
    #[arg(long, env = "LOTTERY_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Claim cookies expire at this RFC 3339 time (default: Dec 26, 00:00 UTC)
    #[arg(long, env = "LOTTERY_CLAIM_DEADLINE")]
    claim_deadline: Option<DateTime<Utc>>,

    /// Accept a single participant, who then draws themselves
    #[arg(long, env = "LOTTERY_ALLOW_SINGLE")]
    allow_single: bool,

    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    listen: String,

    /// Serve Prometheus metrics on /metrics
    #[arg(long, env = "LOTTERY_METRICS")]
    metrics: bool,
}

impl Args {
    fn lottery_config(&self) -> LotteryConfig {
        LotteryConfig {
            max_attempts: self.max_attempts,
            seed: self.seed,
            single_participant: if self.allow_single {
                SingleParticipantPolicy::SelfAssign
            } else {
                SingleParticipantPolicy::Reject
            },
            claim_deadline: self.claim_deadline,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lottery_server=info,lottery_core=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut builder = ServerBuilder::new(&args.roster, &args.state).config(args.lottery_config());
    if args.metrics {
        let handle = init_prometheus_recorder().context("failed to install metrics recorder")?;
        builder = builder.metrics(handle);
    }

    let server = builder.build().with_context(|| {
        format!(
            "failed to prepare round from {} / {}",
            args.roster.display(),
            args.state.display()
        )
    })?;

    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    server.serve(listener).await?;

    Ok(())
}
