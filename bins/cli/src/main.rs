//! Fluxo command line harness
//!
//! Loads a snapshot file, runs one engine operation and prints JSON.

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fluxo_cli::{Query, QueryKind, execute, load_snapshot, resolve_period, resolve_snapshot_path};
use fluxo_shared::AppConfig;
use fluxo_shared::types::BankAccountId;

#[derive(Parser, Debug)]
#[command(name = "fluxo")]
#[command(about = "Cash position reconciliation over a ledger snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Opening, realized and projected balance for the scope.
    Balance(QueryArgs),
    /// Per-account balances and their sum.
    Breakdown(QueryArgs),
    /// Statement rows with running balances.
    Statement(QueryArgs),
    /// Cross-validate the aggregate and per-account paths.
    Audit(QueryArgs),
    /// Overdue entries, oldest first.
    Overdue(QueryArgs),
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Snapshot JSON file (falls back to `cli.snapshot_path`).
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// First day of the window (default: first day of the current month).
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the window (default: last day of the current month).
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Restrict to a bank account; repeat for several.
    #[arg(long = "account")]
    accounts: Vec<BankAccountId>,
    /// Include entries without a bank account (only without --account).
    #[arg(long, conflicts_with = "accounts")]
    unfiltered: bool,
    /// Override today's date.
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl Command {
    fn split(self) -> (QueryKind, QueryArgs) {
        match self {
            Self::Balance(args) => (QueryKind::Balance, args),
            Self::Breakdown(args) => (QueryKind::Breakdown, args),
            Self::Statement(args) => (QueryKind::Statement, args),
            Self::Audit(args) => (QueryKind::Audit, args),
            Self::Overdue(args) => (QueryKind::Overdue, args),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr so stdout stays pure JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fluxo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let (kind, args) = cli.command.split();
    let today = match args.today {
        Some(today) => today,
        None => config.today()?,
    };
    let period = resolve_period(args.from, args.to, today)?;
    let path = resolve_snapshot_path(args.snapshot, &config)?;
    let snapshot = load_snapshot(&path)?;
    debug!(?kind, %period, %today, "running query");

    let query = Query {
        kind,
        period,
        accounts: args.accounts,
        unfiltered: args.unfiltered,
        today,
    };
    let output = execute(&query, &snapshot, &config)?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}
