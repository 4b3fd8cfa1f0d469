//! Snapshot loading and query execution for the `fluxo` binary.
//!
//! Stands in for the presentation collaborator: it reads a snapshot file,
//! runs one engine operation and hands back JSON. No formatting of money or
//! dates happens here.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use fluxo_core::audit::CrossValidator;
use fluxo_core::balance::{AccountScope, BalanceCalculator, Period, RunningBalanceSequencer};
use fluxo_core::ledger::{EntryFilter, LedgerSnapshot, RawSnapshot, overdue_entries};
use fluxo_shared::types::BankAccountId;
use fluxo_shared::{AppConfig, AppError, AppResult};
use serde_json::Value;
use tracing::info;

/// Engine operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Balance snapshot for the scope.
    Balance,
    /// Per-account snapshots and their sum.
    Breakdown,
    /// Statement rows with running balances.
    Statement,
    /// Cross-validation report.
    Audit,
    /// Overdue entries, oldest first.
    Overdue,
}

/// A fully resolved request.
#[derive(Debug, Clone)]
pub struct Query {
    /// Operation.
    pub kind: QueryKind,
    /// Window.
    pub period: Period,
    /// Accounts; empty means all.
    pub accounts: Vec<BankAccountId>,
    /// Include entries without an account.
    pub unfiltered: bool,
    /// The engine's notion of today.
    pub today: NaiveDate,
}

impl Query {
    fn scope(&self) -> AppResult<AccountScope> {
        match (self.unfiltered, self.accounts.is_empty()) {
            (true, true) => Ok(AccountScope::Unfiltered),
            (true, false) => Err(AppError::Validation(
                "--unfiltered cannot be combined with --account".into(),
            )),
            (false, _) => Ok(AccountScope::from_ids(self.accounts.clone())),
        }
    }
}

/// Picks the snapshot file: the flag wins over `cli.snapshot_path`.
///
/// # Errors
///
/// Returns `AppError::NotFound` when neither is set.
pub fn resolve_snapshot_path(flag: Option<PathBuf>, config: &AppConfig) -> AppResult<PathBuf> {
    flag.or_else(|| config.cli.snapshot_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| {
            AppError::NotFound("no snapshot file; pass --snapshot or set cli.snapshot_path".into())
        })
}

/// Builds the window from optional bounds, defaulting to the month of `today`.
///
/// # Errors
///
/// Returns `AppError::Validation` if `from` is after `to`.
pub fn resolve_period(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> AppResult<Period> {
    let month = Period::month_of(today);
    let start = from.unwrap_or(month.start());
    let end = to.unwrap_or(month.end());
    Period::new(start, end)
        .ok_or_else(|| AppError::Validation(format!("period start {start} is after end {end}")))
}

/// Reads and normalizes a raw snapshot JSON file.
///
/// # Errors
///
/// Returns `AppError::Io` if the file cannot be read and `AppError::Parse`
/// if it is not a valid snapshot document.
pub fn load_snapshot(path: &Path) -> AppResult<LedgerSnapshot> {
    let raw = std::fs::read_to_string(path)?;
    let snapshot = parse_snapshot(&raw)?;
    info!(
        path = %path.display(),
        entries = snapshot.entries.len(),
        accounts = snapshot.accounts.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Parses and normalizes a raw snapshot document.
///
/// # Errors
///
/// Returns `AppError::Parse` on malformed JSON.
pub fn parse_snapshot(raw: &str) -> AppResult<LedgerSnapshot> {
    let raw: RawSnapshot = serde_json::from_str(raw)?;
    Ok(raw.normalize())
}

/// Runs a query against a snapshot and returns the result as JSON.
///
/// # Errors
///
/// Returns `AppError::Validation` when `unfiltered` is combined with an
/// account selection, and `AppError::Parse` if the result cannot be serialized.
pub fn execute(query: &Query, snapshot: &LedgerSnapshot, config: &AppConfig) -> AppResult<Value> {
    let scope = query.scope()?;
    let entries = &snapshot.entries;
    let accounts = &snapshot.accounts;

    let value = match query.kind {
        QueryKind::Balance => serde_json::to_value(BalanceCalculator::compute(
            entries,
            accounts,
            &scope,
            query.period,
            query.today,
        ))?,
        QueryKind::Breakdown => serde_json::to_value(BalanceCalculator::breakdown(
            entries,
            accounts,
            &scope,
            query.period,
            query.today,
        ))?,
        QueryKind::Statement => serde_json::to_value(RunningBalanceSequencer::sequence_period(
            entries,
            accounts,
            &scope,
            query.period,
            query.today,
        ))?,
        QueryKind::Audit => serde_json::to_value(
            CrossValidator::with_tolerance(config.audit.tolerance).audit(
                snapshot,
                query.period,
                query.today,
            ),
        )?,
        QueryKind::Overdue => {
            let filter = query
                .accounts
                .iter()
                .fold(EntryFilter::new(), |f, id| f.with_bank_account(*id))
                .include_unassigned(query.unfiltered);
            let listed: Vec<_> = filter.apply(entries, query.today).into_iter().cloned().collect();
            serde_json::to_value(overdue_entries(&listed, query.today))?
        }
    };
    Ok(value)
}
