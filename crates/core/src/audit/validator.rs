//! Cross-validation of balance figures through two traversals.

use chrono::NaiveDate;
use fluxo_shared::types::{TOLERANCE, approx_eq};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::types::{AuditFinding, AuditMetric, AuditReport};
use crate::balance::{AccountScope, BalanceCalculator, BalanceSnapshot, Period};
use crate::ledger::{BankAccount, LedgerEntry, LedgerSnapshot};

/// Recomputes headline metrics via the aggregate path and the per-account
/// breakdown path and reports whether they agree.
///
/// Read-only and side-effect free apart from logging. A mismatch is a
/// normal outcome, reported as a finding with `matches = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossValidator {
    tolerance: Decimal,
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossValidator {
    /// Creates a validator with the standard 0.01 tolerance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tolerance: TOLERANCE,
        }
    }

    /// Creates a validator with a custom tolerance.
    #[must_use]
    pub const fn with_tolerance(tolerance: Decimal) -> Self {
        Self { tolerance }
    }

    /// Current tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Compares both paths over the same entries and accounts.
    #[must_use]
    pub fn cross_validate(
        &self,
        entries: &[LedgerEntry],
        accounts: &[BankAccount],
        period: Period,
        today: NaiveDate,
    ) -> Vec<AuditFinding> {
        let scope = AccountScope::all();
        let path_a = BalanceCalculator::compute(entries, accounts, &scope, period, today);
        let path_b = BalanceCalculator::breakdown(entries, accounts, &scope, period, today).total;
        self.compare(&path_a, &path_b)
    }

    /// Compares the aggregate path over one snapshot with the breakdown path
    /// over another, e.g. two surfaces that fetched their data separately.
    #[must_use]
    pub fn cross_validate_sources(
        &self,
        aggregate_source: &LedgerSnapshot,
        breakdown_source: &LedgerSnapshot,
        period: Period,
        today: NaiveDate,
    ) -> Vec<AuditFinding> {
        let scope = AccountScope::all();
        let path_a = BalanceCalculator::compute(
            &aggregate_source.entries,
            &aggregate_source.accounts,
            &scope,
            period,
            today,
        );
        let path_b = BalanceCalculator::breakdown(
            &breakdown_source.entries,
            &breakdown_source.accounts,
            &scope,
            period,
            today,
        )
        .total;
        self.compare(&path_a, &path_b)
    }

    /// Runs the cross-validation and attaches the snapshot's anomalies.
    #[must_use]
    pub fn audit(&self, snapshot: &LedgerSnapshot, period: Period, today: NaiveDate) -> AuditReport {
        let findings = self.cross_validate(&snapshot.entries, &snapshot.accounts, period, today);
        let anomalies = snapshot.anomalies();
        for anomaly in &anomalies {
            warn!(entry_id = %anomaly.entry_id(), %anomaly, "snapshot anomaly");
        }
        let all_match = findings.iter().all(|f| f.matches);
        AuditReport {
            period_start: period.start(),
            period_end: period.end(),
            findings,
            anomalies,
            all_match,
        }
    }

    fn compare(&self, path_a: &BalanceSnapshot, path_b: &BalanceSnapshot) -> Vec<AuditFinding> {
        AuditMetric::ALL
            .into_iter()
            .map(|metric| {
                let a = metric_value(path_a, metric);
                let b = metric_value(path_b, metric);
                let matches = approx_eq(a, b, self.tolerance);
                if matches {
                    debug!(metric = metric.label(), value = %a, "audit metric matches");
                } else {
                    warn!(metric = metric.label(), path_a = %a, path_b = %b, "audit metric mismatch");
                }
                AuditFinding {
                    metric,
                    metric_label: metric.label().to_string(),
                    value_from_path_a: a,
                    value_from_path_b: b,
                    matches,
                }
            })
            .collect()
    }
}

fn metric_value(snapshot: &BalanceSnapshot, metric: AuditMetric) -> Decimal {
    match metric {
        AuditMetric::OpeningBalance => snapshot.opening_balance,
        AuditMetric::RealizedBalance => snapshot.realized_balance,
        AuditMetric::ProjectedBalance => snapshot.projected_balance,
        AuditMetric::TotalInflows => snapshot.total_inflows_realized,
    }
}
