//! Audit findings and reports.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::SnapshotAnomaly;

/// Headline metrics compared by the audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditMetric {
    /// Opening balance of the window.
    OpeningBalance,
    /// Realized balance at the end of the window.
    RealizedBalance,
    /// Projected balance at the end of the window.
    ProjectedBalance,
    /// Inflows settled inside the window.
    TotalInflows,
}

impl AuditMetric {
    /// Every metric, in report order.
    pub const ALL: [Self; 4] = [
        Self::OpeningBalance,
        Self::RealizedBalance,
        Self::ProjectedBalance,
        Self::TotalInflows,
    ];

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpeningBalance => "Opening balance",
            Self::RealizedBalance => "Realized balance",
            Self::ProjectedBalance => "Projected balance",
            Self::TotalInflows => "Total inflows",
        }
    }
}

/// One metric computed two ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFinding {
    /// Which metric.
    pub metric: AuditMetric,
    /// Label for rendering.
    pub metric_label: String,
    /// Value from the whole-period aggregate.
    pub value_from_path_a: Decimal,
    /// Value from the summed per-account breakdown.
    pub value_from_path_b: Decimal,
    /// True when the two differ by less than the tolerance.
    pub matches: bool,
}

impl AuditFinding {
    /// Absolute difference between the two paths.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        (self.value_from_path_a - self.value_from_path_b).abs()
    }
}

/// Full audit output for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// First day of the window.
    pub period_start: NaiveDate,
    /// Last day of the window.
    pub period_end: NaiveDate,
    /// One finding per metric.
    pub findings: Vec<AuditFinding>,
    /// Data problems recovered from during computation.
    pub anomalies: Vec<SnapshotAnomaly>,
    /// Every finding matched.
    pub all_match: bool,
}

impl AuditReport {
    /// Findings that did not match.
    pub fn mismatches(&self) -> impl Iterator<Item = &AuditFinding> {
        self.findings.iter().filter(|f| !f.matches)
    }
}
