//! Immutable snapshot of entries and accounts for one computation request.

use std::collections::HashSet;

use fluxo_shared::types::{BankAccountId, LedgerEntryId};
use serde::{Deserialize, Serialize};

use super::entry::{BankAccount, EntryStatus, LedgerEntry};
use super::error::LedgerError;

/// A data problem the engine recovers from locally.
///
/// Computation excludes or zero-coerces the affected entry and keeps going;
/// anomalies are surfaced to the caller as non-fatal audit output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotAnomaly {
    /// Entry references a bank account missing from the snapshot.
    UnknownBankAccount {
        /// The entry.
        entry_id: LedgerEntryId,
        /// The unknown account.
        bank_account_id: BankAccountId,
    },
    /// Paid entry without a settlement date; excluded from realized sums.
    PaidWithoutSettlementDate {
        /// The entry.
        entry_id: LedgerEntryId,
    },
    /// Pending or cancelled entry carrying a settlement date.
    SettlementDateOnUnpaid {
        /// The entry.
        entry_id: LedgerEntryId,
    },
    /// Pending entry without a due date; excluded from projected sums.
    PendingWithoutDueDate {
        /// The entry.
        entry_id: LedgerEntryId,
    },
    /// Source data stored a literal "overdue"; the derived status was used.
    LegacyOverdueTag {
        /// The entry.
        entry_id: LedgerEntryId,
    },
    /// Two entries share the same id.
    DuplicateEntryId {
        /// The repeated id.
        entry_id: LedgerEntryId,
    },
    /// Source record had no id; the assigned one cannot be targeted by a mutation.
    MissingSourceId {
        /// The transient id.
        entry_id: LedgerEntryId,
    },
}

impl SnapshotAnomaly {
    /// Returns the entry the anomaly refers to.
    #[must_use]
    pub fn entry_id(&self) -> LedgerEntryId {
        match self {
            Self::UnknownBankAccount { entry_id, .. }
            | Self::PaidWithoutSettlementDate { entry_id }
            | Self::SettlementDateOnUnpaid { entry_id }
            | Self::PendingWithoutDueDate { entry_id }
            | Self::LegacyOverdueTag { entry_id }
            | Self::DuplicateEntryId { entry_id }
            | Self::MissingSourceId { entry_id } => *entry_id,
        }
    }
}

impl std::fmt::Display for SnapshotAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBankAccount {
                bank_account_id, ..
            } => write!(f, "references unknown bank account {bank_account_id}"),
            Self::PaidWithoutSettlementDate { .. } => write!(f, "paid without a settlement date"),
            Self::SettlementDateOnUnpaid { .. } => {
                write!(f, "settlement date set on an unpaid entry")
            }
            Self::PendingWithoutDueDate { .. } => write!(f, "pending without a due date"),
            Self::LegacyOverdueTag { .. } => write!(f, "stored status was a literal overdue"),
            Self::DuplicateEntryId { .. } => write!(f, "duplicate entry id"),
            Self::MissingSourceId { .. } => write!(f, "source record had no id"),
        }
    }
}

/// Entries and bank accounts fetched together for one computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Normalized entries.
    pub entries: Vec<LedgerEntry>,
    /// Bank accounts.
    pub accounts: Vec<BankAccount>,
}

impl LedgerSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(entries: Vec<LedgerEntry>, accounts: Vec<BankAccount>) -> Self {
        Self { entries, accounts }
    }

    /// Looks up a bank account.
    #[must_use]
    pub fn account(&self, id: BankAccountId) -> Option<&BankAccount> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Looks up an entry.
    #[must_use]
    pub fn entry(&self, id: LedgerEntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Lists every anomaly in entry order.
    #[must_use]
    pub fn anomalies(&self) -> Vec<SnapshotAnomaly> {
        let known: HashSet<BankAccountId> = self.accounts.iter().map(|a| a.id).collect();
        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut anomalies = Vec::new();

        for entry in &self.entries {
            if !seen.insert(entry.id) {
                anomalies.push(SnapshotAnomaly::DuplicateEntryId { entry_id: entry.id });
            }
            if let Some(account_id) = entry.bank_account_id {
                if !known.contains(&account_id) {
                    anomalies.push(SnapshotAnomaly::UnknownBankAccount {
                        entry_id: entry.id,
                        bank_account_id: account_id,
                    });
                }
            }
            match (entry.status, entry.settlement_date) {
                (EntryStatus::Paid, None) => {
                    anomalies.push(SnapshotAnomaly::PaidWithoutSettlementDate { entry_id: entry.id });
                }
                (EntryStatus::Pending | EntryStatus::Cancelled, Some(_)) => {
                    anomalies.push(SnapshotAnomaly::SettlementDateOnUnpaid { entry_id: entry.id });
                }
                _ => {}
            }
            if entry.status == EntryStatus::Pending && entry.due_date.is_none() {
                anomalies.push(SnapshotAnomaly::PendingWithoutDueDate { entry_id: entry.id });
            }
            if entry.legacy_overdue_tag {
                anomalies.push(SnapshotAnomaly::LegacyOverdueTag { entry_id: entry.id });
            }
            if entry.missing_source_id {
                anomalies.push(SnapshotAnomaly::MissingSourceId { entry_id: entry.id });
            }
        }

        anomalies
    }

    /// Strict check for callers that prefer failing over recovering.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InconsistentSnapshot` for the first anomaly.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match self.anomalies().into_iter().next() {
            Some(anomaly) => Err(LedgerError::InconsistentSnapshot {
                entry_id: anomaly.entry_id(),
                reason: anomaly.to_string(),
            }),
            None => Ok(()),
        }
    }
}
