//! Audit trail records emitted by applied mutations.

use chrono::NaiveDate;
use fluxo_shared::types::{BankAccountId, LedgerEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a partial settlement did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSettlementRecord {
    /// The entry that now holds the paid portion.
    pub original_id: LedgerEntryId,
    /// The newly created pending remainder.
    pub residual_id: LedgerEntryId,
    /// Amount settled.
    pub paid_amount: Decimal,
    /// Amount still pending.
    pub residual_amount: Decimal,
}

/// One applied change to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MutationRecord {
    /// Entry marked paid.
    Settled {
        /// The entry.
        entry_id: LedgerEntryId,
        /// Settlement date applied.
        settlement_date: NaiveDate,
    },
    /// Paid entry returned to pending.
    Reopened {
        /// The entry.
        entry_id: LedgerEntryId,
    },
    /// Entry split into paid and residual portions.
    PartiallySettled(PartialSettlementRecord),
    /// Entry duplicated as a new pending entry.
    Cloned {
        /// The copied entry.
        source_id: LedgerEntryId,
        /// The new entry.
        clone_id: LedgerEntryId,
    },
    /// Due date moved on a batch of entries.
    Rescheduled {
        /// Entries changed.
        entry_ids: Vec<LedgerEntryId>,
        /// New due date.
        due_date: NaiveDate,
    },
    /// Bank account changed on a batch of entries.
    AccountReassigned {
        /// Entries changed.
        entry_ids: Vec<LedgerEntryId>,
        /// New account, or none to unassign.
        bank_account_id: Option<BankAccountId>,
    },
    /// Entry removed.
    Deleted {
        /// The entry.
        entry_id: LedgerEntryId,
        /// Deletion of a contract-linked entry was allowed by override.
        linked_override: bool,
    },
}
