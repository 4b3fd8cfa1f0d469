//! State transitions on a single entry.
//!
//! Every function here works on an entry the caller already holds; nothing is
//! persisted. [`super::SettlementMutator`] wires these into a store.

use chrono::NaiveDate;
use fluxo_shared::types::{BankAccountId, LedgerEntryId};
use rust_decimal::Decimal;

use super::trail::PartialSettlementRecord;
use crate::ledger::{EntryStatus, LedgerEntry, LedgerError};

/// Whether a settle call changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Entry was updated.
    Applied,
    /// Entry was already paid on that date.
    Unchanged,
}

/// Result of splitting an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialSettlement {
    /// The new pending remainder.
    pub residual: LedgerEntry,
    /// Trail record describing the split.
    pub record: PartialSettlementRecord,
}

/// Stateless service for settlement transitions.
pub struct SettlementService;

impl SettlementService {
    /// Marks an entry paid on `settlement_date`.
    ///
    /// Settling a paid entry again on the same date is a no-op; on a
    /// different date the settlement date is overwritten. The amount never
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidTransition` for a cancelled entry.
    pub fn settle(
        entry: &mut LedgerEntry,
        settlement_date: NaiveDate,
    ) -> Result<SettleOutcome, LedgerError> {
        match entry.status {
            EntryStatus::Paid if entry.settlement_date == Some(settlement_date) => {
                Ok(SettleOutcome::Unchanged)
            }
            EntryStatus::Pending | EntryStatus::Paid => {
                entry.status = EntryStatus::Paid;
                entry.settlement_date = Some(settlement_date);
                Ok(SettleOutcome::Applied)
            }
            EntryStatus::Cancelled => Err(LedgerError::InvalidTransition {
                status: entry.status,
                action: "settle",
            }),
        }
    }

    /// Returns a paid entry to pending and clears its settlement date.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidTransition` unless the entry is paid.
    pub fn reopen(entry: &mut LedgerEntry) -> Result<(), LedgerError> {
        if entry.status != EntryStatus::Paid {
            return Err(LedgerError::InvalidTransition {
                status: entry.status,
                action: "reopen",
            });
        }
        entry.status = EntryStatus::Pending;
        entry.settlement_date = None;
        Ok(())
    }

    /// Splits a pending entry into a paid portion and a pending residual.
    ///
    /// The original becomes the paid portion (`amount = paid_amount`). The
    /// residual carries `amount - paid_amount`, no adjustments, no contract
    /// link and the original's account, cost center, category, counterparty
    /// and competency date.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidTransition` unless the entry is pending,
    /// and `LedgerError::InvalidAmount` unless `0 < paid_amount < amount`.
    pub fn partial_settle(
        entry: &mut LedgerEntry,
        paid_amount: Decimal,
        settlement_date: NaiveDate,
        residual_due_date: NaiveDate,
    ) -> Result<PartialSettlement, LedgerError> {
        if entry.status != EntryStatus::Pending {
            return Err(LedgerError::InvalidTransition {
                status: entry.status,
                action: "partially settle",
            });
        }
        if paid_amount <= Decimal::ZERO || paid_amount >= entry.amount {
            return Err(LedgerError::InvalidAmount {
                paid: paid_amount,
                amount: entry.amount,
            });
        }

        let residual_amount = entry.amount - paid_amount;
        let residual = LedgerEntry {
            id: LedgerEntryId::new(),
            direction: entry.direction,
            description: entry.description.clone(),
            amount: residual_amount,
            original_amount: residual_amount,
            interest: Decimal::ZERO,
            fine: Decimal::ZERO,
            discount: Decimal::ZERO,
            due_date: Some(residual_due_date),
            competency_date: entry.competency_date,
            settlement_date: None,
            status: EntryStatus::Pending,
            legacy_overdue_tag: false,
            missing_source_id: false,
            bank_account_id: entry.bank_account_id,
            cost_center_id: entry.cost_center_id,
            category_id: entry.category_id,
            counterparty_id: entry.counterparty_id,
            linked_installment_id: None,
        };

        entry.amount = paid_amount;
        entry.status = EntryStatus::Paid;
        entry.settlement_date = Some(settlement_date);

        let record = PartialSettlementRecord {
            original_id: entry.id,
            residual_id: residual.id,
            paid_amount,
            residual_amount,
        };
        Ok(PartialSettlement { residual, record })
    }

    /// Duplicates an entry as a new, unlinked pending entry.
    #[must_use]
    pub fn clone_entry(source: &LedgerEntry) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::new(),
            status: EntryStatus::Pending,
            settlement_date: None,
            legacy_overdue_tag: false,
            missing_source_id: false,
            linked_installment_id: None,
            ..source.clone()
        }
    }

    /// Moves an entry's due date.
    pub fn reschedule(entry: &mut LedgerEntry, due_date: NaiveDate) {
        entry.due_date = Some(due_date);
    }

    /// Moves an entry to another bank account, or unassigns it.
    pub fn reassign(entry: &mut LedgerEntry, bank_account_id: Option<BankAccountId>) {
        entry.bank_account_id = bank_account_id;
    }

    /// Checks whether an entry may be deleted.
    ///
    /// The override flag comes from the caller's privilege check.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::LinkedEntry` for a contract-linked entry without override.
    pub fn validate_can_delete(
        entry: &LedgerEntry,
        allow_linked_override: bool,
    ) -> Result<(), LedgerError> {
        if entry.is_linked() && !allow_linked_override {
            return Err(LedgerError::LinkedEntry(entry.id));
        }
        Ok(())
    }
}
