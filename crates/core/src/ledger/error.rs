//! Ledger error types for mutation and snapshot errors.
//!
//! Mutation errors are returned to the caller to surface as user-facing
//! messages. Computation never fails on bad data; anomalies are reported
//! instead, and `InconsistentSnapshot` only comes out of the strict check.

use fluxo_shared::types::LedgerEntryId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::entry::EntryStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Partial settlement amount is out of range.
    #[error("Invalid amount: paid amount {paid} must be greater than zero and less than {amount}")]
    InvalidAmount {
        /// The requested paid amount.
        paid: Decimal,
        /// The entry amount before the split.
        amount: Decimal,
    },

    /// Entry is tied to a contract installment.
    #[error("Entry {0} is linked to a contract installment and cannot be deleted")]
    LinkedEntry(LedgerEntryId),

    /// Operation is not valid for the entry's current status.
    #[error("Cannot {action} an entry with status {status}")]
    InvalidTransition {
        /// The entry's current stored status.
        status: EntryStatus,
        /// The attempted operation.
        action: &'static str,
    },

    // ========== Snapshot Errors ==========
    /// Snapshot data breaks an invariant.
    #[error("Inconsistent snapshot at entry {entry_id}: {reason}")]
    InconsistentSnapshot {
        /// The offending entry.
        entry_id: LedgerEntryId,
        /// What is wrong with it.
        reason: String,
    },

    /// Entry not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(LedgerEntryId),

    // ========== Storage Errors ==========
    /// The storage collaborator failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::LinkedEntry(_) => "LINKED_ENTRY",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InconsistentSnapshot { .. } => "INCONSISTENT_SNAPSHOT",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidAmount { .. } | Self::InvalidTransition { .. } => 400,

            // 403 Forbidden - needs override privilege
            Self::LinkedEntry(_) => 403,

            // 404 Not Found
            Self::EntryNotFound(_) => 404,

            // 422 Unprocessable - bad data from the storage collaborator
            Self::InconsistentSnapshot { .. } => 422,

            // 500 Internal Server Error
            Self::Store(_) => 500,
        }
    }

    /// Returns true if the message can be shown to the end user as-is.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::LinkedEntry(_)
                | Self::InvalidTransition { .. }
                | Self::EntryNotFound(_)
        )
    }
}
