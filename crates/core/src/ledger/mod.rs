//! Unified ledger model.
//!
//! This module holds the shape every computation consumes:
//! - Ledger entries and bank accounts
//! - Normalization of raw receivables and payables
//! - Snapshots and their data anomalies
//! - Entry filters and the overdue listing
//! - Error types for ledger operations

pub mod entry;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod snapshot;

pub use entry::{BankAccount, Direction, DisplayStatus, EntryStatus, LedgerEntry};
pub use error::LedgerError;
pub use filter::{DateField, EntryFilter, OverdueEntry, overdue_entries};
pub use normalize::{RawPayable, RawReceivable, RawSnapshot, normalize, parse_date, parse_status};
pub use snapshot::{LedgerSnapshot, SnapshotAnomaly};
