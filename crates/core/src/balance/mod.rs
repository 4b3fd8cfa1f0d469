//! Cash position computation.
//!
//! This module turns a ledger snapshot into bank balances:
//! - Periods and account scopes
//! - Bucket classification shared by every traversal
//! - Opening, realized and projected balances, per account and aggregated
//! - Running balances for statements
//!
//! Overdue entries (pending with a due date before today) never count toward
//! the projected balance.

pub mod bucket;
pub mod calculator;
pub mod period;
pub mod scope;
pub mod sequencer;

#[cfg(test)]
mod calculator_props;
#[cfg(test)]
mod sequencer_props;

pub use bucket::Bucket;
pub use calculator::{BalanceBreakdown, BalanceCalculator, BalanceSnapshot, SnapshotScope};
pub use period::Period;
pub use scope::AccountScope;
pub use sequencer::{RunningBalanceSequencer, SequencedRow, Statement};
