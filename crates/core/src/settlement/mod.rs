//! Settlement mutations.
//!
//! The only component that writes. Operations:
//! - Full settlement and reopening
//! - Partial settlement (paid portion plus pending residual)
//! - Clone, reschedule, reassign account and delete
//!
//! Pure transitions live in [`SettlementService`]; [`SettlementMutator`]
//! applies them through a [`LedgerStore`] and records a [`MutationRecord`]
//! for each applied change.

pub mod mutator;
pub mod service;
pub mod store;
pub mod trail;

#[cfg(test)]
mod service_props;

pub use mutator::SettlementMutator;
pub use service::{PartialSettlement, SettleOutcome, SettlementService};
pub use store::{InMemoryLedgerStore, LedgerStore};
pub use trail::{MutationRecord, PartialSettlementRecord};
