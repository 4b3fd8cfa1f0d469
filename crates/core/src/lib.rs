//! Core business logic for Fluxo.
//!
//! This crate contains the cash position reconciliation engine with ZERO
//! I/O. Every computation is a pure function of an immutable snapshot and an
//! explicit `today`.
//!
//! # Modules
//!
//! - `ledger` - Unified entry model, normalizer, display status, filters
//! - `settlement` - Settle, reopen, partial settle and other mutations
//! - `balance` - Opening/realized/projected balances and running balances
//! - `audit` - Cross-validation of the aggregate and breakdown paths

pub mod audit;
pub mod balance;
pub mod ledger;
pub mod settlement;

#[cfg(test)]
pub(crate) mod testing;
