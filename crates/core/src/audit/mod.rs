//! Audit cross-validation.
//!
//! Recomputes opening, realized, projected and total inflows through the
//! single-pass aggregate and through the per-account breakdown, and reports
//! per-metric agreement within a tolerance. Purely diagnostic.

pub mod types;
pub mod validator;

#[cfg(test)]
mod validator_props;

pub use types::{AuditFinding, AuditMetric, AuditReport};
pub use validator::CrossValidator;
