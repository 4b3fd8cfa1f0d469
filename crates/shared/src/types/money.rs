//! Monetary helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the engine is a `rust_decimal::Decimal`.

use rust_decimal::Decimal;

/// Tolerance under which two monetary figures are considered equal (one cent).
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Coerces a possibly missing monetary field to zero.
///
/// Partial data must never crash a dashboard, so absent values count as nothing.
#[must_use]
pub fn coerce(value: Option<Decimal>) -> Decimal {
    value.unwrap_or(Decimal::ZERO)
}

/// Returns true when `|a - b|` is strictly below `tolerance`.
#[must_use]
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() < tolerance
}
