//! Property-based tests for SettlementService.
//!
//! These tests validate value conservation on partial settlement and
//! idempotency of repeated settlement.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::ledger::{EntryStatus, LedgerEntry, LedgerError};
use crate::settlement::service::{SettleOutcome, SettlementService};
use crate::testing::{arb_amount, arb_day, arb_direction};
use fluxo_shared::types::{InstallmentId, TOLERANCE};

/// Strategy for a pending entry and a paid amount strictly inside (0, amount).
fn arb_split() -> impl Strategy<Value = (LedgerEntry, Decimal)> {
    (arb_direction(), 2i64..1_000_000i64, arb_day(), any::<bool>())
        .prop_flat_map(|(direction, cents, due, linked)| {
            (Just((direction, cents, due, linked)), 1..cents)
        })
        .prop_map(|((direction, cents, due, linked), paid_cents)| {
            let mut entry = LedgerEntry::pending(direction, Decimal::new(cents, 2), due);
            if linked {
                entry = entry.with_installment(InstallmentId::new());
            }
            (entry, Decimal::new(paid_cents, 2))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Paid portion plus residual equals the amount before the split.
    #[test]
    fn prop_partial_settlement_conserves_amount((entry, paid) in arb_split(), settle_day in arb_day(), residual_day in arb_day()) {
        let before = entry.amount;
        let mut entry = entry;
        let split = SettlementService::partial_settle(&mut entry, paid, settle_day, residual_day).unwrap();

        prop_assert!((entry.amount + split.residual.amount - before).abs() < TOLERANCE);
        prop_assert_eq!(split.record.paid_amount + split.record.residual_amount, before);
        prop_assert!(split.residual.amount > Decimal::ZERO);
    }

    /// The residual is always pending and never carries the contract link.
    #[test]
    fn prop_residual_is_unlinked_pending((entry, paid) in arb_split(), residual_day in arb_day()) {
        let mut entry = entry;
        let split = SettlementService::partial_settle(&mut entry, paid, residual_day, residual_day).unwrap();

        prop_assert_eq!(split.residual.status, EntryStatus::Pending);
        prop_assert!(split.residual.linked_installment_id.is_none());
        prop_assert!(split.residual.settlement_date.is_none());
        prop_assert_eq!(split.residual.direction, entry.direction);
        prop_assert_eq!(entry.status, EntryStatus::Paid);
    }

    /// Paid amounts outside (0, amount) are rejected and leave the entry untouched.
    #[test]
    fn prop_out_of_range_paid_amount_rejected(
        direction in arb_direction(),
        amount in arb_amount(),
        excess in 0i64..1_000_000i64,
        negative in any::<bool>(),
    ) {
        let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut entry = LedgerEntry::pending(direction, amount, day);
        let before = entry.clone();
        let paid = if negative {
            -Decimal::new(excess, 2)
        } else {
            amount + Decimal::new(excess, 2)
        };

        let result = SettlementService::partial_settle(&mut entry, paid, day, day);
        let is_invalid_amount = matches!(result, Err(LedgerError::InvalidAmount { .. }));
        prop_assert!(is_invalid_amount);
        prop_assert_eq!(entry, before);
    }

    /// Settling twice with the same arguments changes nothing the second time.
    #[test]
    fn prop_resettle_is_idempotent(
        direction in arb_direction(),
        amount in arb_amount(),
        due in arb_day(),
        settle_day in arb_day(),
    ) {
        let mut entry = LedgerEntry::pending(direction, amount, due);
        prop_assert_eq!(SettlementService::settle(&mut entry, settle_day).unwrap(), SettleOutcome::Applied);
        let after_first = entry.clone();
        prop_assert_eq!(SettlementService::settle(&mut entry, settle_day).unwrap(), SettleOutcome::Unchanged);
        prop_assert_eq!(entry, after_first);
    }
}

