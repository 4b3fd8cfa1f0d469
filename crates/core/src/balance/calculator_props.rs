//! Property-based tests for BalanceCalculator.
//!
//! These tests validate scope additivity, overdue exclusion and the
//! single-bucket rule over random ledgers.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::balance::{AccountScope, BalanceCalculator, Bucket, Period};
use crate::ledger::{DisplayStatus, LedgerEntry};
use crate::testing::{arb_day, arb_ledger};

/// Strategy for an ordered pair of days forming a period.
fn arb_period() -> impl Strategy<Value = Period> {
    (arb_day(), arb_day()).prop_map(|(a, b)| {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Period::new(start, end).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Aggregate over a set equals the sum of single-account computations.
    #[test]
    fn prop_scope_additivity((accounts, entries) in arb_ledger(), period in arb_period(), today in arb_day()) {
        let aggregate = BalanceCalculator::compute(&entries, &accounts, &AccountScope::all(), period, today);

        let mut opening = Decimal::ZERO;
        let mut realized = Decimal::ZERO;
        let mut projected = Decimal::ZERO;
        for account in &accounts {
            let single = BalanceCalculator::compute(&entries, &accounts, &AccountScope::Account(account.id), period, today);
            opening += single.opening_balance;
            realized += single.realized_balance;
            projected += single.projected_balance;
        }

        prop_assert_eq!(aggregate.opening_balance, opening);
        prop_assert_eq!(aggregate.realized_balance, realized);
        prop_assert_eq!(aggregate.projected_balance, projected);
    }

    /// The grouped breakdown total equals the single-pass computation.
    #[test]
    fn prop_breakdown_total_matches_compute((accounts, entries) in arb_ledger(), period in arb_period(), today in arb_day()) {
        for scope in [AccountScope::all(), AccountScope::Unfiltered] {
            let whole = BalanceCalculator::compute(&entries, &accounts, &scope, period, today);
            let breakdown = BalanceCalculator::breakdown(&entries, &accounts, &scope, period, today);
            prop_assert_eq!(breakdown.total, whole);
        }
    }

    /// Removing every overdue entry leaves the projected balance unchanged.
    #[test]
    fn prop_overdue_never_projected((accounts, entries) in arb_ledger(), period in arb_period(), today in arb_day()) {
        let with_overdue = BalanceCalculator::compute(&entries, &accounts, &AccountScope::Unfiltered, period, today);
        let without: Vec<LedgerEntry> = entries
            .iter()
            .filter(|e| e.display_status(today) != DisplayStatus::Overdue)
            .cloned()
            .collect();
        let without_overdue = BalanceCalculator::compute(&without, &accounts, &AccountScope::Unfiltered, period, today);

        prop_assert_eq!(with_overdue.projected_balance, without_overdue.projected_balance);
        prop_assert_eq!(without_overdue.total_inflows_overdue, Decimal::ZERO);
        prop_assert_eq!(without_overdue.total_outflows_overdue, Decimal::ZERO);
    }

    /// Each entry changes at most one of opening, realized movement or pending.
    #[test]
    fn prop_single_bucket((accounts, entries) in arb_ledger(), period in arb_period(), today in arb_day()) {
        for entry in &entries {
            let opening_date = entry
                .bank_account_id
                .and_then(|id| accounts.iter().find(|a| a.id == id))
                .and_then(|a| a.opening_date);
            let bucket = Bucket::classify(entry, opening_date, Some(period), today);
            let hits = [bucket.is_opening(), bucket.is_realized(), bucket.is_projected(), bucket == Bucket::Overdue]
                .into_iter()
                .filter(|hit| *hit)
                .count();
            prop_assert!(hits <= 1);

            let alone = BalanceCalculator::compute(std::slice::from_ref(entry), &accounts, &AccountScope::Unfiltered, period, today);
            let base = BalanceCalculator::compute(&[], &accounts, &AccountScope::Unfiltered, period, today);
            let moved = [
                alone.opening_balance - base.opening_balance,
                alone.realized_balance - alone.opening_balance - (base.realized_balance - base.opening_balance),
                alone.projected_balance - alone.realized_balance - (base.projected_balance - base.realized_balance),
            ]
            .into_iter()
            .filter(|delta| !delta.is_zero())
            .count();
            prop_assert!(moved <= 1);
        }
    }
}
