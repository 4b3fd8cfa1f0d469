//! Property-based tests for RunningBalanceSequencer.
//!
//! Every row must equal a whole-list recomputation of the prefix ending at
//! that row.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::balance::{AccountScope, BalanceCalculator, Period, RunningBalanceSequencer};
use crate::ledger::LedgerEntry;
use crate::testing::{arb_day, arb_ledger, day};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Row k equals compute() over the first k + 1 ordered entries.
    #[test]
    fn prop_sequencer_matches_prefix_recomputation((accounts, entries) in arb_ledger(), today in arb_day()) {
        // Every generated date falls in January, so one window covers them all.
        let period = Period::new(day(1), day(31)).unwrap();
        let scope = AccountScope::Unfiltered;
        let opening = BalanceCalculator::compute(&[], &accounts, &scope, period, today).opening_balance;

        let rows = RunningBalanceSequencer::sequence(&entries, &accounts, &scope, opening, today);
        prop_assert_eq!(rows.len(), entries.len());

        let ordered: Vec<LedgerEntry> = rows.iter().map(|r| r.entry.clone()).collect();
        for (k, row) in rows.iter().enumerate() {
            let prefix = BalanceCalculator::compute(&ordered[..=k], &accounts, &scope, period, today);
            prop_assert_eq!(row.cumulative_realized, prefix.realized_balance);
            prop_assert_eq!(row.cumulative_projected, prefix.projected_balance);
        }
    }

    /// Rows come out in non-decreasing settlement-or-due date order.
    #[test]
    fn prop_sequencer_is_chronological((accounts, entries) in arb_ledger(), today in arb_day()) {
        let rows = RunningBalanceSequencer::sequence(&entries, &accounts, &AccountScope::Unfiltered, Decimal::ZERO, today);
        for pair in rows.windows(2) {
            prop_assert!(pair[0].entry.sequence_date() <= pair[1].entry.sequence_date());
        }
    }

    /// The statement's last row lands on the calculator's closing figures.
    #[test]
    fn prop_statement_closes_on_calculator((accounts, entries) in arb_ledger(), start in arb_day(), today in arb_day()) {
        let period = Period::new(start, day(31)).unwrap();
        let statement = RunningBalanceSequencer::sequence_period(&entries, &accounts, &AccountScope::Unfiltered, period, today);
        let (realized, projected) = statement
            .rows
            .last()
            .map_or((statement.opening_balance, statement.opening_balance), |row| {
                (row.cumulative_realized, row.cumulative_projected)
            });
        prop_assert_eq!(realized, statement.closing.realized_balance);
        prop_assert_eq!(projected, statement.closing.projected_balance);
    }
}
