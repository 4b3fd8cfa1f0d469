//! Property-based tests for CrossValidator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::audit::CrossValidator;
use crate::balance::Period;
use crate::ledger::LedgerSnapshot;
use crate::testing::{arb_day, arb_ledger};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Both paths agree on any consistent snapshot.
    #[test]
    fn prop_consistent_snapshot_always_matches((accounts, entries) in arb_ledger(), a in arb_day(), b in arb_day(), today in arb_day()) {
        let period = Period::new(a.min(b), a.max(b)).unwrap();
        let report = CrossValidator::new().audit(&LedgerSnapshot::new(entries, accounts), period, today);
        prop_assert!(report.all_match);
        prop_assert_eq!(report.findings.len(), 4);
    }

    /// Shifting one account's opening balance by a cent or more is always caught.
    #[test]
    fn prop_opening_corruption_detected(
        (accounts, entries) in arb_ledger(),
        today in arb_day(),
        cents in 1i64..100_000i64,
        negative in any::<bool>(),
    ) {
        let period = Period::new(today, today).unwrap();
        let clean = LedgerSnapshot::new(entries, accounts);
        let mut corrupted = clean.clone();
        let delta = Decimal::new(if negative { -cents } else { cents }, 2);
        corrupted.accounts[0].opening_balance += delta;

        let findings = CrossValidator::new().cross_validate_sources(&clean, &corrupted, period, today);
        prop_assert!(!findings[0].matches);
        prop_assert!(findings[3].matches);
    }
}
