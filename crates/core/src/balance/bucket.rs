//! Classification of an entry into exactly one balance bucket.
//!
//! Every traversal (calculator, breakdown, sequencer) classifies through
//! [`Bucket::classify`], so an entry can never be counted twice or counted
//! differently by two surfaces.

use chrono::NaiveDate;
use serde::Serialize;

use super::period::Period;
use crate::ledger::{DisplayStatus, LedgerEntry};

/// Where an entry lands for one computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Settled before the window; part of the opening balance.
    SettledBeforeWindow,
    /// Settled inside the window; part of the realized movement.
    SettledInWindow,
    /// Settled after the window; ignored.
    SettledAfterWindow,
    /// Settled before its account's opening date; already in the account's opening balance.
    PrecedesAccountOpening,
    /// Pending, not overdue, due before the window starts; projected.
    PendingBeforeWindow,
    /// Pending, not overdue, due inside the window; projected.
    PendingInWindow,
    /// Pending, due after the window; ignored.
    PendingAfterWindow,
    /// Pending with a due date before today; never projected.
    Overdue,
    /// Missing the date its status needs; excluded from date-bounded sums.
    Undated,
    /// Cancelled; never counted.
    Cancelled,
}

impl Bucket {
    /// Classifies an entry.
    ///
    /// `window` of `None` means unbounded: every dated settlement counts as
    /// realized and every non-overdue pending entry as projected.
    #[must_use]
    pub fn classify(
        entry: &LedgerEntry,
        account_opening_date: Option<NaiveDate>,
        window: Option<Period>,
        today: NaiveDate,
    ) -> Self {
        match entry.display_status(today) {
            DisplayStatus::Cancelled => Self::Cancelled,
            DisplayStatus::Paid => {
                let Some(settled) = entry.settlement_date else {
                    return Self::Undated;
                };
                if account_opening_date.is_some_and(|opened| settled < opened) {
                    return Self::PrecedesAccountOpening;
                }
                match window {
                    Some(w) if settled < w.start() => Self::SettledBeforeWindow,
                    Some(w) if settled > w.end() => Self::SettledAfterWindow,
                    _ => Self::SettledInWindow,
                }
            }
            DisplayStatus::Overdue => Self::Overdue,
            DisplayStatus::Pending => {
                let Some(due) = entry.due_date else {
                    return Self::Undated;
                };
                match window {
                    Some(w) if due > w.end() => Self::PendingAfterWindow,
                    Some(w) if due < w.start() => Self::PendingBeforeWindow,
                    _ => Self::PendingInWindow,
                }
            }
        }
    }

    /// Counts toward the opening balance.
    #[must_use]
    pub fn is_opening(self) -> bool {
        self == Self::SettledBeforeWindow
    }

    /// Counts toward the realized movement of the window.
    #[must_use]
    pub fn is_realized(self) -> bool {
        self == Self::SettledInWindow
    }

    /// Counts toward the projected balance on top of realized.
    #[must_use]
    pub fn is_projected(self) -> bool {
        matches!(self, Self::PendingBeforeWindow | Self::PendingInWindow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Direction, EntryStatus};
    use crate::testing::day;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn window() -> Option<Period> {
        Period::new(day(10), day(20))
    }

    #[rstest]
    #[case(5, Bucket::SettledBeforeWindow)]
    #[case(10, Bucket::SettledInWindow)]
    #[case(20, Bucket::SettledInWindow)]
    #[case(21, Bucket::SettledAfterWindow)]
    fn test_settled_buckets(#[case] settled: u32, #[case] expected: Bucket) {
        let entry = LedgerEntry::settled(Direction::Inflow, dec!(1), day(settled));
        assert_eq!(Bucket::classify(&entry, None, window(), day(12)), expected);
    }

    #[rstest]
    // today = 12
    #[case(11, 12, Bucket::Overdue)]
    #[case(12, 12, Bucket::PendingInWindow)]
    #[case(20, 12, Bucket::PendingInWindow)]
    #[case(25, 12, Bucket::PendingAfterWindow)]
    // today before the window
    #[case(8, 5, Bucket::PendingBeforeWindow)]
    #[case(3, 5, Bucket::Overdue)]
    // today after the window: everything due inside is overdue
    #[case(15, 25, Bucket::Overdue)]
    #[case(26, 25, Bucket::PendingAfterWindow)]
    fn test_pending_buckets(#[case] due: u32, #[case] today: u32, #[case] expected: Bucket) {
        let entry = LedgerEntry::pending(Direction::Outflow, dec!(1), day(due));
        assert_eq!(Bucket::classify(&entry, None, window(), day(today)), expected);
    }

    #[test]
    fn test_cancelled_and_undated() {
        let mut cancelled = LedgerEntry::pending(Direction::Inflow, dec!(1), day(12));
        cancelled.status = EntryStatus::Cancelled;
        assert_eq!(Bucket::classify(&cancelled, None, window(), day(12)), Bucket::Cancelled);

        let mut paid = LedgerEntry::settled(Direction::Inflow, dec!(1), day(12));
        paid.settlement_date = None;
        assert_eq!(Bucket::classify(&paid, None, window(), day(12)), Bucket::Undated);

        let mut pending = LedgerEntry::pending(Direction::Inflow, dec!(1), day(12));
        pending.due_date = None;
        assert_eq!(Bucket::classify(&pending, None, window(), day(12)), Bucket::Undated);
    }

    #[test]
    fn test_settlement_before_account_opening() {
        let entry = LedgerEntry::settled(Direction::Inflow, dec!(1), day(2));
        assert_eq!(
            Bucket::classify(&entry, Some(day(3)), window(), day(12)),
            Bucket::PrecedesAccountOpening
        );
        assert_eq!(
            Bucket::classify(&entry, Some(day(2)), window(), day(12)),
            Bucket::SettledBeforeWindow
        );
    }

    #[test]
    fn test_unbounded_window() {
        let settled = LedgerEntry::settled(Direction::Inflow, dec!(1), day(30));
        assert_eq!(Bucket::classify(&settled, None, None, day(12)), Bucket::SettledInWindow);

        let pending = LedgerEntry::pending(Direction::Inflow, dec!(1), day(1));
        assert_eq!(Bucket::classify(&pending, None, None, day(1)), Bucket::PendingInWindow);
        assert_eq!(Bucket::classify(&pending, None, None, day(2)), Bucket::Overdue);
    }
}
