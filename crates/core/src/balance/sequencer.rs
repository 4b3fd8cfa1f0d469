//! Running balances for statement-style listings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::bucket::Bucket;
use super::calculator::{BalanceCalculator, BalanceSnapshot};
use super::period::Period;
use super::scope::{AccountScope, ResolvedScope};
use crate::ledger::{BankAccount, LedgerEntry};

/// One statement row with the balances after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequencedRow<'a> {
    /// The entry.
    pub entry: &'a LedgerEntry,
    /// How the entry was counted.
    pub bucket: Bucket,
    /// Realized balance after this row.
    pub cumulative_realized: Decimal,
    /// Projected balance after this row.
    pub cumulative_projected: Decimal,
}

/// A statement for one period: opening balance, rows, and closing figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement<'a> {
    /// Statement window.
    pub period: Period,
    /// Balance before the first row.
    pub opening_balance: Decimal,
    /// Rows in chronological order.
    pub rows: Vec<SequencedRow<'a>>,
    /// Whole-period figures from the calculator; the last row always agrees.
    pub closing: BalanceSnapshot,
}

/// Stateless running balance sequencer.
pub struct RunningBalanceSequencer;

impl RunningBalanceSequencer {
    /// Orders entries by settlement date (falling back to due date) and
    /// annotates each with cumulative realized and projected balances.
    ///
    /// Row `i` equals what [`BalanceCalculator::compute`] gives for the
    /// first `i + 1` entries over a window that contains all of them.
    /// Out-of-scope entries are dropped; entries with neither date sort last.
    /// The sort is stable.
    ///
    /// There is no period end here: every non-overdue pending entry counts
    /// toward the projection, however far out it is due. Use
    /// [`Self::sequence_period`] for a bounded statement.
    #[must_use]
    pub fn sequence<'a, I>(
        entries: I,
        accounts: &[BankAccount],
        scope: &AccountScope,
        opening_balance_for_period: Decimal,
        today: NaiveDate,
    ) -> Vec<SequencedRow<'a>>
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        Self::sequence_within(entries, accounts, scope, opening_balance_for_period, None, today)
    }

    /// Builds the statement for `period`.
    ///
    /// Rows are the entries settled inside the window, pending entries that
    /// count toward the projection, and overdue entries due by the period
    /// end. The opening balance comes from the calculator.
    #[must_use]
    pub fn sequence_period<'a>(
        entries: &'a [LedgerEntry],
        accounts: &[BankAccount],
        scope: &AccountScope,
        period: Period,
        today: NaiveDate,
    ) -> Statement<'a> {
        let closing = BalanceCalculator::compute(entries, accounts, scope, period, today);
        let resolved = ResolvedScope::resolve(scope, accounts);

        let selected = entries.iter().filter(|entry| {
            resolved.admit(entry).is_some_and(|admitted| {
                match Bucket::classify(entry, admitted.opening_date, Some(period), today) {
                    Bucket::SettledInWindow | Bucket::PendingBeforeWindow | Bucket::PendingInWindow => {
                        true
                    }
                    Bucket::Overdue => entry.due_date.is_some_and(|due| due <= period.end()),
                    _ => false,
                }
            })
        });

        let rows = Self::sequence_within(
            selected,
            accounts,
            scope,
            closing.opening_balance,
            Some(period),
            today,
        );
        Statement {
            period,
            opening_balance: closing.opening_balance,
            rows,
            closing,
        }
    }

    fn sequence_within<'a, I>(
        entries: I,
        accounts: &[BankAccount],
        scope: &AccountScope,
        opening_balance: Decimal,
        window: Option<Period>,
        today: NaiveDate,
    ) -> Vec<SequencedRow<'a>>
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let resolved = ResolvedScope::resolve(scope, accounts);
        let mut admitted: Vec<(&'a LedgerEntry, Bucket)> = entries
            .into_iter()
            .filter_map(|entry| {
                resolved.admit(entry).map(|a| {
                    (entry, Bucket::classify(entry, a.opening_date, window, today))
                })
            })
            .collect();
        admitted.sort_by_key(|(entry, _)| {
            let date = entry.sequence_date();
            (date.is_none(), date)
        });

        let mut realized = opening_balance;
        let mut pending = Decimal::ZERO;
        admitted
            .into_iter()
            .map(|(entry, bucket)| {
                if bucket.is_realized() {
                    realized += entry.signed_amount();
                } else if bucket.is_projected() {
                    pending += entry.signed_amount();
                }
                SequencedRow {
                    entry,
                    bucket,
                    cumulative_realized: realized,
                    cumulative_projected: realized + pending,
                }
            })
            .collect()
    }
}
