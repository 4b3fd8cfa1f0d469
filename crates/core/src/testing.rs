//! Shared helpers and proptest strategies for unit and property tests.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::ledger::{BankAccount, Direction, EntryStatus, LedgerEntry};

/// Day `d` of January 2025.
pub(crate) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

/// Strategy for a date in January 2025.
pub(crate) fn arb_day() -> impl Strategy<Value = NaiveDate> {
    (1u32..=31).prop_map(day)
}

/// Strategy for positive amounts with cent precision.
pub(crate) fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for opening balances, possibly negative (overdrawn).
pub(crate) fn arb_opening_balance() -> impl Strategy<Value = Decimal> {
    (-500_000i64..5_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

pub(crate) fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Inflow), Just(Direction::Outflow)]
}

pub(crate) fn arb_status() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![
        3 => Just(EntryStatus::Pending),
        3 => Just(EntryStatus::Paid),
        1 => Just(EntryStatus::Cancelled),
    ]
}

/// Strategy for 1-4 accounts, some with an opening date.
pub(crate) fn arb_accounts() -> impl Strategy<Value = Vec<BankAccount>> {
    prop::collection::vec(
        (arb_opening_balance(), prop::option::weighted(0.3, arb_day())),
        1..=4,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (opening, opened))| {
                let account = BankAccount::new(format!("Account {i}"), opening);
                match opened {
                    Some(date) => account.opened_on(date),
                    None => account,
                }
            })
            .collect()
    })
}

/// Strategy for an entry with a valid status/date combination.
///
/// `account_slot` indexes into the account list; `None` leaves it unassigned.
fn arb_entry_shape() -> impl Strategy<Value = (Direction, Decimal, EntryStatus, NaiveDate, Option<usize>)>
{
    (
        arb_direction(),
        arb_amount(),
        arb_status(),
        arb_day(),
        prop::option::weighted(0.85, 0usize..4),
    )
}

/// Strategy for accounts plus entries referencing them.
pub(crate) fn arb_ledger() -> impl Strategy<Value = (Vec<BankAccount>, Vec<LedgerEntry>)> {
    (
        arb_accounts(),
        prop::collection::vec(arb_entry_shape(), 0..40),
    )
        .prop_map(|(accounts, specs)| {
            let entries = specs
                .into_iter()
                .map(|(direction, amount, status, date, slot)| {
                    let mut entry = match status {
                        EntryStatus::Paid => LedgerEntry::settled(direction, amount, date),
                        EntryStatus::Pending | EntryStatus::Cancelled => {
                            let mut e = LedgerEntry::pending(direction, amount, date);
                            e.status = status;
                            e
                        }
                    };
                    entry.bank_account_id = slot.map(|i| accounts[i % accounts.len()].id);
                    entry
                })
                .collect();
            (accounts, entries)
        })
}
