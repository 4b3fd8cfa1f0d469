//! Opening, realized and projected balances over a date window.

use std::collections::HashMap;

use chrono::NaiveDate;
use fluxo_shared::types::BankAccountId;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::bucket::Bucket;
use super::period::Period;
use super::scope::{AccountScope, ResolvedScope};
use crate::ledger::{BankAccount, Direction, LedgerEntry};

/// What a [`BalanceSnapshot`] covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "ids", rename_all = "snake_case")]
pub enum SnapshotScope {
    /// One bank account.
    Account(BankAccountId),
    /// Sum over these accounts.
    Aggregate(Vec<BankAccountId>),
    /// Every account plus unassigned entries.
    Unfiltered,
    /// Entries without a bank account only.
    Unassigned,
}

/// Computed balances for one scope and period. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSnapshot {
    /// Accounts covered.
    pub scope: SnapshotScope,
    /// First day of the window.
    pub period_start: NaiveDate,
    /// Last day of the window.
    pub period_end: NaiveDate,
    /// Balance at the start of `period_start`.
    pub opening_balance: Decimal,
    /// Opening plus settlements inside the window.
    pub realized_balance: Decimal,
    /// Realized plus pending entries not overdue and due by `period_end`.
    pub projected_balance: Decimal,
    /// Inflows settled inside the window.
    pub total_inflows_realized: Decimal,
    /// Outflows settled inside the window.
    pub total_outflows_realized: Decimal,
    /// Pending inflows counted in the projection.
    pub total_inflows_pending: Decimal,
    /// Pending outflows counted in the projection.
    pub total_outflows_pending: Decimal,
    /// Overdue inflows. Informational, never projected.
    pub total_inflows_overdue: Decimal,
    /// Overdue outflows. Informational, never projected.
    pub total_outflows_overdue: Decimal,
}

impl BalanceSnapshot {
    fn from_totals(scope: SnapshotScope, period: Period, accounts_opening: Decimal, t: &Totals) -> Self {
        let opening_balance = accounts_opening + t.inflows_before - t.outflows_before;
        let realized_balance = opening_balance + t.inflows_realized - t.outflows_realized;
        let projected_balance = realized_balance + t.inflows_pending - t.outflows_pending;
        Self {
            scope,
            period_start: period.start(),
            period_end: period.end(),
            opening_balance,
            realized_balance,
            projected_balance,
            total_inflows_realized: t.inflows_realized,
            total_outflows_realized: t.outflows_realized,
            total_inflows_pending: t.inflows_pending,
            total_outflows_pending: t.outflows_pending,
            total_inflows_overdue: t.inflows_overdue,
            total_outflows_overdue: t.outflows_overdue,
        }
    }

    /// Adds another snapshot's figures into this one, keeping this scope.
    fn absorb(&mut self, other: &Self) {
        self.opening_balance += other.opening_balance;
        self.realized_balance += other.realized_balance;
        self.projected_balance += other.projected_balance;
        self.total_inflows_realized += other.total_inflows_realized;
        self.total_outflows_realized += other.total_outflows_realized;
        self.total_inflows_pending += other.total_inflows_pending;
        self.total_outflows_pending += other.total_outflows_pending;
        self.total_inflows_overdue += other.total_inflows_overdue;
        self.total_outflows_overdue += other.total_outflows_overdue;
    }

    fn empty(scope: SnapshotScope, period: Period) -> Self {
        Self::from_totals(scope, period, Decimal::ZERO, &Totals::default())
    }
}

/// Per-bucket sums for one traversal.
#[derive(Debug, Clone, Default)]
struct Totals {
    inflows_before: Decimal,
    outflows_before: Decimal,
    inflows_realized: Decimal,
    outflows_realized: Decimal,
    inflows_pending: Decimal,
    outflows_pending: Decimal,
    inflows_overdue: Decimal,
    outflows_overdue: Decimal,
}

impl Totals {
    fn add(&mut self, bucket: Bucket, entry: &LedgerEntry) {
        let (inflow, outflow) = match bucket {
            Bucket::SettledBeforeWindow => (&mut self.inflows_before, &mut self.outflows_before),
            Bucket::SettledInWindow => (&mut self.inflows_realized, &mut self.outflows_realized),
            Bucket::PendingBeforeWindow | Bucket::PendingInWindow => {
                (&mut self.inflows_pending, &mut self.outflows_pending)
            }
            Bucket::Overdue => (&mut self.inflows_overdue, &mut self.outflows_overdue),
            Bucket::SettledAfterWindow
            | Bucket::PrecedesAccountOpening
            | Bucket::PendingAfterWindow
            | Bucket::Undated
            | Bucket::Cancelled => return,
        };
        match entry.direction {
            Direction::Inflow => *inflow += entry.amount,
            Direction::Outflow => *outflow += entry.amount,
        }
    }
}

/// Per-account balances plus their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceBreakdown {
    /// One snapshot per in-scope account, in snapshot order.
    pub accounts: Vec<BalanceSnapshot>,
    /// Entries with no account, present only for unfiltered scope.
    pub unassigned: Option<BalanceSnapshot>,
    /// Sum of everything above.
    pub total: BalanceSnapshot,
}

/// Stateless balance calculator.
///
/// Every function is a pure function of its arguments: no I/O, no clock,
/// no state between calls.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Computes balances for `scope` over `period` in a single pass.
    #[must_use]
    pub fn compute(
        entries: &[LedgerEntry],
        accounts: &[BankAccount],
        scope: &AccountScope,
        period: Period,
        today: NaiveDate,
    ) -> BalanceSnapshot {
        let resolved = ResolvedScope::resolve(scope, accounts);
        let mut totals = Totals::default();
        for entry in entries {
            if let Some(admitted) = resolved.admit(entry) {
                let bucket = Bucket::classify(entry, admitted.opening_date, Some(period), today);
                totals.add(bucket, entry);
            }
        }

        let snapshot = BalanceSnapshot::from_totals(
            snapshot_scope(scope, &resolved),
            period,
            resolved.opening_balance(),
            &totals,
        );
        debug!(
            %period,
            opening = %snapshot.opening_balance,
            realized = %snapshot.realized_balance,
            projected = %snapshot.projected_balance,
            "balance computed"
        );
        snapshot
    }

    /// Computes one snapshot per account, then sums them.
    ///
    /// Entries are grouped by account first and each group is folded on its
    /// own, independently of [`BalanceCalculator::compute`].
    #[must_use]
    pub fn breakdown(
        entries: &[LedgerEntry],
        accounts: &[BankAccount],
        scope: &AccountScope,
        period: Period,
        today: NaiveDate,
    ) -> BalanceBreakdown {
        let resolved = ResolvedScope::resolve(scope, accounts);

        let mut by_account: HashMap<BankAccountId, Vec<&LedgerEntry>> = HashMap::new();
        let mut unassigned: Vec<&LedgerEntry> = Vec::new();
        for entry in entries {
            if resolved.admit(entry).is_none() {
                continue;
            }
            match entry.bank_account_id {
                Some(id) => by_account.entry(id).or_default().push(entry),
                None => unassigned.push(entry),
            }
        }

        let per_account: Vec<BalanceSnapshot> = resolved
            .accounts
            .iter()
            .map(|account| {
                let group = by_account.get(&account.id).map_or(&[][..], Vec::as_slice);
                let totals = fold(group, account.opening_date, period, today);
                BalanceSnapshot::from_totals(
                    SnapshotScope::Account(account.id),
                    period,
                    account.opening_balance,
                    &totals,
                )
            })
            .collect();

        let unassigned = resolved.include_unassigned.then(|| {
            let totals = fold(&unassigned, None, period, today);
            BalanceSnapshot::from_totals(SnapshotScope::Unassigned, period, Decimal::ZERO, &totals)
        });

        let mut total = BalanceSnapshot::empty(snapshot_scope(scope, &resolved), period);
        for snapshot in per_account.iter().chain(unassigned.as_ref()) {
            total.absorb(snapshot);
        }

        BalanceBreakdown {
            accounts: per_account,
            unassigned,
            total,
        }
    }
}

fn fold(
    group: &[&LedgerEntry],
    opening_date: Option<NaiveDate>,
    period: Period,
    today: NaiveDate,
) -> Totals {
    group.iter().fold(Totals::default(), |mut totals, entry| {
        totals.add(Bucket::classify(entry, opening_date, Some(period), today), entry);
        totals
    })
}

fn snapshot_scope(scope: &AccountScope, resolved: &ResolvedScope<'_>) -> SnapshotScope {
    match scope {
        AccountScope::Account(id) => SnapshotScope::Account(*id),
        AccountScope::Accounts(_) => SnapshotScope::Aggregate(resolved.ids()),
        AccountScope::Unfiltered => SnapshotScope::Unfiltered,
    }
}
