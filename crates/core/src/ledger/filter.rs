//! Entry filtering and the overdue listing.

use chrono::NaiveDate;
use fluxo_shared::types::{BankAccountId, CostCenterId};
use serde::{Deserialize, Serialize};

use super::entry::{Direction, DisplayStatus, LedgerEntry};

/// Which date a range filter applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    /// Due date.
    #[default]
    Due,
    /// Competency (accounting period) date.
    Competency,
    /// Settlement date.
    Settlement,
}

impl DateField {
    fn read(self, entry: &LedgerEntry) -> Option<NaiveDate> {
        match self {
            Self::Due => entry.due_date,
            Self::Competency => entry.competency_date,
            Self::Settlement => entry.settlement_date,
        }
    }
}

/// Filter for entry listings. An empty filter matches everything.
///
/// Status criteria use the display status, so "overdue" is always computed
/// against the `today` passed to [`EntryFilter::matches`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Only this direction.
    pub direction: Option<Direction>,
    /// Any of these display statuses.
    pub statuses: Vec<DisplayStatus>,
    /// Any of these bank accounts.
    pub bank_accounts: Vec<BankAccountId>,
    /// With `bank_accounts` set, also keep entries without an account.
    pub include_unassigned: bool,
    /// Any of these cost centers.
    pub cost_centers: Vec<CostCenterId>,
    /// Date the range applies to.
    pub date_field: DateField,
    /// Inclusive lower bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to: Option<NaiveDate>,
}

impl EntryFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one direction.
    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Adds a display status.
    #[must_use]
    pub fn with_status(mut self, status: DisplayStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Adds a bank account.
    #[must_use]
    pub fn with_bank_account(mut self, id: BankAccountId) -> Self {
        self.bank_accounts.push(id);
        self
    }

    /// Sets whether entries without a bank account pass an account filter.
    #[must_use]
    pub const fn include_unassigned(mut self, include: bool) -> Self {
        self.include_unassigned = include;
        self
    }

    /// Adds a cost center.
    #[must_use]
    pub fn with_cost_center(mut self, id: CostCenterId) -> Self {
        self.cost_centers.push(id);
        self
    }

    /// Sets an inclusive date range on the given field.
    #[must_use]
    pub const fn between(
        mut self,
        field: DateField,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        self.date_field = field;
        self.from = from;
        self.to = to;
        self
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.direction.is_none()
            && self.statuses.is_empty()
            && self.bank_accounts.is_empty()
            && self.cost_centers.is_empty()
            && self.from.is_none()
            && self.to.is_none()
    }

    /// Tests one entry.
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry, today: NaiveDate) -> bool {
        if self.direction.is_some_and(|d| d != entry.direction) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&entry.display_status(today)) {
            return false;
        }
        if !self.bank_accounts.is_empty() {
            let keep = match entry.bank_account_id {
                Some(id) => self.bank_accounts.contains(&id),
                None => self.include_unassigned,
            };
            if !keep {
                return false;
            }
        }
        if !self.cost_centers.is_empty()
            && !entry
                .cost_center_id
                .is_some_and(|id| self.cost_centers.contains(&id))
        {
            return false;
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        // A range excludes entries that lack the date entirely.
        let Some(date) = self.date_field.read(entry) else {
            return false;
        };
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Returns the matching entries in input order.
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [LedgerEntry], today: NaiveDate) -> Vec<&'a LedgerEntry> {
        entries.iter().filter(|e| self.matches(e, today)).collect()
    }
}

/// An overdue entry together with how late it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueEntry<'a> {
    /// The entry.
    pub entry: &'a LedgerEntry,
    /// Whole days past the due date.
    pub days_overdue: i64,
}

/// Lists overdue entries, oldest due date first.
#[must_use]
pub fn overdue_entries(entries: &[LedgerEntry], today: NaiveDate) -> Vec<OverdueEntry<'_>> {
    let mut overdue: Vec<OverdueEntry<'_>> = entries
        .iter()
        .filter(|e| e.display_status(today) == DisplayStatus::Overdue)
        .map(|entry| OverdueEntry {
            entry,
            days_overdue: entry.days_overdue(today),
        })
        .collect();
    overdue.sort_by_key(|o| o.entry.due_date);
    overdue
}
