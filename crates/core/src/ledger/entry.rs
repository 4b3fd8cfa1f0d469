//! Ledger entry domain types.

use chrono::NaiveDate;
use fluxo_shared::types::{
    BankAccountId, CategoryId, CostCenterId, CounterpartyId, InstallmentId, LedgerEntryId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of money for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money to be received (receivable).
    Inflow,
    /// Money to be paid (payable).
    Outflow,
}

impl Direction {
    /// Applies the direction's sign to an amount (inflows add, outflows subtract).
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Inflow => amount,
            Self::Outflow => -amount,
        }
    }
}

/// Stored lifecycle status of an entry.
///
/// Overdue is deliberately absent: it is derived, see [`DisplayStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Not yet settled.
    Pending,
    /// Settled on `settlement_date`.
    Paid,
    /// Cancelled; never counts toward any balance.
    Cancelled,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Status as shown to users and as used by all balance math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    /// Pending and not yet due ("em dia").
    Pending,
    /// Pending with a due date strictly before today.
    Overdue,
    /// Settled.
    Paid,
    /// Cancelled.
    Cancelled,
}

impl DisplayStatus {
    /// Resolves the display status from the stored status and due date.
    ///
    /// This is the only place overdue is decided. A pending entry without a
    /// due date is never overdue.
    #[must_use]
    pub fn resolve(status: EntryStatus, due_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match status {
            EntryStatus::Cancelled => Self::Cancelled,
            EntryStatus::Paid => Self::Paid,
            EntryStatus::Pending => match due_date {
                Some(due) if due < today => Self::Overdue,
                _ => Self::Pending,
            },
        }
    }

    /// Returns true for statuses that still expect money to move.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }
}

/// A receivable or payable in the unified shape all computations consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier.
    pub id: LedgerEntryId,
    /// Inflow (receivable) or outflow (payable).
    pub direction: Direction,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Current amount; the only figure balance math ever sums.
    pub amount: Decimal,
    /// Amount before interest, fine and discount adjustments.
    pub original_amount: Decimal,
    /// Interest added on top of the original amount.
    pub interest: Decimal,
    /// Late fine added on top of the original amount.
    pub fine: Decimal,
    /// Discount granted on the original amount.
    pub discount: Decimal,
    /// Date the money is due.
    pub due_date: Option<NaiveDate>,
    /// Accounting period date.
    pub competency_date: Option<NaiveDate>,
    /// Date the money actually moved. Set iff `status` is paid.
    pub settlement_date: Option<NaiveDate>,
    /// Stored status.
    pub status: EntryStatus,
    /// Source data stored a literal "overdue"; informational only.
    #[serde(default)]
    pub legacy_overdue_tag: bool,
    /// Source record had no id; `id` was assigned at normalization and
    /// does not survive a re-fetch.
    #[serde(default)]
    pub missing_source_id: bool,
    /// Bank account the money moves through, if assigned.
    pub bank_account_id: Option<BankAccountId>,
    /// Cost center, if assigned.
    pub cost_center_id: Option<CostCenterId>,
    /// Category, if assigned.
    pub category_id: Option<CategoryId>,
    /// Client (inflows) or supplier (outflows).
    pub counterparty_id: Option<CounterpartyId>,
    /// Contract installment that generated this entry.
    pub linked_installment_id: Option<InstallmentId>,
}

impl LedgerEntry {
    /// Creates a pending entry with no adjustments and no assignments.
    #[must_use]
    pub fn pending(direction: Direction, amount: Decimal, due_date: NaiveDate) -> Self {
        Self {
            id: LedgerEntryId::new(),
            direction,
            description: String::new(),
            amount,
            original_amount: amount,
            interest: Decimal::ZERO,
            fine: Decimal::ZERO,
            discount: Decimal::ZERO,
            due_date: Some(due_date),
            competency_date: Some(due_date),
            settlement_date: None,
            status: EntryStatus::Pending,
            legacy_overdue_tag: false,
            missing_source_id: false,
            bank_account_id: None,
            cost_center_id: None,
            category_id: None,
            counterparty_id: None,
            linked_installment_id: None,
        }
    }

    /// Creates a paid entry settled on `settlement_date`.
    #[must_use]
    pub fn settled(direction: Direction, amount: Decimal, settlement_date: NaiveDate) -> Self {
        let mut entry = Self::pending(direction, amount, settlement_date);
        entry.status = EntryStatus::Paid;
        entry.settlement_date = Some(settlement_date);
        entry
    }

    /// Assigns the entry to a bank account.
    #[must_use]
    pub fn with_bank_account(mut self, bank_account_id: BankAccountId) -> Self {
        self.bank_account_id = Some(bank_account_id);
        self
    }

    /// Links the entry to a contract installment.
    #[must_use]
    pub fn with_installment(mut self, installment_id: InstallmentId) -> Self {
        self.linked_installment_id = Some(installment_id);
        self
    }

    /// Resolves the display status for `today`.
    #[must_use]
    pub fn display_status(&self, today: NaiveDate) -> DisplayStatus {
        DisplayStatus::resolve(self.status, self.due_date, today)
    }

    /// Returns the amount signed by direction.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.direction.signed(self.amount)
    }

    /// Returns true if the entry is tied to a contract installment.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.linked_installment_id.is_some()
    }

    /// Date used to place the entry on a statement: settlement, else due date.
    #[must_use]
    pub fn sequence_date(&self) -> Option<NaiveDate> {
        self.settlement_date.or(self.due_date)
    }

    /// Whole days past due at `today`, or zero when not overdue.
    #[must_use]
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        match (self.display_status(today), self.due_date) {
            (DisplayStatus::Overdue, Some(due)) => (today - due).num_days(),
            _ => 0,
        }
    }
}

/// A bank account and the balance its ledger starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Unique identifier.
    pub id: BankAccountId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Balance on `opening_date`.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Date from which the account's ledger is authoritative.
    #[serde(default)]
    pub opening_date: Option<NaiveDate>,
    /// Balance cached by the storage layer. Advisory; the engine never reads it.
    #[serde(default)]
    pub cached_current_balance: Option<Decimal>,
}

impl BankAccount {
    /// Creates an account with the given opening balance and no opening date.
    #[must_use]
    pub fn new(name: impl Into<String>, opening_balance: Decimal) -> Self {
        Self {
            id: BankAccountId::new(),
            name: name.into(),
            opening_balance,
            opening_date: None,
            cached_current_balance: None,
        }
    }

    /// Sets the opening date.
    #[must_use]
    pub fn opened_on(mut self, opening_date: NaiveDate) -> Self {
        self.opening_date = Some(opening_date);
        self
    }
}
