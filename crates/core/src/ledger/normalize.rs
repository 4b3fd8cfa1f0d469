//! Normalization of raw receivable and payable records.
//!
//! The storage collaborator hands over two heterogeneous record shapes. This
//! module maps both into [`LedgerEntry`] and never fails: missing amounts
//! become zero, unparseable dates become `None`, unknown statuses become
//! pending. Each recovery is logged.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use fluxo_shared::types::{
    BankAccountId, CategoryId, CostCenterId, CounterpartyId, InstallmentId, LedgerEntryId, coerce,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use super::entry::{BankAccount, Direction, EntryStatus, LedgerEntry};
use super::snapshot::LedgerSnapshot;

/// A receivable as stored (money owed by a client).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReceivable {
    /// Stored identifier.
    pub id: Option<LedgerEntryId>,
    /// Description.
    pub description: Option<String>,
    /// Current amount.
    pub amount: Option<Decimal>,
    /// Amount before adjustments.
    pub original_amount: Option<Decimal>,
    /// Interest.
    pub interest: Option<Decimal>,
    /// Fine.
    pub fine: Option<Decimal>,
    /// Discount.
    pub discount: Option<Decimal>,
    /// Due date as stored.
    pub due_date: Option<String>,
    /// Competency date as stored.
    pub competency_date: Option<String>,
    /// Date the money was received.
    pub received_date: Option<String>,
    /// Stored status literal.
    pub status: Option<String>,
    /// Bank account.
    pub bank_account_id: Option<BankAccountId>,
    /// Cost center.
    pub cost_center_id: Option<CostCenterId>,
    /// Category.
    pub category_id: Option<CategoryId>,
    /// Paying client.
    pub client_id: Option<CounterpartyId>,
    /// Contract installment.
    pub installment_id: Option<InstallmentId>,
}

/// A payable as stored (money owed to a supplier).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPayable {
    /// Stored identifier.
    pub id: Option<LedgerEntryId>,
    /// Description.
    pub description: Option<String>,
    /// Current amount.
    pub amount: Option<Decimal>,
    /// Amount before adjustments.
    pub original_amount: Option<Decimal>,
    /// Interest.
    pub interest: Option<Decimal>,
    /// Fine.
    pub fine: Option<Decimal>,
    /// Discount.
    pub discount: Option<Decimal>,
    /// Due date as stored.
    pub due_date: Option<String>,
    /// Competency date as stored.
    pub competency_date: Option<String>,
    /// Date the money was paid out.
    pub payment_date: Option<String>,
    /// Stored status literal.
    pub status: Option<String>,
    /// Bank account.
    pub bank_account_id: Option<BankAccountId>,
    /// Cost center.
    pub cost_center_id: Option<CostCenterId>,
    /// Category.
    pub category_id: Option<CategoryId>,
    /// Receiving supplier.
    pub supplier_id: Option<CounterpartyId>,
    /// Contract installment.
    pub installment_id: Option<InstallmentId>,
}

/// Everything the storage collaborator returns for one computation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSnapshot {
    /// Receivable records.
    pub receivables: Vec<RawReceivable>,
    /// Payable records.
    pub payables: Vec<RawPayable>,
    /// Bank accounts.
    pub bank_accounts: Vec<BankAccount>,
}

impl RawSnapshot {
    /// Normalizes the records into an engine snapshot.
    #[must_use]
    pub fn normalize(self) -> LedgerSnapshot {
        let entries = normalize(&self.receivables, &self.payables);
        LedgerSnapshot::new(entries, self.bank_accounts)
    }
}

/// Fields common to both raw shapes, borrowed.
struct RawFields<'a> {
    id: Option<LedgerEntryId>,
    description: Option<&'a str>,
    amount: Option<Decimal>,
    original_amount: Option<Decimal>,
    interest: Option<Decimal>,
    fine: Option<Decimal>,
    discount: Option<Decimal>,
    due_date: Option<&'a str>,
    competency_date: Option<&'a str>,
    settlement_date: Option<&'a str>,
    status: Option<&'a str>,
    bank_account_id: Option<BankAccountId>,
    cost_center_id: Option<CostCenterId>,
    category_id: Option<CategoryId>,
    counterparty_id: Option<CounterpartyId>,
    installment_id: Option<InstallmentId>,
}

impl RawReceivable {
    fn fields(&self) -> RawFields<'_> {
        RawFields {
            id: self.id,
            description: self.description.as_deref(),
            amount: self.amount,
            original_amount: self.original_amount,
            interest: self.interest,
            fine: self.fine,
            discount: self.discount,
            due_date: self.due_date.as_deref(),
            competency_date: self.competency_date.as_deref(),
            settlement_date: self.received_date.as_deref(),
            status: self.status.as_deref(),
            bank_account_id: self.bank_account_id,
            cost_center_id: self.cost_center_id,
            category_id: self.category_id,
            counterparty_id: self.client_id,
            installment_id: self.installment_id,
        }
    }
}

impl RawPayable {
    fn fields(&self) -> RawFields<'_> {
        RawFields {
            id: self.id,
            description: self.description.as_deref(),
            amount: self.amount,
            original_amount: self.original_amount,
            interest: self.interest,
            fine: self.fine,
            discount: self.discount,
            due_date: self.due_date.as_deref(),
            competency_date: self.competency_date.as_deref(),
            settlement_date: self.payment_date.as_deref(),
            status: self.status.as_deref(),
            bank_account_id: self.bank_account_id,
            cost_center_id: self.cost_center_id,
            category_id: self.category_id,
            counterparty_id: self.supplier_id,
            installment_id: self.installment_id,
        }
    }
}

/// Result of reading a stored status literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedStatus {
    /// Normalized stored status.
    pub status: EntryStatus,
    /// The literal was an "overdue" variant.
    pub legacy_overdue: bool,
    /// The literal was recognized.
    pub recognized: bool,
}

/// Reads a stored status literal.
///
/// A stored "overdue" is pending plus an informational tag; the display
/// status is always re-derived from the due date.
#[must_use]
pub fn parse_status(raw: Option<&str>) -> ParsedStatus {
    let Some(raw) = raw else {
        return ParsedStatus {
            status: EntryStatus::Pending,
            legacy_overdue: false,
            recognized: true,
        };
    };

    let (status, legacy_overdue, recognized) = match raw.trim().to_lowercase().as_str() {
        "" | "pending" | "open" | "pendente" | "em_dia" | "em dia" => {
            (EntryStatus::Pending, false, true)
        }
        "overdue" | "late" | "vencido" | "atrasado" => (EntryStatus::Pending, true, true),
        "paid" | "received" | "settled" | "pago" | "recebido" => (EntryStatus::Paid, false, true),
        "cancelled" | "canceled" | "cancelado" => (EntryStatus::Cancelled, false, true),
        _ => (EntryStatus::Pending, false, false),
    };

    ParsedStatus {
        status,
        legacy_overdue,
        recognized,
    }
}

/// Parses a stored date, truncating any time of day.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, naive timestamps and RFC 3339.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

/// Maps raw receivables and payables into unified entries.
///
/// Receivables come first, then payables, each in input order.
#[must_use]
pub fn normalize(receivables: &[RawReceivable], payables: &[RawPayable]) -> Vec<LedgerEntry> {
    receivables
        .iter()
        .map(|raw| normalize_fields(raw.fields(), Direction::Inflow))
        .chain(
            payables
                .iter()
                .map(|raw| normalize_fields(raw.fields(), Direction::Outflow)),
        )
        .collect()
}

fn normalize_fields(raw: RawFields<'_>, direction: Direction) -> LedgerEntry {
    let missing_source_id = raw.id.is_none();
    let id = raw.id.unwrap_or_default();
    if missing_source_id {
        warn!(entry_id = %id, ?direction, "record without id, assigned a transient one");
    }
    let parsed = parse_status(raw.status);
    if !parsed.recognized {
        warn!(entry_id = %id, status = ?raw.status, "unknown stored status, treating as pending");
    }

    let amount = coerce(raw.amount);
    let mut settlement_date = read_date(id, "settlement_date", raw.settlement_date);
    if parsed.status != EntryStatus::Paid && settlement_date.is_some() {
        warn!(entry_id = %id, status = %parsed.status, "settlement date on unpaid entry dropped");
        settlement_date = None;
    }

    LedgerEntry {
        id,
        direction,
        description: raw.description.unwrap_or_default().to_string(),
        amount,
        original_amount: raw.original_amount.unwrap_or(amount),
        interest: coerce(raw.interest),
        fine: coerce(raw.fine),
        discount: coerce(raw.discount),
        due_date: read_date(id, "due_date", raw.due_date),
        competency_date: read_date(id, "competency_date", raw.competency_date),
        settlement_date,
        status: parsed.status,
        legacy_overdue_tag: parsed.legacy_overdue,
        missing_source_id,
        bank_account_id: raw.bank_account_id,
        cost_center_id: raw.cost_center_id,
        category_id: raw.category_id,
        counterparty_id: raw.counterparty_id,
        linked_installment_id: raw.installment_id,
    }
}

fn read_date(id: LedgerEntryId, field: &'static str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    let parsed = parse_date(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        warn!(entry_id = %id, field, value = raw, "unparseable date, treating as missing");
    }
    parsed
}
