//! Which bank accounts a computation covers.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use fluxo_shared::types::BankAccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ledger::{BankAccount, LedgerEntry};

/// Account selection for a computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ids", rename_all = "snake_case")]
pub enum AccountScope {
    /// One bank account.
    Account(BankAccountId),
    /// A set of accounts summed together. Empty means every known account.
    Accounts(Vec<BankAccountId>),
    /// Every account plus entries with no account at all.
    Unfiltered,
}

impl AccountScope {
    /// Every known account, excluding unassigned entries.
    #[must_use]
    pub fn all() -> Self {
        Self::Accounts(Vec::new())
    }

    /// Builds a scope from a list of ids: one id is a single account scope.
    #[must_use]
    pub fn from_ids(ids: Vec<BankAccountId>) -> Self {
        match ids.as_slice() {
            [single] => Self::Account(*single),
            _ => Self::Accounts(ids),
        }
    }
}

/// How an admitted entry relates to its account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Admitted {
    /// Opening date of the entry's account, if any.
    pub opening_date: Option<NaiveDate>,
}

/// A scope resolved against the accounts of one snapshot.
#[derive(Debug)]
pub(crate) struct ResolvedScope<'a> {
    /// In-scope accounts, in snapshot order.
    pub accounts: Vec<&'a BankAccount>,
    by_id: HashMap<BankAccountId, &'a BankAccount>,
    known: HashSet<BankAccountId>,
    pub include_unassigned: bool,
}

impl<'a> ResolvedScope<'a> {
    pub fn resolve(scope: &AccountScope, accounts: &'a [BankAccount]) -> Self {
        let known: HashSet<BankAccountId> = accounts.iter().map(|a| a.id).collect();
        let selected: Option<HashSet<BankAccountId>> = match scope {
            AccountScope::Account(id) => Some(HashSet::from([*id])),
            AccountScope::Accounts(ids) if !ids.is_empty() => Some(ids.iter().copied().collect()),
            AccountScope::Accounts(_) | AccountScope::Unfiltered => None,
        };
        if let Some(selected) = &selected {
            for id in selected.difference(&known) {
                warn!(bank_account_id = %id, "scope names an unknown bank account, ignoring");
            }
        }

        let in_scope: Vec<&'a BankAccount> = accounts
            .iter()
            .filter(|a| selected.as_ref().is_none_or(|s| s.contains(&a.id)))
            .collect();
        let by_id = in_scope.iter().map(|a| (a.id, *a)).collect();

        Self {
            accounts: in_scope,
            by_id,
            known,
            include_unassigned: matches!(scope, AccountScope::Unfiltered),
        }
    }

    /// Decides whether an entry takes part in this computation.
    ///
    /// Entries pointing at an account missing from the snapshot are always
    /// excluded and logged.
    pub fn admit(&self, entry: &LedgerEntry) -> Option<Admitted> {
        match entry.bank_account_id {
            None => self.include_unassigned.then_some(Admitted { opening_date: None }),
            Some(id) => {
                if let Some(account) = self.by_id.get(&id) {
                    Some(Admitted {
                        opening_date: account.opening_date,
                    })
                } else {
                    if !self.known.contains(&id) {
                        warn!(entry_id = %entry.id, bank_account_id = %id, "entry references unknown bank account, excluded");
                    }
                    None
                }
            }
        }
    }

    /// Sum of the in-scope accounts' opening balances.
    pub fn opening_balance(&self) -> Decimal {
        self.accounts.iter().map(|a| a.opening_balance).sum()
    }

    /// The in-scope account ids, in snapshot order.
    pub fn ids(&self) -> Vec<BankAccountId> {
        self.accounts.iter().map(|a| a.id).collect()
    }
}
