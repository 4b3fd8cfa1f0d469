//! Store-backed mutation operations.

use chrono::NaiveDate;
use fluxo_shared::types::{BankAccountId, LedgerEntryId};
use rust_decimal::Decimal;
use tracing::{error, info};

use super::service::{SettleOutcome, SettlementService};
use super::store::LedgerStore;
use super::trail::{MutationRecord, PartialSettlementRecord};
use crate::ledger::{LedgerEntry, LedgerError};

/// Runs settlement transitions against a [`LedgerStore`].
///
/// Each applied change is persisted and then appended to the store's trail.
/// A write that fails midway is compensated so the store keeps its previous
/// rows. Callers re-fetch a snapshot afterwards; nothing here recomputes balances.
#[derive(Debug)]
pub struct SettlementMutator<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> SettlementMutator<S> {
    /// Creates a mutator over a store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }

    fn load(&self, id: LedgerEntryId) -> Result<LedgerEntry, LedgerError> {
        self.store.get(id)?.ok_or(LedgerError::EntryNotFound(id))
    }

    fn load_all(&self, ids: &[LedgerEntryId]) -> Result<Vec<LedgerEntry>, LedgerError> {
        ids.iter().map(|&id| self.load(id)).collect()
    }

    /// Writes every entry; on the first failure rewrites the ones already
    /// written back to their loaded state.
    fn update_all(
        &mut self,
        updated: &[LedgerEntry],
        originals: &[LedgerEntry],
    ) -> Result<(), LedgerError> {
        for (written, entry) in updated.iter().enumerate() {
            if let Err(err) = self.store.update(entry) {
                for original in &originals[..written] {
                    if let Err(restore) = self.store.update(original) {
                        error!(entry_id = %original.id, error = %restore, "failed to restore entry");
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Settles an entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `InvalidTransition`, or a store error.
    pub fn settle(
        &mut self,
        id: LedgerEntryId,
        settlement_date: NaiveDate,
    ) -> Result<SettleOutcome, LedgerError> {
        let mut entry = self.load(id)?;
        let outcome = SettlementService::settle(&mut entry, settlement_date)?;
        if outcome == SettleOutcome::Applied {
            self.store.update(&entry)?;
            self.store.append_trail(MutationRecord::Settled {
                entry_id: id,
                settlement_date,
            })?;
            info!(entry_id = %id, %settlement_date, "entry settled");
        }
        Ok(outcome)
    }

    /// Reopens a paid entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `InvalidTransition`, or a store error.
    pub fn reopen(&mut self, id: LedgerEntryId) -> Result<(), LedgerError> {
        let mut entry = self.load(id)?;
        SettlementService::reopen(&mut entry)?;
        self.store.update(&entry)?;
        self.store
            .append_trail(MutationRecord::Reopened { entry_id: id })?;
        info!(entry_id = %id, "entry reopened");
        Ok(())
    }

    /// Splits an entry into a paid portion and a pending residual.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `InvalidTransition`, `InvalidAmount`, or a store error.
    pub fn partial_settle(
        &mut self,
        id: LedgerEntryId,
        paid_amount: Decimal,
        settlement_date: NaiveDate,
        residual_due_date: NaiveDate,
    ) -> Result<PartialSettlementRecord, LedgerError> {
        let mut entry = self.load(id)?;
        let split = SettlementService::partial_settle(
            &mut entry,
            paid_amount,
            settlement_date,
            residual_due_date,
        )?;
        // Residual first: a failed insert leaves the original untouched.
        self.store.insert(split.residual)?;
        if let Err(err) = self.store.update(&entry) {
            if let Err(undo) = self.store.remove(split.record.residual_id) {
                error!(
                    residual_id = %split.record.residual_id,
                    error = %undo,
                    "failed to remove residual after aborted split"
                );
            }
            return Err(err);
        }
        self.store
            .append_trail(MutationRecord::PartiallySettled(split.record))?;
        info!(
            entry_id = %id,
            residual_id = %split.record.residual_id,
            paid = %split.record.paid_amount,
            residual = %split.record.residual_amount,
            "entry partially settled"
        );
        Ok(split.record)
    }

    /// Clones an entry, returning the new entry's id.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or a store error.
    pub fn clone_entry(&mut self, id: LedgerEntryId) -> Result<LedgerEntryId, LedgerError> {
        let source = self.load(id)?;
        let clone = SettlementService::clone_entry(&source);
        let clone_id = clone.id;
        self.store.insert(clone)?;
        self.store.append_trail(MutationRecord::Cloned {
            source_id: id,
            clone_id,
        })?;
        info!(source_id = %id, %clone_id, "entry cloned");
        Ok(clone_id)
    }

    /// Moves the due date of every listed entry, returning how many changed.
    ///
    /// All ids are loaded before anything is written, and a failed write
    /// restores the entries already updated.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for the first missing id, or a store error.
    pub fn reschedule(
        &mut self,
        ids: &[LedgerEntryId],
        due_date: NaiveDate,
    ) -> Result<usize, LedgerError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let originals = self.load_all(ids)?;
        let mut entries = originals.clone();
        for entry in &mut entries {
            SettlementService::reschedule(entry, due_date);
        }
        self.update_all(&entries, &originals)?;
        self.store.append_trail(MutationRecord::Rescheduled {
            entry_ids: ids.to_vec(),
            due_date,
        })?;
        info!(count = entries.len(), %due_date, "entries rescheduled");
        Ok(entries.len())
    }

    /// Moves every listed entry to another account (or none), returning how many changed.
    ///
    /// All ids are loaded before anything is written, and a failed write
    /// restores the entries already updated.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for the first missing id, or a store error.
    pub fn reassign_account(
        &mut self,
        ids: &[LedgerEntryId],
        bank_account_id: Option<BankAccountId>,
    ) -> Result<usize, LedgerError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let originals = self.load_all(ids)?;
        let mut entries = originals.clone();
        for entry in &mut entries {
            SettlementService::reassign(entry, bank_account_id);
        }
        self.update_all(&entries, &originals)?;
        self.store.append_trail(MutationRecord::AccountReassigned {
            entry_ids: ids.to_vec(),
            bank_account_id,
        })?;
        info!(count = entries.len(), bank_account_id = ?bank_account_id, "entries reassigned");
        Ok(entries.len())
    }

    /// Hard-deletes an entry, returning it.
    ///
    /// `allow_linked_override` is the outcome of the caller's privilege check.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `LinkedEntry`, or a store error.
    pub fn delete(
        &mut self,
        id: LedgerEntryId,
        allow_linked_override: bool,
    ) -> Result<LedgerEntry, LedgerError> {
        let entry = self.load(id)?;
        SettlementService::validate_can_delete(&entry, allow_linked_override)?;
        let removed = self.store.remove(id)?;
        self.store.append_trail(MutationRecord::Deleted {
            entry_id: id,
            linked_override: entry.is_linked(),
        })?;
        info!(entry_id = %id, linked = entry.is_linked(), "entry deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Direction, EntryStatus};
    use crate::settlement::InMemoryLedgerStore;
    use fluxo_shared::types::InstallmentId;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn mutator_with(entries: Vec<LedgerEntry>) -> SettlementMutator<InMemoryLedgerStore> {
        SettlementMutator::new(InMemoryLedgerStore::from_entries(entries))
    }

    /// In-memory store that refuses inserts, or updates to chosen entries.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: InMemoryLedgerStore,
        reject_inserts: bool,
        reject_updates_to: Vec<LedgerEntryId>,
    }

    impl FlakyStore {
        fn over(entries: Vec<LedgerEntry>) -> Self {
            Self {
                inner: InMemoryLedgerStore::from_entries(entries),
                ..Self::default()
            }
        }
    }

    impl LedgerStore for FlakyStore {
        fn get(&self, id: LedgerEntryId) -> Result<Option<LedgerEntry>, LedgerError> {
            self.inner.get(id)
        }

        fn insert(&mut self, entry: LedgerEntry) -> Result<(), LedgerError> {
            if self.reject_inserts {
                return Err(LedgerError::Store("insert rejected".to_string()));
            }
            self.inner.insert(entry)
        }

        fn update(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
            if self.reject_updates_to.contains(&entry.id) {
                return Err(LedgerError::Store("update rejected".to_string()));
            }
            self.inner.update(entry)
        }

        fn remove(&mut self, id: LedgerEntryId) -> Result<LedgerEntry, LedgerError> {
            self.inner.remove(id)
        }

        fn append_trail(&mut self, record: MutationRecord) -> Result<(), LedgerError> {
            self.inner.append_trail(record)
        }
    }

    #[test]
    fn test_settle_records_trail_once() {
        let entry = LedgerEntry::pending(Direction::Inflow, dec!(100), day(10));
        let id = entry.id;
        let mut mutator = mutator_with(vec![entry]);

        assert_eq!(mutator.settle(id, day(9)).unwrap(), SettleOutcome::Applied);
        assert_eq!(mutator.settle(id, day(9)).unwrap(), SettleOutcome::Unchanged);

        let store = mutator.into_inner();
        assert_eq!(store.entries()[0].status, EntryStatus::Paid);
        assert_eq!(
            store.trail(),
            &[MutationRecord::Settled {
                entry_id: id,
                settlement_date: day(9),
            }]
        );
    }

    #[test]
    fn test_missing_entry() {
        let mut mutator = mutator_with(vec![]);
        let id = LedgerEntryId::new();
        assert!(matches!(
            mutator.settle(id, day(1)),
            Err(LedgerError::EntryNotFound(missing)) if missing == id
        ));
        assert!(mutator.store().trail().is_empty());
    }

    #[test]
    fn test_reopen_persists() {
        let entry = LedgerEntry::settled(Direction::Outflow, dec!(10), day(2));
        let id = entry.id;
        let mut mutator = mutator_with(vec![entry]);
        mutator.reopen(id).unwrap();
        let stored = &mutator.store().entries()[0];
        assert_eq!(stored.status, EntryStatus::Pending);
        assert!(stored.settlement_date.is_none());
    }

    #[test]
    fn test_scenario_c_partial_settlement() {
        let entry = LedgerEntry::pending(Direction::Inflow, dec!(900), day(1))
            .with_installment(InstallmentId::new());
        let id = entry.id;
        let mut mutator = mutator_with(vec![entry]);

        let record = mutator.partial_settle(id, dec!(400), day(1), day(31)).unwrap();
        assert_eq!(record.original_id, id);
        assert_eq!(record.paid_amount + record.residual_amount, dec!(900));

        let store = mutator.into_inner();
        assert_eq!(store.entries().len(), 2);
        let paid = &store.entries()[0];
        let residual = &store.entries()[1];
        assert_eq!((paid.status, paid.amount), (EntryStatus::Paid, dec!(400)));
        assert_eq!(
            (residual.status, residual.amount),
            (EntryStatus::Pending, dec!(500))
        );
        assert_eq!(residual.id, record.residual_id);
        assert_eq!(residual.due_date, Some(day(31)));
        assert!(!residual.is_linked());
        assert_eq!(store.trail(), &[MutationRecord::PartiallySettled(record)]);
    }

    #[test]
    fn test_failed_partial_settlement_writes_nothing() {
        let entry = LedgerEntry::pending(Direction::Inflow, dec!(900), day(1));
        let id = entry.id;
        let mut mutator = mutator_with(vec![entry.clone()]);
        let result = mutator.partial_settle(id, dec!(900), day(1), day(31));
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));
        assert_eq!(mutator.store().entries(), &[entry]);
        assert!(mutator.store().trail().is_empty());
    }

    // ========== Store Failures ==========

    #[test]
    fn test_partial_settlement_keeps_original_when_insert_fails() {
        let entry = LedgerEntry::pending(Direction::Inflow, dec!(900), day(1));
        let id = entry.id;
        let mut store = FlakyStore::over(vec![entry.clone()]);
        store.reject_inserts = true;
        let mut mutator = SettlementMutator::new(store);

        let result = mutator.partial_settle(id, dec!(400), day(1), day(31));
        assert!(matches!(result, Err(LedgerError::Store(_))));

        let store = mutator.into_inner().inner;
        assert_eq!(store.entries(), &[entry]);
        assert_eq!(store.entries()[0].amount, dec!(900));
        assert!(store.trail().is_empty());
    }

    #[test]
    fn test_partial_settlement_removes_residual_when_update_fails() {
        let entry = LedgerEntry::pending(Direction::Outflow, dec!(900), day(1));
        let id = entry.id;
        let mut store = FlakyStore::over(vec![entry.clone()]);
        store.reject_updates_to.push(id);
        let mut mutator = SettlementMutator::new(store);

        let result = mutator.partial_settle(id, dec!(400), day(1), day(31));
        assert!(matches!(result, Err(LedgerError::Store(_))));

        let store = mutator.into_inner().inner;
        assert_eq!(store.entries(), &[entry]);
        assert!(store.trail().is_empty());
    }

    #[test]
    fn test_batch_restores_written_entries_when_update_fails() {
        let a = LedgerEntry::pending(Direction::Inflow, dec!(1), day(1));
        let b = LedgerEntry::pending(Direction::Inflow, dec!(2), day(2));
        let c = LedgerEntry::pending(Direction::Inflow, dec!(3), day(3));
        let ids = [a.id, b.id, c.id];
        let before = vec![a, b.clone(), c];
        let mut store = FlakyStore::over(before.clone());
        store.reject_updates_to.push(b.id);
        let mut mutator = SettlementMutator::new(store);

        assert!(mutator.reschedule(&ids, day(20)).is_err());
        assert!(
            mutator
                .reassign_account(&ids, Some(BankAccountId::new()))
                .is_err()
        );

        let store = mutator.into_inner().inner;
        assert_eq!(store.entries(), before.as_slice());
        assert!(store.trail().is_empty());
    }

    #[test]
    fn test_clone_entry() {
        let entry = LedgerEntry::settled(Direction::Outflow, dec!(75), day(4));
        let id = entry.id;
        let mut mutator = mutator_with(vec![entry]);
        let clone_id = mutator.clone_entry(id).unwrap();

        let clone = mutator.store().get(clone_id).unwrap().unwrap();
        assert_eq!(clone.status, EntryStatus::Pending);
        assert_eq!(clone.amount, dec!(75));
        assert_eq!(mutator.store().entries().len(), 2);
    }

    #[test]
    fn test_batch_updates_validate_all_ids_first() {
        let a = LedgerEntry::pending(Direction::Inflow, dec!(1), day(1));
        let b = LedgerEntry::pending(Direction::Inflow, dec!(2), day(2));
        let ids = [a.id, b.id];
        let mut mutator = mutator_with(vec![a.clone(), b]);

        let missing = [a.id, LedgerEntryId::new()];
        assert!(mutator.reschedule(&missing, day(20)).is_err());
        assert_eq!(mutator.store().entries()[0].due_date, Some(day(1)));

        assert_eq!(mutator.reschedule(&ids, day(20)).unwrap(), 2);
        assert!(
            mutator
                .store()
                .entries()
                .iter()
                .all(|e| e.due_date == Some(day(20)))
        );

        let account = BankAccountId::new();
        assert_eq!(mutator.reassign_account(&ids, Some(account)).unwrap(), 2);
        assert!(
            mutator
                .store()
                .entries()
                .iter()
                .all(|e| e.bank_account_id == Some(account))
        );

        assert_eq!(mutator.reschedule(&[], day(1)).unwrap(), 0);
        assert_eq!(mutator.store().trail().len(), 2);
    }

    #[test]
    fn test_delete_linked_requires_override() {
        let linked = LedgerEntry::pending(Direction::Outflow, dec!(30), day(3))
            .with_installment(InstallmentId::new());
        let id = linked.id;
        let mut mutator = mutator_with(vec![linked]);

        assert!(matches!(
            mutator.delete(id, false),
            Err(LedgerError::LinkedEntry(_))
        ));
        assert_eq!(mutator.store().entries().len(), 1);

        let removed = mutator.delete(id, true).unwrap();
        assert_eq!(removed.id, id);
        assert!(mutator.store().entries().is_empty());
        assert_eq!(
            mutator.store().trail(),
            &[MutationRecord::Deleted {
                entry_id: id,
                linked_override: true,
            }]
        );
    }
}
