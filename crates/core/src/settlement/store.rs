//! Persistence seam for mutations.

use fluxo_shared::types::LedgerEntryId;

use super::trail::MutationRecord;
use crate::ledger::{BankAccount, LedgerEntry, LedgerError, LedgerSnapshot};

/// Storage collaborator contract for entry mutations.
///
/// Implemented by whatever owns the entry rows. Writes are expected to be
/// idempotent; concurrent writers are the implementor's problem.
pub trait LedgerStore {
    /// Loads one entry.
    fn get(&self, id: LedgerEntryId) -> Result<Option<LedgerEntry>, LedgerError>;

    /// Adds a new entry.
    fn insert(&mut self, entry: LedgerEntry) -> Result<(), LedgerError>;

    /// Replaces an existing entry.
    fn update(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError>;

    /// Removes an entry, returning it.
    fn remove(&mut self, id: LedgerEntryId) -> Result<LedgerEntry, LedgerError>;

    /// Records an applied mutation.
    fn append_trail(&mut self, record: MutationRecord) -> Result<(), LedgerError>;
}

/// Vec-backed store for tests and single-process harnesses.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    entries: Vec<LedgerEntry>,
    trail: Vec<MutationRecord>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given entries.
    #[must_use]
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        Self {
            entries,
            trail: Vec::new(),
        }
    }

    /// Current entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Recorded mutations, oldest first.
    #[must_use]
    pub fn trail(&self) -> &[MutationRecord] {
        &self.trail
    }

    /// Fresh snapshot of the current entries against the given accounts.
    #[must_use]
    pub fn snapshot(&self, accounts: Vec<BankAccount>) -> LedgerSnapshot {
        LedgerSnapshot::new(self.entries.clone(), accounts)
    }

    fn position(&self, id: LedgerEntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get(&self, id: LedgerEntryId) -> Result<Option<LedgerEntry>, LedgerError> {
        Ok(self.position(id).map(|i| self.entries[i].clone()))
    }

    fn insert(&mut self, entry: LedgerEntry) -> Result<(), LedgerError> {
        if self.position(entry.id).is_some() {
            return Err(LedgerError::Store(format!("entry {} already exists", entry.id)));
        }
        self.entries.push(entry);
        Ok(())
    }

    fn update(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let index = self
            .position(entry.id)
            .ok_or(LedgerError::EntryNotFound(entry.id))?;
        self.entries[index] = entry.clone();
        Ok(())
    }

    fn remove(&mut self, id: LedgerEntryId) -> Result<LedgerEntry, LedgerError> {
        let index = self.position(id).ok_or(LedgerError::EntryNotFound(id))?;
        Ok(self.entries.remove(index))
    }

    fn append_trail(&mut self, record: MutationRecord) -> Result<(), LedgerError> {
        self.trail.push(record);
        Ok(())
    }
}
