//! crates/portfolio_core/src/collection.rs
//!
//! A persisted, ordered collection of records kept under one storage key.
//!
//! Every mutation is applied to a copy, written through the `KeyValueStore`
//! port, and only then committed in memory, so a failed write leaves the
//! collection exactly as it was. New records are prepended (newest first).
//!
//! A stored value that cannot be parsed is replaced by the seed. A backend that
//! cannot be read at all leaves the collection read-only until a later `load`
//! succeeds, so the unread data is never overwritten.

use crate::ports::{KeyValueStore, PortError, PortResult};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

//=========================================================================================
// Records and Ids
//=========================================================================================

/// A record that can live in a `LocalCollectionStore`.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> u64;

    /// The highest id this record holds, including ids of owned children.
    fn max_issued_id(&self) -> u64 {
        self.id()
    }
}

/// Issues creation-time ids (Unix milliseconds) that are strictly increasing
/// within the process, even when two records land in the same millisecond.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails once `u64::MAX` has been issued or observed.
    pub fn next_id(&mut self) -> PortResult<u64> {
        let floor = self
            .last
            .checked_add(1)
            .ok_or_else(|| PortError::Unexpected("id space exhausted".to_string()))?;
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = now.max(floor);
        self.last = id;
        Ok(id)
    }

    /// Makes sure later ids stay above `id`.
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }
}

//=========================================================================================
// The Store
//=========================================================================================

type SeedFn<R> = Box<dyn Fn() -> Vec<R> + Send + Sync>;

pub struct LocalCollectionStore<R: Record> {
    key: String,
    backend: Arc<dyn KeyValueStore>,
    seed: SeedFn<R>,
    records: Vec<R>,
    ids: IdGenerator,
    /// Cleared when the backend could not be read.
    writable: bool,
}

impl<R: Record> LocalCollectionStore<R> {
    /// Opens the collection stored under `key`, falling back to `seed` when
    /// nothing usable is stored.
    pub fn open<F>(key: impl Into<String>, backend: Arc<dyn KeyValueStore>, seed: F) -> Self
    where
        F: Fn() -> Vec<R> + Send + Sync + 'static,
    {
        let mut store = Self {
            key: key.into(),
            backend,
            seed: Box::new(seed),
            records: Vec::new(),
            ids: IdGenerator::new(),
            writable: true,
        };
        store.load();
        store
    }

    /// Re-reads the persisted sequence. Missing or corrupt data is replaced by
    /// the seed. If the backend itself fails, the in-memory records are kept and
    /// writes are refused until a later `load` succeeds. This never fails.
    pub fn load(&mut self) -> &[R] {
        match self.read_persisted() {
            Ok(Some(records)) => {
                self.records = records;
                self.writable = true;
            }
            Ok(None) => {
                debug!("No stored '{}' collection, using seed data", self.key);
                self.records = (self.seed)();
                self.writable = true;
            }
            Err(PortError::Corrupt(reason)) => {
                warn!("Resetting '{}' collection to seed data: {}", self.key, reason);
                self.records = (self.seed)();
                self.writable = true;
            }
            Err(e) => {
                error!(
                    "Could not read '{}' collection, refusing writes until it loads: {}",
                    self.key, e
                );
                self.writable = false;
            }
        }

        for record in &self.records {
            self.ids.observe(record.max_issued_id());
        }
        &self.records
    }

    fn read_persisted(&self) -> PortResult<Option<Vec<R>>> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PortError::Corrupt(format!("{}: {}", self.key, e)))
    }

    /// The whole collection in persisted order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> PortResult<&R> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))
    }

    /// Assigns an id and creation time, prepends the record built by `build`,
    /// and persists.
    pub fn create<F>(&mut self, build: F) -> PortResult<R>
    where
        F: FnOnce(u64, DateTime<Utc>) -> R,
    {
        self.ensure_writable()?;
        let record = build(self.ids.next_id()?, Utc::now());

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record.clone());
        next.extend(self.records.iter().cloned());
        self.commit(next)?;

        Ok(record)
    }

    /// Applies `apply` to the record with `id` and persists. `apply` can draw
    /// fresh ids (for child records) from the collection's generator. If it
    /// fails, nothing changes.
    pub fn update<F>(&mut self, id: u64, apply: F) -> PortResult<R>
    where
        F: FnOnce(&mut R, &mut IdGenerator) -> PortResult<()>,
    {
        let index = self.position(id)?;
        self.ensure_writable()?;

        let mut next = self.records.clone();
        apply(&mut next[index], &mut self.ids)?;
        let updated = next[index].clone();
        self.commit(next)?;

        Ok(updated)
    }

    /// Deletes the record with `id` (and anything it owns) and persists.
    pub fn remove(&mut self, id: u64) -> PortResult<R> {
        let index = self.position(id)?;
        self.ensure_writable()?;

        let mut next = self.records.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        Ok(removed)
    }

    /// Writes the current collection.
    pub fn save(&self) -> PortResult<()> {
        self.ensure_writable()?;
        self.persist(&self.records)
    }

    /// Drops the stored value and empties the collection. The next `load` sees
    /// nothing stored and seeds again.
    pub fn clear(&mut self) -> PortResult<()> {
        self.ensure_writable()?;
        self.backend.remove(&self.key)?;
        self.records.clear();
        Ok(())
    }

    fn position(&self, id: u64) -> PortResult<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))
    }

    fn ensure_writable(&self) -> PortResult<()> {
        if self.writable {
            Ok(())
        } else {
            Err(PortError::Unexpected(format!(
                "'{}' collection could not be read; not overwriting it",
                self.key
            )))
        }
    }

    fn not_found(&self, id: u64) -> PortError {
        PortError::NotFound(format!("{} record {}", self.key, id))
    }

    fn commit(&mut self, next: Vec<R>) -> PortResult<()> {
        self.persist(&next)?;
        self.records = next;
        Ok(())
    }

    fn persist(&self, records: &[R]) -> PortResult<()> {
        let raw = serde_json::to_string(records)
            .map_err(|e| PortError::Unexpected(format!("serializing {}: {}", self.key, e)))?;
        self.backend.set(&self.key, &raw)
    }
}
