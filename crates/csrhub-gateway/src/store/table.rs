use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use csrhub_core::error::Result;
use csrhub_core::model::{Id, Record};

/// One in-memory collection: rows keyed by id plus an id sequence.
pub struct Table<R> {
    rows: DashMap<Id, R>,
    seq: AtomicU64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }
}

impl<R: Record + Clone> Table<R> {
    /// Snapshot of every row, ordered by id.
    pub fn all(&self) -> Vec<R> {
        let mut out: Vec<R> = self.rows.iter().map(|e| e.value().clone()).collect();
        out.sort_by_key(|r| r.id());
        out
    }

    pub fn get(&self, id: Id) -> Option<R> {
        self.rows.get(&id).map(|r| r.value().clone())
    }

    pub fn exists(&self, id: Id) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Allocate an id and insert the row `build` produces for it.
    /// A failed build burns the id, like a database sequence.
    pub fn try_insert_with<F>(&self, build: F) -> Result<R>
    where
        F: FnOnce(Id) -> Result<R>,
    {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        let row = build(id)?;
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Mutate one row in place under its shard lock.
    /// `f` must not touch this table again.
    pub fn update<T>(&self, id: Id, f: impl FnOnce(&mut R) -> T) -> Option<T> {
        self.rows.get_mut(&id).map(|mut r| f(r.value_mut()))
    }

    pub fn remove(&self, id: Id) -> Option<R> {
        self.rows.remove(&id).map(|(_, r)| r)
    }

    /// Remove every row matching `pred`; returns the removed rows.
    pub fn remove_where(&self, pred: impl Fn(&R) -> bool) -> Vec<R> {
        let ids: Vec<Id> = self
            .rows
            .iter()
            .filter(|e| pred(e.value()))
            .map(|e| *e.key())
            .collect();
        ids.into_iter().filter_map(|id| self.remove(id)).collect()
    }

    /// Apply `f` to every row (reference clearing on cascades).
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut R)) {
        for mut e in self.rows.iter_mut() {
            f(e.value_mut());
        }
    }
}
