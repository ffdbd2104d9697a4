//! Run-wide source table.
//!
//! Concurrent web researchers share one table through an `Arc`. Every
//! insertion happens under a single mutex, so two calls citing the same URL
//! in the same round still end up with one entry and one identifier.

use crate::types::{Source, SourceId};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Inner {
    by_url: HashMap<String, SourceId>,
    sources: Vec<Source>,
}

/// Sources keyed by URL, with identifiers assigned in insertion order
#[derive(Debug, Default)]
pub struct SourceTable {
    inner: Mutex<Inner>,
}

impl SourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the identifier for `url`, creating the source if it is new.
    ///
    /// An existing entry keeps its first label.
    pub fn insert_if_absent(&self, url: &str, label: &str) -> SourceId {
        let mut inner = self.inner.lock();
        Self::insert_locked(&mut inner, url, label)
    }

    /// Register a batch of `(url, label)` pairs under one lock acquisition
    pub fn register_all<'a, I>(&self, entries: I) -> Vec<SourceId>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut inner = self.inner.lock();
        entries
            .into_iter()
            .map(|(url, label)| Self::insert_locked(&mut inner, url, label))
            .collect()
    }

    fn insert_locked(inner: &mut Inner, url: &str, label: &str) -> SourceId {
        if let Some(id) = inner.by_url.get(url) {
            return *id;
        }

        let id = SourceId(inner.sources.len() as u32);
        inner.sources.push(Source {
            id,
            label: label.to_string(),
            url: url.to_string(),
        });
        inner.by_url.insert(url.to_string(), id);
        id
    }

    pub fn get(&self, id: SourceId) -> Option<Source> {
        self.inner.lock().sources.get(id.0 as usize).cloned()
    }

    pub fn id_for(&self, url: &str) -> Option<SourceId> {
        self.inner.lock().by_url.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every source, ordered by identifier
    pub fn snapshot(&self) -> Vec<Source> {
        self.inner.lock().sources.clone()
    }
}
