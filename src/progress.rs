use serde::{Deserialize, Serialize};

use crate::poems::PoemCatalog;
use crate::storage::KeyValueStore;

/// Ids of completed poems, in completion order, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedPoems(Vec<u32>);

impl CompletedPoems {
    pub fn contains(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    pub fn insert(&mut self, id: u32) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Parse the stored JSON array, dropping any duplicates a hand-edited
    /// value might carry.
    fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let ids: Vec<u32> = serde_json::from_str(raw)?;
        let mut completed = Self::default();
        for id in ids {
            completed.insert(id);
        }
        Ok(completed)
    }
}

pub struct ProgressTracker<S> {
    store: S,
    key: String,
    completed: CompletedPoems,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    /// Load the completed set. Unreadable or malformed data starts an empty
    /// session-only set.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let completed = match store.get(&key) {
            Ok(Some(raw)) => CompletedPoems::parse(&raw).unwrap_or_else(|e| {
                log::warn!("discarding malformed '{}' value: {}", key, e);
                CompletedPoems::default()
            }),
            Ok(None) => CompletedPoems::default(),
            Err(e) => {
                log::warn!("completion history unavailable: {}", e);
                CompletedPoems::default()
            }
        };
        Self {
            store,
            key,
            completed,
        }
    }

    pub fn completed(&self) -> &CompletedPoems {
        &self.completed
    }

    pub fn is_complete(&self, id: u32) -> bool {
        self.completed.contains(id)
    }

    /// Record a completion and persist it. A failed write keeps the
    /// in-memory record for this session only.
    pub fn mark_complete(&mut self, id: u32) -> bool {
        if !self.completed.insert(id) {
            return false;
        }
        log::debug!("poem {} completed", id);
        match serde_json::to_string(&self.completed) {
            Ok(raw) => {
                if let Err(e) = self.store.set(&self.key, &raw) {
                    log::warn!("completion of poem {} not persisted: {}", id, e);
                }
            }
            Err(e) => log::warn!("completion of poem {} not serialized: {}", id, e),
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynastyCount {
    pub dynasty: String,
    pub completed: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub percent: u32,
    pub by_dynasty: Vec<DynastyCount>,
    pub next_target: u32,
}

impl ProgressStats {
    /// Ids outside the catalog are ignored.
    pub fn compute(catalog: &PoemCatalog, completed: &CompletedPoems) -> Self {
        let total = catalog.len();
        let done = catalog.iter().filter(|poem| completed.contains(poem.id)).count();

        let mut by_dynasty: Vec<DynastyCount> = Vec::new();
        for poem in catalog.iter() {
            let is_done = completed.contains(poem.id) as usize;
            match by_dynasty.iter_mut().find(|d| d.dynasty == poem.dynasty) {
                Some(entry) => {
                    entry.total += 1;
                    entry.completed += is_done;
                }
                None => by_dynasty.push(DynastyCount {
                    dynasty: poem.dynasty.clone(),
                    completed: is_done,
                    total: 1,
                }),
            }
        }

        let percent = if total == 0 {
            0
        } else {
            (done * 100 / total) as u32
        };

        Self {
            total,
            completed: done,
            remaining: total - done,
            percent,
            by_dynasty,
            next_target: catalog.first_uncompleted(completed),
        }
    }
}
