//! In-memory implementation of [`SettingsStore`].
//!
//! Used as the test backend throughout the domain layer, and as a
//! last-resort fallback when no data directory can be created (the app
//! stays usable for the session; nothing survives a restart). Tracks
//! per-key write counts so debounce behavior can be asserted on.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::SettingsStore;

#[derive(Default)]
struct Inner {
    entries: HashMap<String, String>,
    write_counts: HashMap<String, usize>,
}

/// Process-local blob store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes ever issued for `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .write_counts
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Seed a value directly, bypassing write accounting. Test convenience.
    pub fn seed(&self, key: &str, value: &str) {
        self.inner
            .lock()
            .unwrap()
            .entries
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.lock().unwrap().entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.insert(key.to_string(), value.to_string());
        *inner.write_counts.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.lock().unwrap().entries.remove(key);
        Ok(())
    }
}

/// Store wrapper that fails every write. Test double for the
/// "could not save" notice path.
#[derive(Clone, Default)]
pub struct FailingStore {
    delegate: MemoryStore,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for FailingStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        self.delegate.read(key).await
    }

    async fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow::anyhow!("simulated storage failure"))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.delegate.remove(key).await
    }
}
