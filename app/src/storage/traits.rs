//! # Storage Traits
//!
//! Defines the storage abstraction trait that allows different storage
//! backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

/// Trait defining the interface for key-value blob storage.
///
/// Values are raw JSON text. The store never interprets them: a blob that
/// fails to parse is still returned verbatim by [`read`](Self::read), and
/// recovering from corruption is the caller's responsibility. This keeps
/// the field-granular fallback logic in the domain layer, where the schema
/// is known.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the last value written under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written. An `Err` means
    /// the backend itself failed (I/O), not that the content is malformed.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Persist `value` under `key`, replacing any previous value.
    ///
    /// Failures are recoverable errors: callers keep their in-memory state
    /// as the source of truth and surface a notice instead of crashing.
    async fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`, if any. Removing a missing key is not
    /// an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
