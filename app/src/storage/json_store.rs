//! # JSON File Store
//!
//! File-backed implementation of [`SettingsStore`]: one `<key>.json` file
//! per key inside the connection's base directory.
//!
//! ## File Structure
//!
//! ```text
//! PictoBoard/
//! ├── displaySettings.json
//! ├── customSymbols.json
//! ├── customCategories.json
//! ├── userToken.json
//! └── userAvatarUri_<userId>.json
//! ```
//!
//! Writes go through a temp file in the same directory followed by a
//! rename, so a crash mid-write leaves the previous value intact rather
//! than a truncated blob.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::fs;
use std::io::Write;

use super::connection::StoreConnection;
use super::traits::SettingsStore;

/// File-per-key JSON blob store.
#[derive(Clone)]
pub struct JsonFileStore {
    connection: StoreConnection,
}

impl JsonFileStore {
    /// Create a new store over an existing connection.
    pub fn new(connection: StoreConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.connection.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store file for key '{}'", key))?;
        Ok(Some(content))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.connection.key_path(key);
        let temp_path = path.with_extension("json.tmp");

        {
            let mut temp_file = fs::File::create(&temp_path)
                .with_context(|| format!("Failed to create temp file for key '{}'", key))?;
            temp_file
                .write_all(value.as_bytes())
                .with_context(|| format!("Failed to write temp file for key '{}'", key))?;
            temp_file.flush()?;
        }

        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to commit write for key '{}'", key))?;

        debug!("Persisted {} bytes under key '{}'", value.len(), key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.connection.key_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove store file for key '{}'", key))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let conn = StoreConnection::new(dir.path()).expect("Failed to create connection");
        (dir, JsonFileStore::new(conn))
    }

    #[tokio::test]
    async fn test_read_never_written_key() {
        let (_dir, store) = setup_test();
        let value = store.read("displaySettings").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let (_dir, store) = setup_test();
        store
            .write("displaySettings", r#"{"brightness":40}"#)
            .await
            .unwrap();

        let value = store.read("displaySettings").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"brightness":40}"#));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (_dir, store) = setup_test();
        store.write("customSymbols", "[1]").await.unwrap();
        store.write("customSymbols", "[1,2]").await.unwrap();
        store.write("customSymbols", "[1,2,3]").await.unwrap();

        let value = store.read("customSymbols").await.unwrap();
        assert_eq!(value.as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_dir, store) = setup_test();
        store.write("userToken", "\"tok\"").await.unwrap();
        store.remove("userToken").await.unwrap();
        store.remove("userToken").await.unwrap();

        assert!(store.read("userToken").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_content_is_returned_verbatim() {
        let (_dir, store) = setup_test();
        store.write("displaySettings", "not json {{{").await.unwrap();

        // The store never interprets content; parsing is the caller's job.
        let value = store.read("displaySettings").await.unwrap();
        assert_eq!(value.as_deref(), Some("not json {{{"));
    }
}
