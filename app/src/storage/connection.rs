use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// StoreConnection manages the base data directory and resolves store keys
/// to file paths inside it.
#[derive(Clone)]
pub struct StoreConnection {
    base_directory: Arc<Mutex<PathBuf>>,
}

impl StoreConnection {
    /// Create a new connection with an explicit base directory.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: Arc::new(Mutex::new(base_path)),
        })
    }

    /// Create a new connection in the default data directory,
    /// ~/Documents/PictoBoard.
    pub fn new_default() -> Result<Self> {
        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = PathBuf::from(home_dir).join("Documents").join("PictoBoard");
        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    /// Get the current base directory.
    pub fn base_directory(&self) -> PathBuf {
        self.base_directory.lock().unwrap().clone()
    }

    /// Resolve a store key to the file that backs it.
    ///
    /// Keys may contain characters that are awkward in file names (the
    /// per-user avatar keys contain `:`), so everything outside
    /// `[A-Za-z0-9_-]` is mapped to `_` before appending the `.json`
    /// extension.
    pub fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_directory().join(format!("{}.json", safe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_path_sanitizes_separators() {
        let dir = tempfile::tempdir().unwrap();
        let conn = StoreConnection::new(dir.path()).unwrap();

        let path = conn.key_path("userAvatarUri:abc-123");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, "userAvatarUri_abc-123.json");
    }

    #[test]
    fn test_new_creates_base_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deeper").join("still");
        let conn = StoreConnection::new(&nested).unwrap();

        assert!(nested.exists());
        assert_eq!(conn.base_directory(), nested);
    }
}
