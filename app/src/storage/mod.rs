//! # Storage Module
//!
//! Handles all local data persistence for the communication board.
//!
//! Every persisted resource is a JSON blob stored under a fixed string key
//! (display settings, custom symbols, custom categories, session data). The
//! storage backend is abstracted behind the [`SettingsStore`] trait so the
//! domain layer never cares whether a key lands in a file, in memory, or
//! somewhere else entirely.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: writing JSON blobs to disk atomically
//! - **Data Retrieval**: reading blobs back, reporting "never written" as
//!   a distinct non-error outcome
//! - **Storage Abstraction**: one trait, multiple interchangeable backends
//! - **Directory Management**: locating and creating the app data directory
//!
//! ## Guarantees
//!
//! Within one key, writes are applied in call order (last write wins).
//! Across different keys there is no ordering guarantee, and none is needed:
//! no cross-key invariants exist. Corrupt stored content is *not* an error
//! at this layer; parsing and recovery are the caller's concern.

pub mod connection;
pub mod json_store;
pub mod memory;
pub mod traits;

pub use connection::StoreConnection;
pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::SettingsStore;

/// Fixed keys for the blobs this app persists locally.
pub mod keys {
    pub const DISPLAY_SETTINGS: &str = "displaySettings";
    pub const CUSTOM_SYMBOLS: &str = "customSymbols";
    pub const CUSTOM_CATEGORIES: &str = "customCategories";
    pub const USER_TOKEN: &str = "userToken";
    pub const USER_DATA: &str = "userData";
    pub const PARENTAL_PASSCODE: &str = "parentalPasscode";

    /// Per-user avatar key, one per user id.
    pub fn user_avatar(user_id: &str) -> String {
        format!("userAvatarUri:{}", user_id)
    }
}
