//! # Domain Module
//!
//! Contains all business logic of the settings and symbol persistence layer.
//!
//! ## Module Organization
//!
//! - **display_settings_service**: device-local appearance settings with
//!   field-granular load recovery and debounced persistence
//! - **symbol_library_service**: the custom symbol/category collections and
//!   their display grouping
//! - **parental_settings_service**: optimistic sync of the server-owned
//!   parental record (fetch, diff, save, reconcile)
//! - **session_service**: auth token, cached profile, per-user avatars
//! - **debounce**: the cancellable flush timer all persisted mutations share
//! - **notice**: user-visible failure alerts
//!
//! ## Key Invariants
//!
//! - Loading never fails: corrupt stored state heals to defaults, one field
//!   at a time, silently
//! - Setters apply in memory synchronously; persistence is asynchronous and
//!   debounced, with exactly one write per mutation burst
//! - Remote saves send minimal diffs and always re-baseline from the
//!   server's returned snapshot
//! - Validation happens at the input boundary; a rejected input mutates
//!   nothing

pub mod commands;
pub mod debounce;
pub mod display_settings_service;
pub mod models;
pub mod notice;
pub mod parental_settings_service;
pub mod session_service;
pub mod symbol_library_service;

pub use debounce::{Debouncer, DEFAULT_FLUSH_DELAY};
pub use display_settings_service::DisplaySettingsService;
pub use notice::{Notice, NoticeHub, NoticeKind};
pub use parental_settings_service::{
    ParentalSettingsService, PasscodeValidationError, UnsavedChanges,
};
pub use session_service::SessionService;
pub use symbol_library_service::{SymbolLibraryService, UNCATEGORIZED_LABEL};
