//! # pictoboard-app
//!
//! Settings and symbol persistence layer for the PictoBoard AAC
//! communication board.
//!
//! This crate is the non-UI half of the app: durable key-value storage of
//! JSON blobs, field-granular settings recovery, debounced persistence,
//! optimistic sync of the server-owned parental record, and the custom
//! symbol library. Screens hold an [`AppState`] by reference and call the
//! services on it; no framework-specific singletons exist.
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (screens, out of scope here)
//!     ↓
//! Domain Layer (services, models, commands)
//!     ↓                         ↓
//! Storage Layer            IO Layer
//! (JSON blob store)        (remote settings API, pictogram search)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{
    DisplaySettingsService, NoticeHub, ParentalSettingsService, SessionService,
    SymbolLibraryService,
};
use crate::io::{HttpSettingsApi, PictogramClient};
use crate::storage::{JsonFileStore, SettingsStore, StoreConnection};

/// Configuration for [`initialize_app`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Data directory override; `None` uses the platform default
    pub data_dir: Option<PathBuf>,
    /// Base URL of the remote settings service
    pub api_base_url: String,
    /// Search language for the pictogram API
    pub pictogram_language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            api_base_url: "http://localhost:3000/api".to_string(),
            pictogram_language: "en".to_string(),
        }
    }
}

/// Main application state that holds all services.
#[derive(Clone)]
pub struct AppState {
    pub display_settings: DisplaySettingsService,
    pub symbol_library: SymbolLibraryService,
    pub parental_settings: ParentalSettingsService,
    pub session: SessionService,
    pub pictograms: PictogramClient,
    pub notices: Arc<NoticeHub>,
}

/// Initialize the persistence layer: open the store, build the services,
/// and hydrate everything that loads at boot.
pub async fn initialize_app(config: AppConfig) -> Result<AppState> {
    info!("Setting up local store");
    let connection = match &config.data_dir {
        Some(dir) => StoreConnection::new(dir)?,
        None => StoreConnection::new_default()?,
    };
    let store: Arc<dyn SettingsStore> = Arc::new(JsonFileStore::new(connection));

    info!("Setting up remote settings client");
    let settings_api = Arc::new(HttpSettingsApi::new(config.api_base_url.clone()));

    info!("Setting up domain services");
    let notices = Arc::new(NoticeHub::new());
    let display_settings = DisplaySettingsService::new(store.clone(), notices.clone())
        .with_remote(settings_api.clone());
    let symbol_library = SymbolLibraryService::new(store.clone(), notices.clone());
    let parental_settings =
        ParentalSettingsService::new(settings_api, store.clone(), notices.clone());
    let session = SessionService::new(store);
    let pictograms = PictogramClient::new(config.pictogram_language.clone());

    info!("Loading persisted state");
    display_settings.load().await;
    symbol_library.load().await;
    parental_settings.load().await;

    Ok(AppState {
        display_settings,
        symbol_library,
        parental_settings,
        session,
        pictograms,
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_app_with_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = initialize_app(AppConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        })
        .await
        .expect("Failed to initialize app");

        // Fresh install: defaults everywhere, empty library
        assert_eq!(
            state.display_settings.current(),
            crate::domain::models::DisplaySettings::default()
        );
        assert!(state.symbol_library.symbols().is_empty());
    }
}
