//! Service owning the device-local display settings.
//!
//! Lifecycle: created with defaults, hydrated once via [`load`], mutated
//! through discrete setters, persisted on a debounce timer, never deleted.
//! Setters apply in memory synchronously (the UI sees the change on its
//! next render) and schedule a flush; a burst of mutations produces exactly
//! one write containing the final state.
//!
//! When a remote appearance endpoint is configured the same flush also
//! pushes a minimal diff upstream, optimistic-style: the local change is
//! never rolled back, push failures surface as a notice, and the server's
//! returned snapshot becomes the new sync baseline.
//!
//! [`load`]: DisplaySettingsService::load

use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::debounce::{Debouncer, DEFAULT_FLUSH_DELAY};
use crate::domain::models::{ContrastMode, DisplaySettings, GridLayout, TextSize};
use crate::domain::notice::{Notice, NoticeHub, NoticeKind};
use crate::io::settings_api::AppearanceApi;
use crate::storage::{keys, SettingsStore};

/// Service for loading, mutating and persisting display settings.
#[derive(Clone)]
pub struct DisplaySettingsService {
    store: Arc<dyn SettingsStore>,
    remote: Option<Arc<dyn AppearanceApi>>,
    state: Arc<Mutex<DisplaySettings>>,
    /// Last snapshot the remote endpoint confirmed; diffs are computed
    /// against this
    remote_baseline: Arc<Mutex<DisplaySettings>>,
    loaded: Arc<AtomicBool>,
    debouncer: Arc<Debouncer>,
    notices: Arc<NoticeHub>,
}

impl DisplaySettingsService {
    /// Create a new service with the production flush delay.
    pub fn new(store: Arc<dyn SettingsStore>, notices: Arc<NoticeHub>) -> Self {
        Self::with_flush_delay(store, notices, DEFAULT_FLUSH_DELAY)
    }

    /// Create a new service with a custom flush delay (for testing).
    pub fn with_flush_delay(
        store: Arc<dyn SettingsStore>,
        notices: Arc<NoticeHub>,
        flush_delay: Duration,
    ) -> Self {
        Self {
            store,
            remote: None,
            state: Arc::new(Mutex::new(DisplaySettings::default())),
            remote_baseline: Arc::new(Mutex::new(DisplaySettings::default())),
            loaded: Arc::new(AtomicBool::new(false)),
            debouncer: Arc::new(Debouncer::new(flush_delay)),
            notices,
        }
    }

    /// Attach a remote appearance endpoint for optimistic sync.
    pub fn with_remote(mut self, remote: Arc<dyn AppearanceApi>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Hydrate from the durable store. Must complete before any flush runs,
    /// so a half-initialized state can never clobber stored settings.
    ///
    /// Never fails outright: a missing blob means first launch, a corrupt
    /// blob heals field-granularly to defaults.
    pub async fn load(&self) -> DisplaySettings {
        let settings = match self.store.read(keys::DISPLAY_SETTINGS).await {
            Ok(Some(raw)) => DisplaySettings::merge_stored(&raw),
            Ok(None) => {
                info!("No stored display settings found, starting from defaults");
                DisplaySettings::default()
            }
            Err(e) => {
                warn!("Failed to read stored display settings, using defaults: {:#}", e);
                DisplaySettings::default()
            }
        };

        *self.state.lock().unwrap() = settings.clone();
        *self.remote_baseline.lock().unwrap() = settings.clone();
        self.loaded.store(true, Ordering::SeqCst);
        info!("Display settings loaded");
        settings
    }

    /// Current in-memory settings snapshot.
    pub fn current(&self) -> DisplaySettings {
        self.state.lock().unwrap().clone()
    }

    pub fn set_brightness(&self, brightness: u8) {
        self.mutate(|s| s.brightness = brightness.min(100));
    }

    pub fn set_brightness_locked(&self, locked: bool) {
        self.mutate(|s| s.brightness_locked = locked);
    }

    pub fn set_text_size(&self, text_size: TextSize) {
        self.mutate(|s| s.text_size = text_size);
    }

    pub fn set_dark_mode_enabled(&self, enabled: bool) {
        self.mutate(|s| s.dark_mode_enabled = enabled);
    }

    pub fn set_contrast_mode(&self, mode: ContrastMode) {
        self.mutate(|s| s.contrast_mode = mode);
    }

    pub fn set_layout(&self, layout: GridLayout) {
        self.mutate(|s| s.layout = layout);
    }

    /// Replace local state with the server's snapshot and persist it
    /// immediately (no debounce; this is a deliberate refresh, not a burst).
    pub async fn sync_from_remote(&self) -> Result<DisplaySettings> {
        let Some(remote) = self.remote.clone() else {
            anyhow::bail!("No remote appearance endpoint configured");
        };

        match remote.fetch().await {
            Ok(server) => {
                *self.state.lock().unwrap() = server.clone();
                *self.remote_baseline.lock().unwrap() = server.clone();
                self.loaded.store(true, Ordering::SeqCst);
                if let Err(e) = self
                    .store
                    .write(keys::DISPLAY_SETTINGS, &server.to_stored())
                    .await
                {
                    error!("Failed to persist fetched display settings: {:#}", e);
                    self.notices.post(Notice::new(
                        NoticeKind::SaveFailed,
                        "Could not save your display settings",
                    ));
                }
                Ok(server)
            }
            Err(e) => {
                warn!("Appearance settings fetch failed: {:#}", e);
                self.notices.post(Notice::new(
                    NoticeKind::FetchFailed,
                    "Could not load display settings from the server",
                ));
                Err(e)
            }
        }
    }

    /// Cancel the pending timer and flush right now. Used on app shutdown.
    pub async fn flush_now(&self) {
        self.debouncer.cancel();
        Self::flush(
            self.store.clone(),
            self.remote.clone(),
            self.state.clone(),
            self.remote_baseline.clone(),
            self.notices.clone(),
        )
        .await;
    }

    fn mutate(&self, apply: impl FnOnce(&mut DisplaySettings)) {
        apply(&mut *self.state.lock().unwrap());
        self.schedule_flush();
    }

    fn schedule_flush(&self) {
        if !self.loaded.load(Ordering::SeqCst) {
            // Flushing defaults over a not-yet-loaded blob would lose data
            debug!("Mutation before initial load; flush deferred");
            return;
        }

        let store = self.store.clone();
        let remote = self.remote.clone();
        let state = self.state.clone();
        let baseline = self.remote_baseline.clone();
        let notices = self.notices.clone();
        self.debouncer
            .schedule(Self::flush(store, remote, state, baseline, notices));
    }

    async fn flush(
        store: Arc<dyn SettingsStore>,
        remote: Option<Arc<dyn AppearanceApi>>,
        state: Arc<Mutex<DisplaySettings>>,
        remote_baseline: Arc<Mutex<DisplaySettings>>,
        notices: Arc<NoticeHub>,
    ) {
        // Serialize at flush time so the write carries the latest mutation
        let snapshot = state.lock().unwrap().clone();

        if let Err(e) = store
            .write(keys::DISPLAY_SETTINGS, &snapshot.to_stored())
            .await
        {
            // In-memory state stays authoritative; the next mutation's
            // flush will retry naturally
            error!("Failed to persist display settings: {:#}", e);
            notices.post(Notice::new(
                NoticeKind::SaveFailed,
                "Could not save your display settings",
            ));
        }

        let Some(remote) = remote else {
            return;
        };
        let patch = {
            let baseline = remote_baseline.lock().unwrap();
            snapshot.diff(&baseline)
        };
        if patch.is_empty() {
            return;
        }

        match remote.update(&patch).await {
            Ok(server) => {
                *remote_baseline.lock().unwrap() = server.clone();
                // Adopt server normalization unless the user kept editing
                // while the request was in flight
                let mut state = state.lock().unwrap();
                if *state == snapshot {
                    *state = server;
                }
            }
            Err(e) => {
                warn!("Appearance settings push failed: {:#}", e);
                notices.post(Notice::new(
                    NoticeKind::SyncFailed,
                    "Could not sync display settings to the server",
                ));
            }
        }
    }
}
