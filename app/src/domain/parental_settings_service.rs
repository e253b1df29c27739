//! Optimistic sync service for parental settings.
//!
//! The parental record is owned by the remote service. This service keeps
//! the device-side cache and drives the edit/save cycle around an explicit
//! three-state wrapper:
//!
//! - **Clean(snapshot)** — local view equals the last-fetched baseline
//! - **Dirty{local, baseline}** — local edits pending; `has_changed` is the
//!   deep inequality between the two
//! - **Saving{local, baseline}** — a minimal diff is in flight
//!
//! `save` sends only fields that differ from the baseline and, on success,
//! re-baselines from the **server's returned object** (never the sent
//! diff), absorbing any server-side normalization. Failures surface as
//! notices and leave the state Dirty for a manual retry; nothing is ever
//! rolled back automatically, and there is no autosave-on-exit — leaving
//! the screen with unsaved changes requires an explicit discard.

use anyhow::Result;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::commands::parental::SetPasscodeCommand;
use crate::domain::models::parental_settings::validate_notify_email;
use crate::domain::models::{AsdLevel, ParentalSettings, Weekday};
use crate::domain::notice::{Notice, NoticeHub, NoticeKind};
use crate::io::settings_api::ParentalApi;
use crate::storage::{keys, SettingsStore};

/// Sync status of the cached parental record.
#[derive(Debug, Clone)]
enum SyncState {
    Clean(ParentalSettings),
    Dirty {
        local: ParentalSettings,
        baseline: ParentalSettings,
    },
    Saving {
        local: ParentalSettings,
        baseline: ParentalSettings,
    },
}

/// Validation errors for the passcode form.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasscodeValidationError {
    #[error("Passcode must be 4 to 8 digits")]
    InvalidLength,
    #[error("Passcode must contain digits only")]
    NotNumeric,
    #[error("Passcodes do not match")]
    Mismatch,
    #[error("Set a passcode before requiring it")]
    NotEstablished,
}

/// Raised by [`ParentalSettingsService::close`] while edits are unsaved.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("There are unsaved changes; save them or discard them first")]
pub struct UnsavedChanges;

/// Service for fetching, editing and saving one child's parental settings.
#[derive(Clone)]
pub struct ParentalSettingsService {
    api: Arc<dyn ParentalApi>,
    store: Arc<dyn SettingsStore>,
    state: Arc<Mutex<Option<SyncState>>>,
    /// Best-effort snapshot for the fetch-failure fallback
    last_known: Arc<Mutex<Option<ParentalSettings>>>,
    passcode_established: Arc<AtomicBool>,
    loading: Arc<AtomicBool>,
    notices: Arc<NoticeHub>,
}

impl ParentalSettingsService {
    pub fn new(
        api: Arc<dyn ParentalApi>,
        store: Arc<dyn SettingsStore>,
        notices: Arc<NoticeHub>,
    ) -> Self {
        Self {
            api,
            store,
            state: Arc::new(Mutex::new(None)),
            last_known: Arc::new(Mutex::new(None)),
            passcode_established: Arc::new(AtomicBool::new(false)),
            loading: Arc::new(AtomicBool::new(false)),
            notices,
        }
    }

    /// Restore locally persisted facts (whether a passcode exists).
    pub async fn load(&self) {
        match self.store.read(keys::PARENTAL_PASSCODE).await {
            Ok(Some(_)) => self.passcode_established.store(true, Ordering::SeqCst),
            Ok(None) => {}
            Err(e) => warn!("Failed to read stored passcode marker: {:#}", e),
        }
    }

    /// Fetch the authoritative record when the settings screen opens.
    ///
    /// On failure the last known snapshot (or defaults) is substituted so
    /// the screen stays usable; the error is still returned for alerting.
    pub async fn fetch(&self) -> Result<ParentalSettings> {
        self.loading.store(true, Ordering::SeqCst);
        let result = self.api.fetch().await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(snapshot) => {
                *self.state.lock().unwrap() = Some(SyncState::Clean(snapshot.clone()));
                *self.last_known.lock().unwrap() = Some(snapshot.clone());
                info!("Parental settings fetched");
                Ok(snapshot)
            }
            Err(e) => {
                let fallback = self
                    .last_known
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_default();
                *self.state.lock().unwrap() = Some(SyncState::Clean(fallback));
                warn!("Parental settings fetch failed, using local fallback: {:#}", e);
                self.notices.post(Notice::new(
                    NoticeKind::FetchFailed,
                    "Could not load parental settings from the server",
                ));
                Err(e)
            }
        }
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Whether a save is in flight.
    pub fn is_saving(&self) -> bool {
        matches!(
            self.state.lock().unwrap().as_ref(),
            Some(SyncState::Saving { .. })
        )
    }

    /// The local view being edited, if the screen has been opened.
    pub fn current(&self) -> Option<ParentalSettings> {
        self.state.lock().unwrap().as_ref().map(|state| match state {
            SyncState::Clean(snapshot) => snapshot.clone(),
            SyncState::Dirty { local, .. } | SyncState::Saving { local, .. } => local.clone(),
        })
    }

    /// Deep inequality between the local view and the fetched baseline.
    pub fn has_changed(&self) -> bool {
        match self.state.lock().unwrap().as_ref() {
            Some(SyncState::Dirty { local, baseline })
            | Some(SyncState::Saving { local, baseline }) => local != baseline,
            _ => false,
        }
    }

    pub fn set_asd_level(&self, level: Option<AsdLevel>) -> Result<()> {
        self.edit(|s| s.asd_level = level)
    }

    pub fn set_block_inappropriate(&self, value: bool) -> Result<()> {
        self.edit(|s| s.block_inappropriate = value)
    }

    pub fn set_block_violence(&self, value: bool) -> Result<()> {
        self.edit(|s| s.block_violence = value)
    }

    pub fn set_data_sharing_preference(&self, value: bool) -> Result<()> {
        self.edit(|s| s.data_sharing_preference = value)
    }

    pub fn set_downtime_enabled(&self, value: bool) -> Result<()> {
        self.edit(|s| s.downtime_enabled = value)
    }

    /// Kept as a string on purpose; the edit field would fight the user if
    /// the model round-tripped through an integer (leading zeros, empty
    /// while typing).
    pub fn set_daily_limit_hours(&self, value: &str) -> Result<()> {
        let value = value.trim().to_string();
        self.edit(|s| s.daily_limit_hours = value)
    }

    pub fn toggle_downtime_day(&self, day: Weekday) -> Result<()> {
        self.edit(|s| {
            if !s.downtime_days.remove(&day) {
                s.downtime_days.insert(day);
            }
        })
    }

    pub fn set_downtime_window(&self, start: &str, end: &str) -> Result<()> {
        let start = start.to_string();
        let end = end.to_string();
        self.edit(|s| {
            s.downtime_start = start;
            s.downtime_end = end;
        })
    }

    /// Append a notification email after validating format and
    /// case-insensitive uniqueness. Rejection mutates nothing.
    pub fn add_notify_email(&self, email: &str) -> Result<()> {
        let email = email.trim().to_string();
        {
            let state = self.state.lock().unwrap();
            let existing = match state.as_ref() {
                Some(SyncState::Clean(s)) => &s.notify_emails,
                Some(SyncState::Dirty { local, .. }) | Some(SyncState::Saving { local, .. }) => {
                    &local.notify_emails
                }
                None => anyhow::bail!("Parental settings have not been fetched"),
            };
            validate_notify_email(&email, existing)?;
        }
        self.edit(|s| s.notify_emails.push(email))
    }

    pub fn remove_notify_email(&self, email: &str) -> Result<()> {
        let lowered = email.to_lowercase();
        self.edit(|s| s.notify_emails.retain(|e| e.to_lowercase() != lowered))
    }

    /// Turning the passcode requirement on demands an established passcode;
    /// the remote service does not enforce this, the device boundary does.
    pub fn set_require_passcode(&self, value: bool) -> Result<()> {
        if value && !self.passcode_established.load(Ordering::SeqCst) {
            return Err(PasscodeValidationError::NotEstablished.into());
        }
        self.edit(|s| s.require_passcode = value)
    }

    /// Establish (or replace) the parental passcode.
    pub async fn set_passcode(&self, command: SetPasscodeCommand) -> Result<()> {
        let passcode = command.passcode.trim();
        if !(4..=8).contains(&passcode.chars().count()) {
            return Err(PasscodeValidationError::InvalidLength.into());
        }
        if !passcode.chars().all(|c| c.is_ascii_digit()) {
            return Err(PasscodeValidationError::NotNumeric.into());
        }
        if passcode != command.confirmation.trim() {
            return Err(PasscodeValidationError::Mismatch.into());
        }

        self.passcode_established.store(true, Ordering::SeqCst);
        if let Err(e) = self.store.write(keys::PARENTAL_PASSCODE, passcode).await {
            // The passcode still works for this session; only persistence
            // failed
            log::error!("Failed to persist passcode: {:#}", e);
            self.notices.post(Notice::new(
                NoticeKind::SaveFailed,
                "Could not save the passcode",
            ));
        }
        Ok(())
    }

    /// Verify an entered passcode against the stored one.
    pub async fn verify_passcode(&self, attempt: &str) -> Result<bool> {
        let stored = self.store.read(keys::PARENTAL_PASSCODE).await?;
        Ok(stored.as_deref() == Some(attempt.trim()))
    }

    /// Push pending edits as a minimal diff. No-op when clean.
    pub async fn save(&self) -> Result<ParentalSettings> {
        let (local, baseline) = {
            let mut state = self.state.lock().unwrap();
            match state.take() {
                None => anyhow::bail!("Parental settings have not been fetched"),
                Some(SyncState::Clean(snapshot)) => {
                    *state = Some(SyncState::Clean(snapshot.clone()));
                    return Ok(snapshot);
                }
                Some(SyncState::Saving { local, baseline }) => {
                    *state = Some(SyncState::Saving { local, baseline });
                    anyhow::bail!("A save is already in progress");
                }
                Some(SyncState::Dirty { local, baseline }) => {
                    *state = Some(SyncState::Saving {
                        local: local.clone(),
                        baseline: baseline.clone(),
                    });
                    (local, baseline)
                }
            }
        };

        let patch = local.diff(&baseline);
        match self.api.update(&patch).await {
            Ok(server) => {
                {
                    let mut state = self.state.lock().unwrap();
                    let next = match state.take() {
                        Some(SyncState::Saving { local: latest, .. }) if latest == local => {
                            SyncState::Clean(server.clone())
                        }
                        // Edits arrived while the request was in flight;
                        // they stay pending on top of the fresh baseline
                        Some(SyncState::Saving { local: latest, .. }) => SyncState::Dirty {
                            local: latest,
                            baseline: server.clone(),
                        },
                        Some(other) => other,
                        None => SyncState::Clean(server.clone()),
                    };
                    *state = Some(next);
                }
                *self.last_known.lock().unwrap() = Some(server.clone());
                info!("Parental settings saved");
                Ok(server)
            }
            Err(e) => {
                {
                    let mut state = self.state.lock().unwrap();
                    if let Some(SyncState::Saving { local, baseline }) = state.take() {
                        *state = Some(SyncState::Dirty { local, baseline });
                    }
                }
                warn!("Parental settings save failed: {:#}", e);
                self.notices.post(Notice::new(
                    NoticeKind::SyncFailed,
                    "Could not save parental settings",
                ));
                Err(e)
            }
        }
    }

    /// Throw away local edits and return to the fetched baseline.
    pub fn discard_changes(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(current) = state.take() {
            *state = Some(match current {
                SyncState::Dirty { baseline, .. } => SyncState::Clean(baseline),
                other => other,
            });
        }
    }

    /// Guard for leaving the editing screen: fails while edits are unsaved
    /// so the UI can prompt for an explicit discard.
    pub fn close(&self) -> Result<(), UnsavedChanges> {
        if self.has_changed() {
            return Err(UnsavedChanges);
        }
        Ok(())
    }

    fn edit(&self, apply: impl FnOnce(&mut ParentalSettings)) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let next = match state.take() {
            None => anyhow::bail!("Parental settings have not been fetched"),
            Some(SyncState::Clean(baseline)) => {
                let mut local = baseline.clone();
                apply(&mut local);
                if local == baseline {
                    SyncState::Clean(baseline)
                } else {
                    SyncState::Dirty { local, baseline }
                }
            }
            Some(SyncState::Dirty { mut local, baseline }) => {
                apply(&mut local);
                if local == baseline {
                    SyncState::Clean(baseline)
                } else {
                    SyncState::Dirty { local, baseline }
                }
            }
            Some(SyncState::Saving { mut local, baseline }) => {
                apply(&mut local);
                SyncState::Saving { local, baseline }
            }
        };
        *state = Some(next);
        Ok(())
    }
}
