//! Remote settings API client.
//!
//! The device consumes (never implements) two endpoint pairs:
//! `GET`/`PATCH /appearance-settings` and `GET`/`PATCH /parental-settings`.
//! Both follow the same contract: `PATCH` takes a partial payload of only
//! the changed fields and returns the full, authoritative snapshot, which
//! callers must adopt verbatim to absorb server-side normalization.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::domain::models::{
    DisplaySettings, DisplaySettingsPatch, ParentalSettings, ParentalSettingsPatch,
};
use crate::io::mappers::{AppearanceMapper, ParentalMapper};
use shared::{AppearanceSettingsDto, ParentalSettingsDto};

/// Remote interface for the appearance settings record.
#[async_trait]
pub trait AppearanceApi: Send + Sync {
    /// Fetch the current server-side snapshot.
    async fn fetch(&self) -> Result<DisplaySettings>;

    /// Send a partial update; returns the authoritative snapshot.
    async fn update(&self, patch: &DisplaySettingsPatch) -> Result<DisplaySettings>;
}

/// Remote interface for the parental settings record.
#[async_trait]
pub trait ParentalApi: Send + Sync {
    /// Fetch the current server-side snapshot.
    async fn fetch(&self) -> Result<ParentalSettings>;

    /// Send a partial update; returns the authoritative snapshot.
    async fn update(&self, patch: &ParentalSettingsPatch) -> Result<ParentalSettings>;
}

/// HTTP implementation of both settings endpoints.
#[derive(Clone)]
pub struct HttpSettingsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSettingsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl AppearanceApi for HttpSettingsApi {
    async fn fetch(&self) -> Result<DisplaySettings> {
        let dto: AppearanceSettingsDto = self
            .client
            .get(self.url("appearance-settings"))
            .send()
            .await
            .context("Failed to fetch appearance settings")?
            .error_for_status()
            .context("Appearance settings fetch was rejected")?
            .json()
            .await
            .context("Failed to parse appearance settings response")?;
        Ok(AppearanceMapper::to_domain(dto))
    }

    async fn update(&self, patch: &DisplaySettingsPatch) -> Result<DisplaySettings> {
        let payload = AppearanceMapper::patch_to_dto(patch);
        let dto: AppearanceSettingsDto = self
            .client
            .patch(self.url("appearance-settings"))
            .json(&payload)
            .send()
            .await
            .context("Failed to update appearance settings")?
            .error_for_status()
            .context("Appearance settings update was rejected")?
            .json()
            .await
            .context("Failed to parse appearance settings response")?;
        Ok(AppearanceMapper::to_domain(dto))
    }
}

#[async_trait]
impl ParentalApi for HttpSettingsApi {
    async fn fetch(&self) -> Result<ParentalSettings> {
        let dto: ParentalSettingsDto = self
            .client
            .get(self.url("parental-settings"))
            .send()
            .await
            .context("Failed to fetch parental settings")?
            .error_for_status()
            .context("Parental settings fetch was rejected")?
            .json()
            .await
            .context("Failed to parse parental settings response")?;
        Ok(ParentalMapper::to_domain(dto))
    }

    async fn update(&self, patch: &ParentalSettingsPatch) -> Result<ParentalSettings> {
        let payload = ParentalMapper::patch_to_dto(patch);
        let dto: ParentalSettingsDto = self
            .client
            .patch(self.url("parental-settings"))
            .json(&payload)
            .send()
            .await
            .context("Failed to update parental settings")?
            .error_for_status()
            .context("Parental settings update was rejected")?
            .json()
            .await
            .context("Failed to parse parental settings response")?;
        Ok(ParentalMapper::to_domain(dto))
    }
}
