//! Service for the signed-in user's session data.
//!
//! Holds the auth token, the cached user profile and per-user avatar URIs,
//! each under its own store key (`userToken`, `userData`,
//! `userAvatarUri:<userId>`). These writes are rare and deliberate, so they
//! go to the store immediately with no debounce.

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use crate::storage::{keys, SettingsStore};
use shared::UserProfile;

/// Service for token, profile and avatar persistence.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SettingsStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    pub async fn set_token(&self, token: &str) -> Result<()> {
        self.store.write(keys::USER_TOKEN, token).await
    }

    pub async fn token(&self) -> Result<Option<String>> {
        self.store.read(keys::USER_TOKEN).await
    }

    pub async fn set_user_profile(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string(profile).context("Failed to serialize user profile")?;
        self.store.write(keys::USER_DATA, &json).await
    }

    /// Read the cached profile. A corrupt blob reads as absent (logged),
    /// the same self-healing posture as the settings blobs.
    pub async fn user_profile(&self) -> Result<Option<UserProfile>> {
        let Some(raw) = self.store.read(keys::USER_DATA).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                log::warn!("Stored user profile is corrupt, treating as absent: {}", e);
                Ok(None)
            }
        }
    }

    /// Store the local avatar file URI for one user.
    pub async fn set_avatar_uri(&self, user_id: &str, uri: &str) -> Result<()> {
        self.store.write(&keys::user_avatar(user_id), uri).await
    }

    pub async fn avatar_uri(&self, user_id: &str) -> Result<Option<String>> {
        self.store.read(&keys::user_avatar(user_id)).await
    }

    /// Clear token and profile. Avatars stay; they belong to the device,
    /// not the session.
    pub async fn sign_out(&self) -> Result<()> {
        self.store.remove(keys::USER_TOKEN).await?;
        self.store.remove(keys::USER_DATA).await?;
        info!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn setup_test() -> (MemoryStore, SessionService) {
        let store = MemoryStore::new();
        (store.clone(), SessionService::new(Arc::new(store)))
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let (_store, service) = setup_test();
        assert!(service.token().await.unwrap().is_none());

        service.set_token("tok_abc").await.unwrap();
        assert_eq!(service.token().await.unwrap().as_deref(), Some("tok_abc"));
    }

    #[tokio::test]
    async fn test_profile_round_trip_and_corruption() {
        let (store, service) = setup_test();
        let profile = UserProfile {
            id: "u1".to_string(),
            name: "Jordan".to_string(),
            email: Some("jordan@example.com".to_string()),
        };
        service.set_user_profile(&profile).await.unwrap();
        assert_eq!(service.user_profile().await.unwrap(), Some(profile));

        store.seed(keys::USER_DATA, "{broken");
        assert_eq!(service.user_profile().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_avatars_are_per_user_and_survive_sign_out() {
        let (_store, service) = setup_test();
        service.set_avatar_uri("u1", "file:///a.png").await.unwrap();
        service.set_avatar_uri("u2", "file:///b.png").await.unwrap();
        service.set_token("tok").await.unwrap();

        service.sign_out().await.unwrap();
        assert!(service.token().await.unwrap().is_none());
        assert_eq!(
            service.avatar_uri("u1").await.unwrap().as_deref(),
            Some("file:///a.png")
        );
        assert_eq!(
            service.avatar_uri("u2").await.unwrap().as_deref(),
            Some("file:///b.png")
        );
    }
}
