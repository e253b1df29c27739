//! ARASAAC pictogram search client.
//!
//! `GET https://api.arasaac.org/api/pictograms/<lang>/search/<term>` returns
//! an array of `{ _id, keywords: [{keyword}] }`; this client maps each hit
//! to a [`Pictogram`] with the image URL templated from the numeric id.
//!
//! Search boxes fire as the user types, so stale-response races matter:
//! each call supersedes the previous one. A superseded in-flight request is
//! aborted, and even a response that slips through is dropped unless its
//! request is still the latest (generation counter). Callers therefore see
//! `Ok(None)` for "superseded, ignore me" and results only for the newest
//! term.

use anyhow::{Context, Result};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::AbortHandle;

use shared::{ArasaacPictogram, Pictogram};

const DEFAULT_BASE_URL: &str = "https://api.arasaac.org/api";
const STATIC_IMAGE_BASE: &str = "https://static.arasaac.org/pictograms";

/// Search client for the third-party pictogram API.
#[derive(Clone)]
pub struct PictogramClient {
    client: reqwest::Client,
    base_url: String,
    language: String,
    generation: Arc<AtomicU64>,
    in_flight: Arc<Mutex<Option<AbortHandle>>>,
}

impl PictogramClient {
    /// Create a client for the given search language ("en", "es", ...).
    pub fn new(language: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, language)
    }

    /// Create a client against a non-default endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// Search for pictograms matching `term`.
    ///
    /// Returns `Ok(None)` when this search was superseded by a newer one
    /// before its response arrived; only the latest request started ever
    /// yields `Ok(Some(..))`.
    pub async fn search(&self, term: &str) -> Result<Option<Vec<Pictogram>>> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut url = reqwest::Url::parse(&format!("{}/", self.base_url))
            .context("Invalid pictogram API base URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Pictogram API base URL cannot carry paths"))?
            .push("pictograms")
            .push(&self.language)
            .push("search")
            .push(term.trim());

        let client = self.client.clone();
        let request = tokio::spawn(async move {
            client
                .get(url)
                .send()
                .await
                .context("Pictogram search request failed")?
                .error_for_status()
                .context("Pictogram search was rejected")?
                .json::<Vec<ArasaacPictogram>>()
                .await
                .context("Failed to parse pictogram search response")
        });

        // Abort whichever request this one supersedes
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if let Some(previous) = in_flight.replace(request.abort_handle()) {
                previous.abort();
            }
        }

        let term = term.to_string();
        let wire = match request.await {
            Ok(result) => result?,
            Err(join_error) if join_error.is_cancelled() => {
                debug!("Pictogram search for '{}' superseded before completion", term);
                return Ok(None);
            }
            Err(join_error) => return Err(join_error.into()),
        };

        if self.generation.load(Ordering::SeqCst) != my_generation {
            debug!("Dropping stale pictogram results for '{}'", term);
            return Ok(None);
        }

        let pictograms = wire
            .into_iter()
            .map(|hit| map_pictogram(hit, &term))
            .collect();
        Ok(Some(pictograms))
    }
}

fn map_pictogram(hit: ArasaacPictogram, fallback_keyword: &str) -> Pictogram {
    let keyword = hit
        .keywords
        .first()
        .map(|entry| entry.keyword.clone())
        .unwrap_or_else(|| fallback_keyword.to_string());

    Pictogram {
        id: hit.id,
        keyword,
        pictogram_url: format!("{}/{}/{}_300.png", STATIC_IMAGE_BASE, hit.id, hit.id),
    }
}
