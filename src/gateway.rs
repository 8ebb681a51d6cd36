// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Persistence gateway - where submitted shots and storyboards go
//!
//! [`RestGateway`] talks to a PostgREST-style table (`/rest/v1/<table>`)
//! and an object store (`/storage/v1/object/<bucket>/<key>`), the layout a
//! hosted Supabase project exposes. [`MemoryGateway`] keeps everything in
//! process and can be told to fail, for tests and offline sessions.

use crate::config::GatewayConfig;
use crate::error::{PersistenceError, UploadError};
use crate::types::{ShotRecord, StoredShot, StoryboardFile};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

/// The remote side of shot submission
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Append one shot row
    async fn insert(&self, record: &ShotRecord) -> Result<(), PersistenceError>;

    /// Store a storyboard and return a URL it can be fetched from
    async fn upload(&self, file: &StoryboardFile) -> Result<String, UploadError>;

    /// Every stored shot, oldest first
    async fn list(&self) -> Result<Vec<StoredShot>, PersistenceError>;
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Arc<G> {
    async fn insert(&self, record: &ShotRecord) -> Result<(), PersistenceError> {
        (**self).insert(record).await
    }

    async fn upload(&self, file: &StoryboardFile) -> Result<String, UploadError> {
        (**self).upload(file).await
    }

    async fn list(&self) -> Result<Vec<StoredShot>, PersistenceError> {
        (**self).list().await
    }
}

// =============================================================================
// REST gateway
// =============================================================================

/// HTTP client for the hosted shot table and storyboard bucket
#[derive(Clone)]
pub struct RestGateway {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    table: String,
    bucket: String,
}

impl RestGateway {
    /// Build a client from configuration. Fails if no URL is configured.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No gateway URL configured. Set gateway.url in config.toml or SHOTLOG_GATEWAY__URL"
                )
            })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(concat!("shotlog/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
            bucket: config.bucket.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    /// Public URL of a stored storyboard object
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, self.bucket, key)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn failure_body(response: Response) -> (u16, String) {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        (status, body)
    }
}

#[async_trait]
impl PersistenceGateway for RestGateway {
    async fn insert(&self, record: &ShotRecord) -> Result<(), PersistenceError> {
        let url = self.table_url();
        debug!(%url, scene = %record.scene(), shot = %record.shot(), "Inserting shot row");

        let response = self
            .authorize(self.http.post(&url))
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        let (status, body) = Self::failure_body(response).await;
        warn!(status, %body, "Shot insert rejected");
        Err(PersistenceError::from_http_status(status, body))
    }

    async fn upload(&self, file: &StoryboardFile) -> Result<String, UploadError> {
        let key = file.object_key();
        let url = self.object_url(&key);
        debug!(%url, bytes = file.bytes.len(), content_type = %file.content_type, "Uploading storyboard");

        let response = self
            .authorize(self.http.post(&url))
            .header(reqwest::header::CONTENT_TYPE, file.content_type.as_str())
            .header("x-upsert", "true")
            .body(file.bytes.clone())
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(self.public_url(&key));
        }
        let (status, body) = Self::failure_body(response).await;
        warn!(status, %body, "Storyboard upload rejected");
        Err(UploadError::from_http_status(status, body))
    }

    async fn list(&self) -> Result<Vec<StoredShot>, PersistenceError> {
        let url = self.table_url();
        debug!(%url, "Listing shot rows");

        let response = self
            .authorize(self.http.get(&url))
            .query(&[("select", "*"), ("order", "id.asc")])
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = Self::failure_body(response).await;
            return Err(PersistenceError::from_http_status(status, body));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

// =============================================================================
// In-memory gateway
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<ShotRecord>,
    objects: Vec<(String, usize)>,
    insert_calls: usize,
    upload_calls: usize,
    fail_inserts: Option<String>,
    fail_uploads: Option<String>,
}

/// Gateway that keeps rows and uploads in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryGateway {
    /// Empty gateway that accepts everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means a test thread panicked mid-call
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Make every insert fail with `reason` until [`Self::recover`]
    pub fn fail_inserts(&self, reason: impl Into<String>) {
        self.state().fail_inserts = Some(reason.into());
    }

    /// Make every upload fail with `reason` until [`Self::recover`]
    pub fn fail_uploads(&self, reason: impl Into<String>) {
        self.state().fail_uploads = Some(reason.into());
    }

    /// Stop injecting failures
    pub fn recover(&self) {
        let mut state = self.state();
        state.fail_inserts = None;
        state.fail_uploads = None;
    }

    /// Rows accepted so far
    #[must_use]
    pub fn rows(&self) -> Vec<ShotRecord> {
        self.state().rows.clone()
    }

    /// Insert attempts, including failed ones
    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.state().insert_calls
    }

    /// Upload attempts, including failed ones
    #[must_use]
    pub fn upload_calls(&self) -> usize {
        self.state().upload_calls
    }

    /// Keys of stored objects
    #[must_use]
    pub fn object_keys(&self) -> Vec<String> {
        self.state().objects.iter().map(|(k, _)| k.clone()).collect()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn insert(&self, record: &ShotRecord) -> Result<(), PersistenceError> {
        let mut state = self.state();
        state.insert_calls += 1;
        if let Some(reason) = &state.fail_inserts {
            return Err(PersistenceError::Rejected(reason.clone()));
        }
        state.rows.push(record.clone());
        Ok(())
    }

    async fn upload(&self, file: &StoryboardFile) -> Result<String, UploadError> {
        let mut state = self.state();
        state.upload_calls += 1;
        if let Some(reason) = &state.fail_uploads {
            return Err(UploadError::Rejected(reason.clone()));
        }
        let key = file.object_key();
        if !state.objects.iter().any(|(k, _)| *k == key) {
            state.objects.push((key.clone(), file.bytes.len()));
        }
        Ok(format!("memory://storyboards/{key}"))
    }

    async fn list(&self) -> Result<Vec<StoredShot>, PersistenceError> {
        let state = self.state();
        Ok(state
            .rows
            .iter()
            .zip(1_i64..)
            .map(|(record, id)| StoredShot {
                id: Some(id),
                created_at: None,
                record: record.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_gateway_requires_url() {
        let err = RestGateway::from_config(&GatewayConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("No gateway URL configured"));
    }

    #[test]
    fn test_rest_gateway_urls() {
        let config = GatewayConfig {
            url: Some("https://demo.supabase.co/".into()),
            ..GatewayConfig::default()
        };
        let gateway = RestGateway::from_config(&config).unwrap();
        assert_eq!(gateway.table_url(), "https://demo.supabase.co/rest/v1/film_shots");
        assert_eq!(
            gateway.public_url("abc-board.png"),
            "https://demo.supabase.co/storage/v1/object/public/storyboards/abc-board.png"
        );
    }

    #[tokio::test]
    async fn test_memory_gateway_upload_failure_injection() {
        let gateway = MemoryGateway::new();
        let file = StoryboardFile::new("a.png", vec![0; 4]);

        gateway.fail_uploads("bucket full");
        let err = gateway.upload(&file).await.unwrap_err();
        assert!(err.to_string().contains("bucket full"));
        assert!(gateway.object_keys().is_empty());

        gateway.recover();
        let url = gateway.upload(&file).await.unwrap();
        assert!(url.starts_with("memory://storyboards/"));
        gateway.upload(&file).await.unwrap();
        assert_eq!(gateway.object_keys().len(), 1);
        assert_eq!(gateway.upload_calls(), 3);
    }
}
