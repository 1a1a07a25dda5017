// src/services/store.rs

//! Novel Store API client.
//!
//! ## Endpoints
//!
//! ```text
//! GET    /novels/all?name=&genre=   list with server-side filters
//! GET    /novels/{id}               single novel
//! GET    /novels?name=              novel or list, by name
//! POST   /novels                    create one
//! POST   /novels/bulk               create many (bulk import)
//! PATCH  /novels/{id}               partial update
//! ```
//!
//! Failures are surfaced as-is; there are no retries here.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Novel, NovelId, StoreConfig};
use crate::pipeline::reconcile::NovelPatch;
use crate::utils::http::{create_async_client, endpoint, with_query};

/// Envelope returned by `POST /novels`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "data")]
    pub novel: Option<Novel>,
}

/// Result of `POST /novels/bulk`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResponse {
    #[serde(default, alias = "count", alias = "inserted")]
    pub inserted_count: usize,
    #[serde(default)]
    pub message: String,
}

/// `GET /novels?name=` may answer with one record or several.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Novel>),
    One(Box<Novel>),
}

impl From<OneOrMany> for Vec<Novel> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(novels) => novels,
            OneOrMany::One(novel) => vec![*novel],
        }
    }
}

/// Operations the tracker needs from the Novel Store.
#[async_trait]
pub trait NovelStore: Send + Sync {
    /// List novels, optionally narrowed by name and genre on the server.
    async fn list(&self, name: Option<&str>, genre: Option<&str>) -> Result<Vec<Novel>>;

    /// Fetch a single novel by id.
    async fn get(&self, id: &NovelId) -> Result<Novel>;

    /// Look novels up by name.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Novel>>;

    /// Create one novel (manual add).
    async fn create(&self, novel: &Novel) -> Result<CreateResponse>;

    /// Create many novels (bulk import).
    async fn create_bulk(&self, novels: &[Novel]) -> Result<BulkResponse>;

    /// Apply a partial update and return the stored result.
    async fn update(&self, id: &NovelId, patch: &NovelPatch) -> Result<Novel>;
}

/// [`NovelStore`] over HTTP.
#[derive(Clone)]
pub struct HttpNovelStore {
    client: Client,
    base_url: Url,
}

impl HttpNovelStore {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Build a client and base URL from configuration.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(create_async_client(config)?, config.base_url()?))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.base_url, segments)
    }

    /// Decode a success body, or turn an error status into [`AppError::Api`].
    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::api(status.as_u16(), error_message(&body, status.canonical_reason())))
    }
}

/// Best human-readable message from an error body.
fn error_message(body: &str, reason: Option<&str>) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(str::to_string))
        });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => reason.unwrap_or("request failed").to_string(),
    }
}

#[async_trait]
impl NovelStore for HttpNovelStore {
    async fn list(&self, name: Option<&str>, genre: Option<&str>) -> Result<Vec<Novel>> {
        let url = with_query(self.url(&["novels", "all"])?, &[("name", name), ("genre", genre)]);
        log::info!("GET {}", url);
        Self::read(self.client.get(url).send().await?).await
    }

    async fn get(&self, id: &NovelId) -> Result<Novel> {
        let url = self.url(&["novels", &id.to_string()])?;
        log::info!("GET {}", url);
        Self::read(self.client.get(url).send().await?).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Novel>> {
        let url = with_query(self.url(&["novels"])?, &[("name", Some(name))]);
        log::info!("GET {}", url);
        let found: OneOrMany = Self::read(self.client.get(url).send().await?).await?;
        Ok(found.into())
    }

    async fn create(&self, novel: &Novel) -> Result<CreateResponse> {
        let url = self.url(&["novels"])?;
        log::info!("POST {} ({})", url, novel.name);
        Self::read(self.client.post(url).json(novel).send().await?).await
    }

    async fn create_bulk(&self, novels: &[Novel]) -> Result<BulkResponse> {
        let url = self.url(&["novels", "bulk"])?;
        log::info!("POST {} ({} novels)", url, novels.len());
        Self::read(self.client.post(url).json(novels).send().await?).await
    }

    async fn update(&self, id: &NovelId, patch: &NovelPatch) -> Result<Novel> {
        let url = self.url(&["novels", &id.to_string()])?;
        log::info!("PATCH {}", url);
        Self::read(self.client.patch(url).json(patch).send().await?).await
    }
}
