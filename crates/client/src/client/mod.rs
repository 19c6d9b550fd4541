//! HTTP client for the lessonbook API.
//!
//! GET responses are kept in a short-lived [`MemoryCache`] and identical
//! in-flight GETs share a single round trip. Every successful mutation
//! clears the cache, since one write can change several listings (stats,
//! exports, cascaded deletes). Mutations also advance a generation counter:
//! a GET started before the mutation neither populates the cache nor is
//! joined by later callers.

pub mod notes;
pub mod settings;
pub mod songs;
pub mod stats;
pub mod students;
pub mod transfer;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use reqwest::{IntoUrl, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use lessonbook_core::cache::{Cache, CacheExt, MemoryCache};

use crate::error::{envelope_message, ClientError, Result};

/// Server used when `LESSONBOOK_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a GET response is reused.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

type SharedGet = Shared<BoxFuture<'static, std::result::Result<Value, Arc<ClientError>>>>;

/// HTTP client for the lessonbook API.
#[derive(Clone)]
pub struct LessonbookClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    cache: Arc<MemoryCache>,
    generation: Arc<Mutex<u64>>,
    in_flight: Arc<Mutex<HashMap<String, (u64, SharedGet)>>>,
}

impl fmt::Debug for LessonbookClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonbookClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl LessonbookClient {
    /// Create a new client with the given base URL and its own response cache.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_cache(base_url, Arc::new(MemoryCache::new(DEFAULT_CACHE_TTL)))
    }

    /// Create a client that stores GET responses in `cache`.
    pub fn with_cache(base_url: impl Into<String>, cache: Arc<MemoryCache>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache,
            generation: Arc::new(Mutex::new(0)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create from environment (LESSONBOOK_URL or default).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("LESSONBOOK_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The GET response cache.
    pub fn cache(&self) -> &Arc<MemoryCache> {
        &self.cache
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a URL whose last segment is arbitrary user text.
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.url(path))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(segment);
        Ok(url)
    }

    /// Sends a request and turns error statuses into [`ClientError::Api`].
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.timeout(self.timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout)
            } else {
                ClientError::from(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope_message(&body),
        })
    }

    /// Cached, deduplicated GET.
    ///
    /// Concurrent calls for the same path await one shared request and see
    /// the same result, success or failure. Only successes are cached.
    pub(crate) async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T> {
        let key = format!("GET {path}");

        match self.cache.get_json::<T>(&key).await {
            Ok(Some(value)) => {
                tracing::trace!(%key, "Client cache hit");
                return Ok(value);
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(%key, error = %err, "Client cache read failed"),
        }

        let shared = {
            let generation = *self.generation.lock().await;
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&key) {
                Some((started, pending)) if *started == generation => {
                    tracing::trace!(%key, "Joining in-flight request");
                    pending.clone()
                }
                _ => {
                    let pending = self
                        .clone()
                        .fetch_shared(key.clone(), path.to_string(), generation)
                        .boxed()
                        .shared();
                    in_flight.insert(key, (generation, pending.clone()));
                    pending
                }
            }
        };

        let value = shared.await.map_err(ClientError::Shared)?;
        Ok(serde_json::from_value(value)?)
    }

    /// The body of a shared GET. Populates the cache before leaving the
    /// in-flight table so later callers hit the cache instead. Nothing is
    /// cached if a mutation finished after `seen` was taken.
    async fn fetch_shared(
        self,
        key: String,
        path: String,
        seen: u64,
    ) -> std::result::Result<Value, Arc<ClientError>> {
        let result = self.fetch_value(&path).await;

        if let Ok(value) = &result {
            let generation = self.generation.lock().await;
            if *generation != seen {
                tracing::trace!(%key, "Response predates a mutation, not caching");
            } else if let Err(err) = self.cache.set_json(&key, value, None).await {
                tracing::warn!(%key, error = %err, "Failed to populate client cache");
            }
        }

        let mut in_flight = self.in_flight.lock().await;
        if matches!(in_flight.get(&key), Some((started, _)) if *started == seen) {
            in_flight.remove(&key);
        }
        drop(in_flight);

        result.map_err(Arc::new)
    }

    async fn fetch_value(&self, path: &str) -> Result<Value> {
        tracing::debug!(path, "GET");
        let response = self.execute(self.http.get(self.url(path))).await?;
        decode(response).await
    }

    /// Sends a mutation and clears the response cache on success.
    async fn mutate<U, B, T>(&self, method: Method, url: U, body: Option<&B>) -> Result<T>
    where
        U: IntoUrl,
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(%method, "Mutation");
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.execute(request).await?;
        self.clear_cache().await;
        decode(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.mutate(Method::POST, self.url(path), Some(body)).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.mutate(Method::PUT, self.url(path), Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let _: Value = self
            .mutate::<_, (), _>(Method::DELETE, self.url(path), None)
            .await?;
        Ok(())
    }

    /// Drops every cached response and detaches GETs still in flight.
    pub async fn clear_cache(&self) {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        if let Err(err) = self.cache.invalidate(None).await {
            tracing::warn!(error = %err, "Failed to clear client cache");
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
