//! Discovery endpoint client
//!
//! This module provides the client that resolves an identifier into a list
//! of discovery records by querying a remote HTTP endpoint. Fetches are
//! negotiated with conditional requests (`If-Modified-Since` /
//! `If-None-Match`) against a bounded in-memory revalidation cache, so an
//! unchanged origin answers `304 Not Modified` without shipping a body.

use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

use crate::cache::{CacheEntry, RevalidationCache};
use crate::data::Target;

/// Category path prefix queried when the caller does not name one
pub const DEFAULT_CATEGORY: &str = "node";

/// Version token used when none was injected at construction
pub const FALLBACK_VERSION: &str = "0.0.0-unknown";

/// Product token sent in the `User-Agent` header
const USER_AGENT_PRODUCT: &str = "promsd";

/// Deadline for a single discovery request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when resolving an identifier
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// HTTP request failed at the transport level (DNS, connect, timeout)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The origin answered with a status outside the protocol contract
    #[error("HTTP error: {0}")]
    Status(StatusCode),

    /// Failed to parse the discovery payload
    #[error("Failed to parse discovery payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for a Prometheus-style HTTP service discovery endpoint
///
/// Construction never fails: an unparsable base URL or empty credentials
/// produce an *inert* client whose resolve calls return empty results
/// without contacting the network. Callers therefore never branch on
/// construction success.
///
/// The client is cheap to clone and safe to share across concurrent tasks;
/// the HTTP connection pool and the revalidation cache are shared between
/// clones.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    state: Option<Active>,
}

/// State carried by a usable (non-inert) client
#[derive(Debug, Clone)]
struct Active {
    http: Client,
    base_url: Url,
    login: String,
    password: String,
    version: String,
    cache: RevalidationCache,
}

impl DiscoveryClient {
    /// Creates a new client for the discovery endpoint at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - Base endpoint URL, e.g. `https://discovery.example.com`
    /// * `login` - Basic-auth login, must be non-empty
    /// * `password` - Basic-auth password, must be non-empty
    ///
    /// An invalid `base_url` or empty credentials yield an inert client
    /// rather than an error; see [`DiscoveryClient::is_inert`].
    pub fn new(base_url: &str, login: &str, password: &str) -> Self {
        let parsed = match Url::parse(base_url) {
            Ok(url) if !url.cannot_be_a_base() => url,
            _ => return Self { state: None },
        };
        if login.is_empty() || password.is_empty() {
            return Self { state: None };
        }

        Self {
            state: Some(Active {
                http: Client::new(),
                base_url: parsed,
                login: login.to_string(),
                password: password.to_string(),
                version: FALLBACK_VERSION.to_string(),
                cache: RevalidationCache::new(RevalidationCache::DEFAULT_CAPACITY),
            }),
        }
    }

    /// Replaces the revalidation cache with one bounded at `capacity` entries
    ///
    /// Intended for construction time; the previous cache contents are
    /// discarded. A no-op on an inert client.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        if let Some(active) = &mut self.state {
            active.cache = RevalidationCache::new(capacity);
        }
        self
    }

    /// Sets the version token advertised in the `User-Agent` header
    ///
    /// Defaults to [`FALLBACK_VERSION`] when never called. Binaries usually
    /// inject their build version here instead of relying on the sentinel.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        if let Some(active) = &mut self.state {
            active.version = version.into();
        }
        self
    }

    /// Whether this client was degraded to a permanent no-op at construction
    pub fn is_inert(&self) -> bool {
        self.state.is_none()
    }

    /// Resolves `identifier` under the default category (`"node"`)
    ///
    /// # Returns
    /// * `Ok(records)` - Decoded discovery records, possibly empty
    /// * `Err(DiscoveryError)` - Transport, HTTP-status, or decode failure
    pub async fn resolve(&self, identifier: &str) -> Result<Vec<Target>, DiscoveryError> {
        self.resolve_with_category(identifier, DEFAULT_CATEGORY).await
    }

    /// Resolves `identifier` under an explicit category path prefix
    ///
    /// The lookup URL is the base endpoint with `{category}/{identifier}`
    /// appended as escaped path segments. An inert client returns an empty
    /// result without contacting the network. A `410 Gone` answer means the
    /// identifier does not exist at the protocol level and is likewise an
    /// empty success, deliberately distinct from an intermediary's generic
    /// 404 which surfaces as an error.
    pub async fn resolve_with_category(
        &self,
        identifier: &str,
        category: &str,
    ) -> Result<Vec<Target>, DiscoveryError> {
        let Some(active) = &self.state else {
            return Ok(Vec::new());
        };

        let url = lookup_url(&active.base_url, category, identifier);
        let key = url.as_str().to_string();
        let cached = active.cache.get(&key);

        let mut request = active
            .http
            .get(url)
            .basic_auth(&active.login, Some(&active.password))
            .header(USER_AGENT, format!("{USER_AGENT_PRODUCT}/{}", active.version))
            .timeout(REQUEST_TIMEOUT);
        if let Some(entry) = &cached {
            request = request.header(IF_MODIFIED_SINCE, entry.last_modified.as_str());
            if !entry.etag.is_empty() {
                request = request.header(IF_NONE_MATCH, entry.etag.as_str());
            }
        }

        let response = request.send().await?;
        let status = response.status();

        let payload = if status == StatusCode::NOT_MODIFIED {
            // Cached payload is authoritative; an unsolicited 304 is a hard error
            match cached {
                Some(entry) => entry.payload,
                None => return Err(DiscoveryError::Status(status)),
            }
        } else if status == StatusCode::GONE {
            return Ok(Vec::new());
        } else if status == StatusCode::OK {
            let etag = header_string(&response, ETAG.as_str()).unwrap_or_default();
            let last_modified =
                header_string(&response, LAST_MODIFIED.as_str()).unwrap_or_else(http_date_now);

            let body = response.bytes().await?.to_vec();
            active.cache.put(
                key,
                CacheEntry {
                    payload: body.clone(),
                    etag,
                    last_modified,
                },
            );
            body
        } else {
            return Err(DiscoveryError::Status(status));
        };

        Ok(serde_json::from_slice(&payload)?)
    }
}

/// Builds the lookup URL for `identifier` under `category`
///
/// Path segments are appended (joined, never merged), so the escaping rules
/// for URL path segments apply to both components.
fn lookup_url(base: &Url, category: &str, identifier: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(category).push(identifier);
    }
    url
}

/// Reads a response header as an owned string, treating non-UTF-8 as absent
fn header_string(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Formats the current time as an RFC 7231 HTTP-date
///
/// Used as the stored `If-Modified-Since` value when the origin answered
/// `200 OK` without a `Last-Modified` header.
fn http_date_now() -> String {
    chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
