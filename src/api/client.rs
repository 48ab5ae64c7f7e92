//! Rocketseat ("skylab") API HTTP client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::cookie::Jar;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tokio::time::sleep;
use url::Url;

use crate::api::session::SessionData;
use crate::api::source::{AttachmentSource, ContentSource, Fetched, Lookup};
use crate::api::types::*;
use crate::config::HttpConfig;
use crate::error::{Error, Result};

/// Cookie names the web app expects alongside the authorization header.
pub const ACCESS_TOKEN_COOKIE: &str = "skylab_next_access_token_v4";
pub const REFRESH_TOKEN_COOKIE: &str = "skylab_next_refresh_token_v4";

/// Server errors the transport retries.
const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Retry policy for idempotent-enough requests (GET and POST).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_millis(300),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        let jitter = rand::thread_rng().gen_range(0..50);
        self.backoff.saturating_mul(factor) + Duration::from_millis(jitter)
    }
}

/// Authenticated API client built from an explicit [`SessionData`].
pub struct SkylabApi {
    client: Client,
    session: SessionData,
    api_base: String,
    web_base: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl SkylabApi {
    /// Create a client from a stored session.
    pub fn new(config: &HttpConfig, timeout: Duration, session: SessionData) -> Result<Self> {
        let client = build_client(&session, timeout)?;

        Ok(Self {
            client,
            session,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            web_base: config.web_base.trim_end_matches('/').to_string(),
            timeout,
            retry: RetryPolicy::default(),
        })
    }

    /// Create a client with a fresh, unauthenticated session.
    pub fn unauthenticated(config: &HttpConfig, timeout: Duration) -> Result<Self> {
        let mut session = SessionData::default();
        session.set_header("User-Agent", config.user_agent.clone());
        session.set_header("Referer", config.web_base.clone());
        Self::new(config, timeout, session)
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The session this client sends with every request.
    pub fn session(&self) -> &SessionData {
        &self.session
    }

    /// Log in with email and password, then rebuild the client with the new credentials.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AccountInfo> {
        let url = self.api_url(&["sessions"], &[])?;
        let body = serde_json::to_value(LoginRequest { email, password })?;

        let response = match self.send(Method::POST, url, Some(&body)).await {
            Ok(response) => response,
            Err(Error::Status { status, .. }) if matches!(status, 400 | 401 | 403) => {
                return Err(Error::Authentication(format!(
                    "HTTP {}: check your email and password",
                    status
                )))
            }
            Err(e) => return Err(e),
        };

        let text = response.text().await?;
        let login: LoginResponse = serde_json::from_str(&text).map_err(|e| {
            Error::Authentication(format!("Failed to parse login response: {}", e))
        })?;

        self.session
            .set_header("Authorization", login.authorization());

        // Page scrapes go to the web host and need the token cookies too.
        let mut cookie_urls = vec![self.api_base.clone()];
        if self.web_base != self.api_base {
            cookie_urls.push(self.web_base.clone());
        }
        for cookie_url in &cookie_urls {
            self.session
                .set_cookie(ACCESS_TOKEN_COOKIE, login.token.clone(), cookie_url);
            self.session
                .set_cookie(REFRESH_TOKEN_COOKIE, login.refresh_token.clone(), cookie_url);
        }
        self.client = build_client(&self.session, self.timeout)?;

        self.get_account().await
    }

    /// Get the logged-in account.
    pub async fn get_account(&self) -> Result<AccountInfo> {
        let url = self.api_url(&["account"], &[])?;
        let response = self.send(Method::GET, url, None).await?;
        let text = response.text().await?;
        tracing::debug!("Account response: {}", text);

        serde_json::from_str(&text)
            .map_err(|e| Error::Api(format!("Failed to parse account info: {}", e)))
    }

    /// List specializations, courses and extras.
    pub async fn list_catalog(&self) -> Result<Vec<CatalogItem>> {
        let url = self.api_url(
            &["catalog", "list"],
            &[
                ("types[0]", "SPECIALIZATION"),
                ("types[1]", "COURSE"),
                ("types[2]", "EXTRA"),
                ("limit", "1000"),
                ("offset", "0"),
                ("page", "1"),
                ("sort_by", "relevance"),
            ],
        )?;

        let response = self.send(Method::GET, url, None).await?;
        let text = response.text().await?;
        tracing::debug!("Catalog response length: {} bytes", text.len());

        let catalog: CatalogResponse = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse catalog: {} - Response: {}",
                e,
                truncate(&text, 500)
            ))
        })?;

        Ok(catalog.items)
    }

    /// URL a lookup resolves to.
    pub fn lookup_url(&self, lookup: &Lookup) -> Result<Url> {
        match lookup {
            Lookup::Progress { slug } => {
                self.api_url(&["v2", "journeys", slug.as_str(), "progress", "temp"], &[])
            }
            Lookup::JourneyPage { slug } => self.web_url(&["journey", slug.as_str(), "contents"]),
            Lookup::Node { slug } => self.api_url(&["journey-nodes", slug.as_str()], &[]),
            Lookup::Creators { slug } => {
                self.api_url(&["journey-nodes", "creators"], &[("slug", slug.as_str())])
            }
            Lookup::Parent { parent, slug } => {
                self.api_url(&["journey-nodes", parent.as_str()], &[("slug", slug.as_str())])
            }
            Lookup::ClassroomPage { slug } => self.web_url(&["classroom", slug.as_str()]),
        }
    }

    fn api_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        endpoint(&self.api_base, segments, query)
    }

    fn web_url(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.web_base, segments, &[])
    }

    /// Send a request, retrying server errors and connection failures.
    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Response> {
        let mut attempt = 1;

        loop {
            tracing::debug!("{} {} (attempt {})", method, url, attempt);

            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            let retryable = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    tracing::debug!("Response status: {}", status);

                    if status.is_success() {
                        return Ok(response);
                    }

                    if !RETRY_STATUSES.contains(&status.as_u16()) || attempt >= self.retry.max_attempts {
                        return Err(status_error(status, &url));
                    }
                    format!("HTTP {}", status)
                }
                Err(e) if (e.is_connect() || e.is_timeout()) && attempt < self.retry.max_attempts => {
                    e.to_string()
                }
                Err(e) => return Err(Error::Http(e)),
            };

            let delay = self.retry.delay(attempt);
            tracing::warn!(
                "{} {} failed ({}), retrying in {:?}",
                method,
                url,
                retryable,
                delay
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl ContentSource for SkylabApi {
    async fn fetch(&self, lookup: &Lookup) -> Result<Fetched> {
        let url = self.lookup_url(lookup)?;
        let response = self.send(Method::GET, url.clone(), None).await?;
        let text = response.text().await?;

        if lookup.is_page() {
            return Ok(Fetched::Page(text));
        }

        let value = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Non-JSON response from {}: {} - Response: {}",
                url,
                e,
                truncate(&text, 200)
            ))
        })?;
        Ok(Fetched::Json(value))
    }
}

#[async_trait]
impl AttachmentSource for SkylabApi {
    async fn download(&self, url: &str) -> Result<DownloadedFile> {
        let url = Url::parse(url)?;
        let response = self.send(Method::GET, url, None).await?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().await?.to_vec();

        Ok(DownloadedFile {
            bytes,
            content_type,
        })
    }
}

/// Build a reqwest client that sends the session's headers and cookies.
fn build_client(session: &SessionData, timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    for (name, value) in &session.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Api(format!("Invalid session header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Api(format!("Invalid value for session header '{}': {}", name, e)))?;
        headers.insert(name, value);
    }

    let jar = Jar::default();
    for cookie in &session.cookies {
        let url = Url::parse(&cookie.url)?;
        jar.add_cookie_str(&format!("{}={}", cookie.name, cookie.value), &url);
    }

    Client::builder()
        .default_headers(headers)
        .cookie_provider(Arc::new(jar))
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))
}

/// Join path segments (percent-encoded) and query pairs onto a base URL.
fn endpoint(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| Error::Config(format!("Base URL cannot have a path: {}", base)))?
        .pop_if_empty()
        .extend(segments);

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url)
}

fn status_error(status: StatusCode, url: &Url) -> Error {
    Error::Status {
        status: status.as_u16(),
        url: url.to_string(),
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
