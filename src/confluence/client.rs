//! HTTP client implementation for talking to the Confluence REST API.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use super::api::ConfluenceApi;
use super::models::{ChildPagesResponse, Page, SearchResponse};
use crate::settings::{ConfluenceSettings, NetworkProfile, RESTRICTED_PROXY_URL};

/// Fields expanded on every content request so pages arrive with their body
/// and space metadata in one round trip.
const CONTENT_EXPAND: &str = "body.storage,space";

/// Batch size used when paginating CQL search results.
const SEARCH_PAGE_SIZE: usize = 25;

/// Confluence API client.
#[derive(Clone)]
pub struct ConfluenceClient {
  base_url: String,
  token: String,
  client: reqwest::Client,
  rate_limiter: Arc<RequestRateLimiter>,
}

/// Simple fixed-window rate limiter to cap the number of requests per interval.
#[derive(Debug)]
struct RequestRateLimiter {
  max_requests: usize,
  window: Duration,
  timestamps: Mutex<VecDeque<Instant>>,
}

impl RequestRateLimiter {
  /// Create a rate limiter permitting `max_requests` per `window`.
  fn new(max_requests: usize, window: Duration) -> Self {
    Self {
      max_requests,
      window,
      timestamps: Mutex::new(VecDeque::with_capacity(max_requests)),
    }
  }

  /// Wait until the caller can perform another request without exceeding the
  /// rate limit.
  async fn acquire(&self) {
    loop {
      let mut timestamps = self.timestamps.lock().await;
      let now = Instant::now();

      while let Some(earliest) = timestamps.front()
        && now.duration_since(*earliest) >= self.window
      {
        timestamps.pop_front();
      }

      if timestamps.len() < self.max_requests {
        timestamps.push_back(now);
        return;
      }

      let earliest = *timestamps.front().expect("rate limiter queue should never be empty");
      let elapsed = now.duration_since(earliest);
      let wait_duration = if elapsed >= self.window {
        Duration::from_secs(0)
      } else {
        self.window - elapsed
      };

      drop(timestamps);

      if wait_duration > Duration::from_secs(0) {
        sleep(wait_duration).await;
      }
    }
  }
}

impl ConfluenceClient {
  /// Create a new Confluence client.
  ///
  /// # Arguments
  /// * `settings` - Resolved connection settings (base URL, token, network
  ///   profile).
  /// * `timeout_secs` - Request timeout in seconds.
  /// * `rate_limit` - Maximum requests per second.
  ///
  /// # Returns
  /// A configured `ConfluenceClient` ready for API calls.
  ///
  /// # Errors
  /// Returns an error if the rate limit is zero or if the underlying
  /// `reqwest::Client` cannot be built.
  pub fn new(settings: &ConfluenceSettings, timeout_secs: u64, rate_limit: usize) -> Result<Self> {
    if rate_limit == 0 {
      return Err(anyhow!("Rate limit must be at least 1 request per second"));
    }

    let base_url = settings.base_url.trim_end_matches('/').to_string();

    let mut builder = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .user_agent(format!(
        "confluence-fetch/{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("TARGET")
      ));

    if settings.network == NetworkProfile::Restricted {
      debug!("restricted network profile active, routing through {RESTRICTED_PROXY_URL}");
      builder = builder
        .proxy(reqwest::Proxy::all(RESTRICTED_PROXY_URL).context("Failed to configure forward proxy")?)
        .danger_accept_invalid_certs(true);
    }

    let client = builder.build().context("Failed to create HTTP client")?;

    Ok(Self {
      base_url,
      token: settings.api_token.clone(),
      client,
      rate_limiter: Arc::new(RequestRateLimiter::new(rate_limit, Duration::from_secs(1))),
    })
  }

  /// Get the authorization header value (bearer token).
  fn auth_header(&self) -> String {
    format!("Bearer {}", self.token)
  }

  /// Issue a GET request against the REST API and decode the JSON body.
  async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
    self.rate_limiter.acquire().await;

    let response = self
      .client
      .get(url)
      .query(query)
      .header("Authorization", self.auth_header())
      .header("Accept", "application/json")
      .send()
      .await
      .context("Failed to send request to Confluence API")?;

    if !response.status().is_success() {
      let status = response.status();
      let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("(no error details)"));
      return Err(anyhow!("Confluence API returned error {status}: {error_text}"));
    }

    response
      .json()
      .await
      .context("Failed to parse response from Confluence API")
  }
}

#[async_trait]
impl ConfluenceApi for ConfluenceClient {
  fn base_url(&self) -> &str {
    &self.base_url
  }

  async fn get_page(&self, page_id: &str) -> Result<Page> {
    debug!("fetching page {page_id}");

    let url = format!("{}/wiki/rest/api/content/{}", self.base_url, page_id);
    self.get_json(&url, &[("expand", CONTENT_EXPAND)]).await
  }

  async fn get_child_pages(&self, page_id: &str) -> Result<Vec<Page>> {
    debug!("fetching child pages of {page_id}");

    let url = format!("{}/wiki/rest/api/content/{}/child/page", self.base_url, page_id);
    let children: ChildPagesResponse = self.get_json(&url, &[("expand", CONTENT_EXPAND)]).await?;

    Ok(children.results)
  }

  async fn search(&self, cql: &str, limit: Option<usize>) -> Result<Vec<Page>> {
    let url = format!("{}/wiki/rest/api/content/search", self.base_url);
    let mut results: Vec<Page> = Vec::new();
    let mut start = 0usize;

    loop {
      let remaining = limit.map(|cap| cap.saturating_sub(results.len()));
      if remaining == Some(0) {
        break;
      }

      let batch_size = remaining.map_or(SEARCH_PAGE_SIZE, |r| r.min(SEARCH_PAGE_SIZE));
      let start_param = start.to_string();
      let limit_param = batch_size.to_string();

      debug!("searching cql={cql} start={start} limit={batch_size}");
      let batch: SearchResponse = self
        .get_json(&url, &[
          ("cql", cql),
          ("start", start_param.as_str()),
          ("limit", limit_param.as_str()),
          ("expand", CONTENT_EXPAND),
        ])
        .await?;

      let fetched = batch.results.len();
      results.extend(batch.results);

      // A short batch means the server ran out of matches.
      if fetched < batch_size {
        break;
      }
      start += fetched;
    }

    if let Some(cap) = limit {
      results.truncate(cap);
    }

    Ok(results)
  }
}
