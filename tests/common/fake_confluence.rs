//! Fake Confluence API client for testing
//!
//! This module provides a stub implementation of the Confluence API that
//! returns predefined responses without making any network requests.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use confluence_fetch::confluence::{ConfluenceApi, Page};

use crate::common::fixtures;

/// A fake Confluence client that returns predefined responses for testing
pub struct FakeConfluenceClient {
  base_url: String,
  pages: HashMap<String, Page>,
  child_pages: HashMap<String, Vec<String>>,
  search_results: HashMap<String, Vec<String>>,
  failure: Option<String>,
}

impl FakeConfluenceClient {
  /// Create a new fake client with no pages
  pub fn new() -> Self {
    Self {
      base_url: "https://example.atlassian.net".to_string(),
      pages: HashMap::new(),
      child_pages: HashMap::new(),
      search_results: HashMap::new(),
      failure: None,
    }
  }

  /// Create a fake client with default sample pages
  pub fn with_sample_pages() -> Self {
    let mut client = Self::new();

    client.add_page_from_json(fixtures::sample_page_response());
    client.add_page_from_json(fixtures::sample_api_page_response());
    client.add_page_from_json(fixtures::sample_untitled_page_response());
    client.add_page_from_json(fixtures::sample_install_page_response());
    client.add_page_from_json(fixtures::sample_configure_page_response());
    client.add_page_from_json(fixtures::sample_page_titled_a());
    client.add_page_from_json(fixtures::sample_page_titled_b());

    client
  }

  /// Add a page from a JSON value, keyed by its own ID
  pub fn add_page_from_json(&mut self, json: serde_json::Value) {
    if let Ok(page) = serde_json::from_value::<Page>(json) {
      self.pages.insert(page.id.clone(), page);
    }
  }

  /// Register child pages for a parent page
  pub fn add_child_pages(&mut self, parent_id: &str, child_ids: &[&str]) {
    self
      .child_pages
      .insert(parent_id.to_string(), child_ids.iter().map(|id| id.to_string()).collect());
  }

  /// Register the page IDs a CQL query should match, in order
  pub fn add_search_results(&mut self, cql: &str, page_ids: &[&str]) {
    self
      .search_results
      .insert(cql.to_string(), page_ids.iter().map(|id| id.to_string()).collect());
  }

  /// Make every API call fail with the given message
  pub fn fail_with(&mut self, message: &str) {
    self.failure = Some(message.to_string());
  }

  fn check_failure(&self) -> Result<()> {
    match &self.failure {
      Some(message) => Err(anyhow!("{message}")),
      None => Ok(()),
    }
  }
}

impl Default for FakeConfluenceClient {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ConfluenceApi for FakeConfluenceClient {
  fn base_url(&self) -> &str {
    &self.base_url
  }

  async fn get_page(&self, page_id: &str) -> Result<Page> {
    self.check_failure()?;

    self
      .pages
      .get(page_id)
      .cloned()
      .ok_or_else(|| anyhow!("No content found with id: {page_id}"))
  }

  async fn get_child_pages(&self, page_id: &str) -> Result<Vec<Page>> {
    self.check_failure()?;

    let child_ids = self.child_pages.get(page_id).cloned().unwrap_or_default();
    let mut children = Vec::new();

    for child_id in child_ids {
      if let Some(page) = self.pages.get(&child_id) {
        children.push(page.clone());
      }
    }

    Ok(children)
  }

  async fn search(&self, cql: &str, limit: Option<usize>) -> Result<Vec<Page>> {
    self.check_failure()?;

    let mut results: Vec<Page> = self
      .search_results
      .get(cql)
      .cloned()
      .unwrap_or_default()
      .iter()
      .filter_map(|id| self.pages.get(id).cloned())
      .collect();

    if let Some(cap) = limit {
      results.truncate(cap);
    }

    Ok(results)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_fake_client_empty() {
    let client = FakeConfluenceClient::new();
    assert!(client.get_page("123456").await.is_err());
  }

  #[tokio::test]
  async fn test_fake_client_with_samples() {
    let client = FakeConfluenceClient::with_sample_pages();

    let page = client.get_page("123456").await.unwrap();
    assert_eq!(page.id, "123456");
    assert_eq!(page.title.as_deref(), Some("Getting Started Guide"));

    assert!(client.get_page("999999").await.is_err());
  }

  #[tokio::test]
  async fn test_fake_client_search_honors_limit() {
    let mut client = FakeConfluenceClient::with_sample_pages();
    client.add_search_results("type = page", &["1001", "1002"]);

    let results = client.search("type = page", Some(1)).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "1001");
  }

  #[tokio::test]
  async fn test_fake_client_failure_mode() {
    let mut client = FakeConfluenceClient::new();
    client.fail_with("timeout");

    let error = client.get_page("123456").await.unwrap_err();
    assert_eq!(error.to_string(), "timeout");
  }
}
