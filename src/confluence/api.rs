//! Trait definitions for interacting with Confluence.

use anyhow::Result;
use async_trait::async_trait;

use super::models::Page;

/// Trait for Confluence API operations (enables testing with fake
/// implementations).
#[async_trait]
pub trait ConfluenceApi: Send + Sync {
  /// Base URL of the Confluence instance this reader talks to.
  ///
  /// Used to resolve relative web UI links into absolute page URLs.
  fn base_url(&self) -> &str;

  /// Fetch a page by ID.
  ///
  /// # Arguments
  /// * `page_id` - Unique Confluence identifier for the page to retrieve.
  ///
  /// # Returns
  /// The full `Page` record including metadata and any expanded fields.
  async fn get_page(&self, page_id: &str) -> Result<Page>;

  /// Get child pages for a given page ID.
  ///
  /// # Arguments
  /// * `page_id` - Identifier of the parent page whose children should be
  ///   listed.
  ///
  /// # Returns
  /// A vector of `Page` records representing each direct child of the parent.
  async fn get_child_pages(&self, page_id: &str) -> Result<Vec<Page>>;

  /// Run a CQL query and return every matching page, up to `limit`.
  ///
  /// Implementations are responsible for server-side pagination; callers see
  /// a single accumulated result set.
  ///
  /// # Arguments
  /// * `cql` - CQL expression, passed through to the server unparsed.
  /// * `limit` - Maximum number of results to accumulate; `None` is unbounded.
  ///
  /// # Returns
  /// Matching pages in the order the server returned them.
  async fn search(&self, cql: &str, limit: Option<usize>) -> Result<Vec<Page>>;
}
