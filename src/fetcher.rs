//! The content-fetching contract.
//!
//! [`fetch_content`] is the single entry point consumed by the chat tool: it
//! validates the request, reads connection settings from the environment,
//! builds the HTTP client, and delegates to [`fetch_documents`]. Every
//! failure path is flattened into a returned string so nothing ever escapes
//! as an error or panic — the downstream consumer treats the return value as
//! opaque text either way.

use anyhow::Result;
use tracing::{debug, info};

use crate::confluence::{ConfluenceApi, ConfluenceClient, Page, collect_page_with_children};
use crate::document::Document;
use crate::render;
use crate::settings::ConfluenceSettings;

/// Default cap on the number of returned documents.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Request timeout applied to every API call, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Maximum API requests per second.
const DEFAULT_RATE_LIMIT: usize = 10;

/// Parameters for one fetch invocation.
///
/// Exactly one of `page_id` and `cql` must be set; `include_children` only
/// applies to page lookups and is ignored for CQL queries.
#[derive(Debug, Clone)]
pub struct FetchRequest {
  /// Confluence page ID to fetch (mutually exclusive with `cql`).
  pub page_id: Option<String>,
  /// CQL query to search for content (mutually exclusive with `page_id`).
  pub cql: Option<String>,
  /// Whether to include child pages in the response.
  pub include_children: bool,
  /// Maximum number of results to return; `None` returns all results.
  pub max_results: Option<usize>,
}

impl Default for FetchRequest {
  fn default() -> Self {
    Self {
      page_id: None,
      cql: None,
      include_children: false,
      max_results: Some(DEFAULT_MAX_RESULTS),
    }
  }
}

impl FetchRequest {
  /// Request a single page by ID.
  pub fn for_page(page_id: impl Into<String>) -> Self {
    Self {
      page_id: Some(page_id.into()),
      ..Self::default()
    }
  }

  /// Request a CQL search.
  pub fn for_cql(cql: impl Into<String>) -> Self {
    Self {
      cql: Some(cql.into()),
      ..Self::default()
    }
  }
}

/// Fetch Confluence content and format it as markdown.
///
/// Connection settings come from the environment: `CONFLUENCE_API_TOKEN` and
/// `CONFLUENCE_BASE_URL` are required, and `SECLAB=true` switches the client
/// to the restricted network profile.
///
/// # Arguments
/// * `request` - Validated against the page-ID-XOR-CQL rule before any
///   environment access.
///
/// # Returns
/// Concatenated markdown sections for every retrieved document, or a
/// human-readable error string. Never panics, never returns `Err`.
pub async fn fetch_content(request: &FetchRequest) -> String {
  if let Some(error) = validate(request) {
    return error;
  }

  let settings = match ConfluenceSettings::from_env() {
    Ok(settings) => settings,
    Err(e) => return format!("Error: {e}"),
  };

  let client = match ConfluenceClient::new(&settings, DEFAULT_TIMEOUT_SECS, DEFAULT_RATE_LIMIT) {
    Ok(client) => client,
    Err(e) => return format!("Error: Confluence client unavailable: {e}"),
  };

  fetch_documents(&client, request).await
}

/// Fetch and format documents through an arbitrary [`ConfluenceApi`]
/// implementation.
///
/// This is the seam used by tests with a fake reader; [`fetch_content`] calls
/// it with the real HTTP client. The returned-string contract is identical.
pub async fn fetch_documents(reader: &dyn ConfluenceApi, request: &FetchRequest) -> String {
  if let Some(error) = validate(request) {
    return error;
  }

  match load_documents(reader, request).await {
    Ok(documents) if documents.is_empty() => match (&request.page_id, &request.cql) {
      (Some(page_id), _) => format!("Error: No content found for Confluence page ID: {page_id}"),
      (_, Some(cql)) => format!("Error: No content found for CQL query: {cql}"),
      _ => unreachable!("validate() rejects requests with neither parameter"),
    },
    Ok(documents) => {
      info!("fetched {} document(s)", documents.len());
      render::render_documents(&documents)
    }
    Err(e) => format!("Error fetching Confluence content: {e}"),
  }
}

/// Enforce the mutually-exclusive parameter contract.
fn validate(request: &FetchRequest) -> Option<String> {
  match (&request.page_id, &request.cql) {
    (None, None) => Some("Error: Either 'page_id' or 'cql' parameter must be provided".to_string()),
    (Some(_), Some(_)) => {
      Some("Error: Cannot use both 'page_id' and 'cql' parameters simultaneously. Choose one.".to_string())
    }
    _ => None,
  }
}

/// Retrieve the pages for the request and reduce them to documents.
async fn load_documents(reader: &dyn ConfluenceApi, request: &FetchRequest) -> Result<Vec<Document>> {
  let pages: Vec<Page> = if let Some(page_id) = &request.page_id {
    if request.include_children {
      debug!("loading page {page_id} with children");
      collect_page_with_children(reader, page_id, request.max_results).await?
    } else {
      debug!("loading page {page_id}");
      let mut pages = vec![reader.get_page(page_id).await?];
      if let Some(cap) = request.max_results {
        pages.truncate(cap);
      }
      pages
    }
  } else {
    // validate() guarantees cql is present on this branch.
    let cql = request.cql.as_deref().unwrap_or_default();
    debug!("loading content for CQL query: {cql}");
    reader.search(cql, request.max_results).await?
  };

  pages
    .iter()
    .map(|page| Document::from_page(page, reader.base_url()))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validate_rejects_missing_parameters() {
    let error = validate(&FetchRequest {
      page_id: None,
      cql: None,
      ..FetchRequest::default()
    })
    .unwrap();
    assert_eq!(error, "Error: Either 'page_id' or 'cql' parameter must be provided");
  }

  #[test]
  fn validate_rejects_conflicting_parameters() {
    let error = validate(&FetchRequest {
      page_id: Some("123".to_string()),
      cql: Some("space = \"DEV\"".to_string()),
      ..FetchRequest::default()
    })
    .unwrap();
    assert_eq!(
      error,
      "Error: Cannot use both 'page_id' and 'cql' parameters simultaneously. Choose one."
    );
  }

  #[test]
  fn validate_accepts_either_parameter_alone() {
    assert!(validate(&FetchRequest::for_page("123")).is_none());
    assert!(validate(&FetchRequest::for_cql("type = page")).is_none());
  }

  #[test]
  fn default_request_caps_results_at_five() {
    assert_eq!(FetchRequest::default().max_results, Some(DEFAULT_MAX_RESULTS));
    assert_eq!(DEFAULT_MAX_RESULTS, 5);
  }
}
