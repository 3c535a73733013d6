//! Data transfer objects returned by the Confluence REST API.

use serde::{Deserialize, Serialize};

/// Confluence page metadata and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
  /// Unique numeric identifier assigned by Confluence.
  pub id: String,
  /// Human-readable title displayed in the UI. Search results can omit it.
  #[serde(default)]
  pub title: Option<String>,
  #[serde(rename = "type", default)]
  /// Content type (typically `"page"` or `"blogpost"`).
  pub page_type: Option<String>,
  /// Publication status such as `"current"` or `"draft"`.
  #[serde(default)]
  pub status: Option<String>,
  /// Rich body content in different renderings.
  pub body: Option<PageBody>,
  /// Space metadata describing where the page lives.
  pub space: Option<PageSpace>,
  #[serde(rename = "_links")]
  /// Useful hyperlinks, including the canonical UI URL.
  pub links: Option<PageLinks>,
}

impl Page {
  /// Storage-format markup for this page, when the body was expanded.
  pub fn storage_value(&self) -> Option<&str> {
    self
      .body
      .as_ref()
      .and_then(|body| body.storage.as_ref())
      .map(|storage| storage.value.as_str())
  }
}

/// Page body content in various formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBody {
  /// Confluence storage-format XHTML representation.
  pub storage: Option<StorageFormat>,
  /// Rendered HTML view supplied by the API when expanded.
  pub view: Option<ViewFormat>,
}

/// Storage format (Confluence's internal format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageFormat {
  /// Raw XHTML markup returned by the API.
  pub value: String,
  /// Representation name (typically `"storage"`).
  pub representation: String,
}

/// View format (rendered HTML).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewFormat {
  /// Rendered HTML snippet safe for display.
  pub value: String,
  /// Representation name (typically `"view"`).
  pub representation: String,
}

/// Space information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpace {
  /// Short key that uniquely identifies the space.
  pub key: String,
  /// Human-readable space name.
  pub name: String,
  #[serde(rename = "type", default)]
  /// Space classification such as `"global"` or `"personal"`.
  pub space_type: Option<String>,
}

/// Page links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLinks {
  #[serde(rename = "webui")]
  /// Path to the page within the Confluence web UI.
  pub web_ui: Option<String>,
  #[serde(rename = "self")]
  /// Fully qualified API endpoint for the resource.
  pub self_link: Option<String>,
}

/// Child pages response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildPagesResponse {
  /// Child pages returned for the lookup request.
  pub results: Vec<Page>,
}

/// CQL search response wrapper with pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
  /// Pages matching the query in this batch.
  pub results: Vec<Page>,
  /// Zero-based offset of the first result in this batch.
  #[serde(default)]
  pub start: usize,
  /// Requested batch size.
  #[serde(default)]
  pub limit: usize,
  /// Number of results in this batch.
  #[serde(default)]
  pub size: usize,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn page_deserializes_with_full_metadata() {
    let page: Page = serde_json::from_value(json!({
      "id": "123456",
      "type": "page",
      "status": "current",
      "title": "Getting Started Guide",
      "body": {
        "storage": {"value": "<p>Welcome</p>", "representation": "storage"}
      },
      "space": {"key": "DOCS", "name": "Documentation", "type": "global"},
      "_links": {"webui": "/wiki/spaces/DOCS/pages/123456"}
    }))
    .unwrap();

    assert_eq!(page.id, "123456");
    assert_eq!(page.title.as_deref(), Some("Getting Started Guide"));
    assert_eq!(page.storage_value(), Some("<p>Welcome</p>"));
    assert_eq!(page.space.unwrap().name, "Documentation");
  }

  #[test]
  fn page_tolerates_sparse_search_results() {
    let page: Page = serde_json::from_value(json!({"id": "42"})).unwrap();

    assert_eq!(page.id, "42");
    assert!(page.title.is_none());
    assert!(page.storage_value().is_none());
    assert!(page.links.is_none());
  }

  #[test]
  fn search_response_carries_pagination_fields() {
    let response: SearchResponse = serde_json::from_value(json!({
      "results": [{"id": "1"}, {"id": "2"}],
      "start": 0,
      "limit": 25,
      "size": 2
    }))
    .unwrap();

    assert_eq!(response.results.len(), 2);
    assert_eq!(response.size, 2);
  }
}
