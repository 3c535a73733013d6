//! The retrieved-document record handed to the renderer.

use anyhow::{Context, Result};

use crate::confluence::Page;
use crate::extract;

/// One retrieved Confluence document, reduced to the metadata and text the
/// renderer cares about. Metadata stays optional; the renderer substitutes
/// placeholder values for anything missing.
#[derive(Debug, Clone, Default)]
pub struct Document {
  /// Confluence page identifier.
  pub page_id: Option<String>,
  /// Page title.
  pub title: Option<String>,
  /// Human-readable name of the containing space.
  pub space_name: Option<String>,
  /// Absolute URL of the page in the web UI.
  pub url: Option<String>,
  /// Extracted body text. Empty when the page has no body.
  pub text: String,
}

impl Document {
  /// Build a document from a REST page record.
  ///
  /// # Arguments
  /// * `page` - Page as returned by the API, ideally with body and space
  ///   expanded.
  /// * `base_url` - Instance base URL used to resolve the relative web UI
  ///   link.
  ///
  /// # Returns
  /// A `Document` with extracted body text and resolved metadata.
  ///
  /// # Errors
  /// Returns an error when the page body cannot be parsed.
  pub fn from_page(page: &Page, base_url: &str) -> Result<Self> {
    let text = match page.storage_value() {
      Some(storage) => extract::storage_to_text(storage)
        .with_context(|| format!("Failed to extract text from page {}", page.id))?,
      None => String::new(),
    };

    let url = page
      .links
      .as_ref()
      .and_then(|links| links.web_ui.as_deref())
      .map(|web_ui| resolve_web_url(base_url, web_ui));

    Ok(Self {
      page_id: Some(page.id.clone()),
      title: page.title.clone(),
      space_name: page.space.as_ref().map(|space| space.name.clone()),
      url,
      text,
    })
  }
}

/// Resolve a web UI link against the instance base URL. Links arriving
/// absolute are kept as-is.
fn resolve_web_url(base_url: &str, web_ui: &str) -> String {
  if web_ui.starts_with("http://") || web_ui.starts_with("https://") {
    return web_ui.to_string();
  }

  let base = base_url.trim_end_matches('/');
  if web_ui.starts_with('/') {
    format!("{base}{web_ui}")
  } else {
    format!("{base}/{web_ui}")
  }
}
