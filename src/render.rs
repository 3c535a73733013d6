//! Markdown rendering of retrieved documents.
//!
//! Each document becomes one section: a level-1 heading, bolded metadata
//! lines, a horizontal rule, and the body text. Missing metadata falls back
//! to placeholder values; the URL line is omitted entirely when no URL is
//! known.

use crate::document::Document;

/// Placeholder heading for documents without a title.
const DEFAULT_TITLE: &str = "Untitled";
/// Placeholder for documents without a page identifier.
const DEFAULT_PAGE_ID: &str = "unknown";
/// Placeholder for documents without space metadata.
const DEFAULT_SPACE: &str = "Unknown Space";

/// Render all documents as markdown, sections separated by a blank line, in
/// the order given.
pub fn render_documents(documents: &[Document]) -> String {
  documents
    .iter()
    .map(document_section)
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Render a single document section.
pub fn document_section(document: &Document) -> String {
  let title = document.title.as_deref().unwrap_or(DEFAULT_TITLE);
  let page_id = document.page_id.as_deref().unwrap_or(DEFAULT_PAGE_ID);
  let space = document.space_name.as_deref().unwrap_or(DEFAULT_SPACE);

  let mut section = format!("# {title}\n\n");
  section.push_str(&format!("**Page ID:** {page_id}\n"));
  section.push_str(&format!("**Space:** {space}\n"));
  if let Some(url) = document.url.as_deref()
    && !url.is_empty()
  {
    section.push_str(&format!("**URL:** {url}\n"));
  }
  section.push_str(&format!("\n---\n\n{}\n", document.text));

  section
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_document() -> Document {
    Document {
      page_id: Some("123456".to_string()),
      title: Some("Getting Started Guide".to_string()),
      space_name: Some("Documentation".to_string()),
      url: Some("https://example.atlassian.net/wiki/spaces/DOCS/pages/123456".to_string()),
      text: "Welcome to our documentation!".to_string(),
    }
  }

  #[test]
  fn section_layout_with_full_metadata() {
    let section = document_section(&sample_document());
    assert_eq!(
      section,
      "# Getting Started Guide\n\n\
       **Page ID:** 123456\n\
       **Space:** Documentation\n\
       **URL:** https://example.atlassian.net/wiki/spaces/DOCS/pages/123456\n\
       \n---\n\n\
       Welcome to our documentation!\n"
    );
  }

  #[test]
  fn missing_title_renders_untitled() {
    let document = Document {
      title: None,
      ..sample_document()
    };
    assert!(document_section(&document).starts_with("# Untitled\n"));
  }

  #[test]
  fn missing_page_id_and_space_use_placeholders() {
    let document = Document {
      page_id: None,
      space_name: None,
      ..sample_document()
    };
    let section = document_section(&document);
    assert!(section.contains("**Page ID:** unknown\n"));
    assert!(section.contains("**Space:** Unknown Space\n"));
  }

  #[test]
  fn absent_or_empty_url_suppresses_the_url_line() {
    let without = Document {
      url: None,
      ..sample_document()
    };
    assert!(!document_section(&without).contains("**URL:**"));

    let empty = Document {
      url: Some(String::new()),
      ..sample_document()
    };
    assert!(!document_section(&empty).contains("**URL:**"));
  }

  #[test]
  fn documents_join_with_a_blank_line_in_order() {
    let first = Document {
      title: Some("A".to_string()),
      ..Document::default()
    };
    let second = Document {
      title: Some("B".to_string()),
      ..Document::default()
    };

    let output = render_documents(&[first, second]);

    let a_pos = output.find("# A").unwrap();
    let b_pos = output.find("# B").unwrap();
    assert!(a_pos < b_pos);
    assert!(output.contains("\n\n# B"));
  }
}
