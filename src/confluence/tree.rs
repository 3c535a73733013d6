//! Utilities for traversing Confluence page hierarchies.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use tracing::warn;

use super::api::ConfluenceApi;
use super::models::Page;

/// Fetch a page together with all of its descendants, depth-first.
///
/// The root page always comes first; descendants follow in traversal order.
/// Individual child failures are logged and skipped so one broken page does
/// not sink the whole subtree, but a failure on the root propagates.
///
/// # Arguments
/// * `client` - API implementation used for fetching page and child metadata.
/// * `page_id` - Identifier of the root page.
/// * `max_results` - Optional cap on the number of collected pages; `None`
///   collects the entire subtree.
///
/// # Returns
/// The flattened list of pages, capped at `max_results` when given.
///
/// # Errors
/// Returns an error when the root page cannot be fetched.
pub async fn collect_page_with_children(
  client: &dyn ConfluenceApi,
  page_id: &str,
  max_results: Option<usize>,
) -> Result<Vec<Page>> {
  let mut pages = Vec::new();
  let mut visited = HashSet::new();

  collect_recursive(client, page_id, max_results, &mut pages, &mut visited).await?;

  Ok(pages)
}

/// Recursive helper that accumulates pages while tracking visited nodes.
///
/// The visited set guards against circular parent/child references; a page
/// seen twice is silently skipped rather than treated as an error, since the
/// first visit already captured its content.
fn collect_recursive<'a>(
  client: &'a dyn ConfluenceApi,
  page_id: &'a str,
  max_results: Option<usize>,
  pages: &'a mut Vec<Page>,
  visited: &'a mut HashSet<String>,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
  Box::pin(async move {
    if !visited.insert(page_id.to_string()) {
      return Ok(());
    }

    if max_results.is_some_and(|cap| pages.len() >= cap) {
      return Ok(());
    }

    let page = client.get_page(page_id).await?;
    pages.push(page);

    if max_results.is_some_and(|cap| pages.len() >= cap) {
      return Ok(());
    }

    let child_pages = client.get_child_pages(page_id).await?;

    for child in child_pages {
      let child_id = child.id.clone();
      if let Err(e) = collect_recursive(client, &child_id, max_results, pages, visited).await {
        warn!("failed to fetch child page {child_id}: {e}");
      }

      if max_results.is_some_and(|cap| pages.len() >= cap) {
        break;
      }
    }

    Ok(())
  })
}
