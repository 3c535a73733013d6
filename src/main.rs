//! confluence-fetch - Fetch Confluence content as Markdown
//!
//! This is the main entry point for the CLI application.

use confluence_fetch::cli;

#[tokio::main]
async fn main() {
  cli::run().await;
}
