//! The default command: fetch content and print it.

use std::process;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::fetcher::{self, FetchRequest};

/// Run the fetch described by the CLI flags and print the result.
///
/// The fetcher returns a single string either way; error strings go to
/// stderr with a non-zero exit code so shell pipelines can tell the cases
/// apart, successful markdown goes to stdout untouched.
pub(crate) async fn handle_fetch(cli: &Cli, colors: &ColorScheme) {
  let request = FetchRequest {
    page_id: cli.fetch.page_id.clone(),
    cql: cli.fetch.cql.clone(),
    include_children: cli.fetch.children,
    max_results: if cli.fetch.all { None } else { Some(cli.fetch.max_results) },
  };

  let output = fetcher::fetch_content(&request).await;

  if output.starts_with("Error") {
    eprintln!("{}", colors.error(&output));
    process::exit(1);
  }

  println!("{output}");
}
