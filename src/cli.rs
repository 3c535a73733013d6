//! Command-line interface definitions for confluence-fetch.
//!
//! This module defines the CLI structure using clap derives. The binary is a
//! thin wrapper over [`crate::fetcher::fetch_content`]: connection settings
//! come from the environment, and the fetch result string is printed as-is.

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::color::ColorScheme;
use crate::commands::completions::handle_completions_command;
use crate::commands::fetch::handle_fetch;
use crate::commands::version::handle_version_command;

/// confluence-fetch - Fetch Confluence content as Markdown
#[derive(Debug, Parser)]
#[command(
  name = "confluence-fetch",
  version,
  about = "Fetch Confluence pages by ID or CQL query and render them as Markdown",
  long_about = "Fetches Confluence content by page ID or CQL query and renders it as Markdown\n\
                for chat/agent tools. Credentials come from the CONFLUENCE_API_TOKEN and\n\
                CONFLUENCE_BASE_URL environment variables.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Option<Command>,

  /// Fetch options
  #[command(flatten)]
  pub fetch: FetchOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Subcommands for introspection
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Fetch options
#[derive(Debug, Parser)]
pub struct FetchOptions {
  /// Confluence page ID to fetch (mutually exclusive with --cql)
  #[arg(long, value_name = "ID")]
  pub page_id: Option<String>,

  /// CQL query to search for content (mutually exclusive with --page-id)
  #[arg(long, value_name = "QUERY")]
  pub cql: Option<String>,

  /// Include child pages in the response (only applies to --page-id)
  #[arg(long, requires = "page_id")]
  pub children: bool,

  /// Maximum number of results to return
  #[arg(long, value_name = "N", default_value = "5", conflicts_with = "all")]
  pub max_results: usize,

  /// Return all results instead of capping them
  #[arg(long)]
  pub all: bool,
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

impl Cli {
  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid. The page-ID/CQL
  /// exclusivity rule is deliberately left to the fetcher so its uniform
  /// error strings surface unchanged.
  pub fn validate(&self) -> Result<(), String> {
    if self.command.is_none() && self.fetch.page_id.is_none() && self.fetch.cql.is_none() {
      return Err("Provide --page-id or --cql, or use a subcommand".to_string());
    }

    Ok(())
  }
}

/// Parse CLI arguments, initialize shared services, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse();

  init_tracing(&cli.behavior);

  // Create color scheme based on user preference
  let colors = ColorScheme::new(cli.behavior.color);

  // Validate CLI arguments
  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  // Handle subcommands
  if let Some(ref command) = cli.command {
    match command {
      Command::Version { json, short } => {
        handle_version_command(*json, *short, &colors);
      }
      Command::Completions { shell } => {
        handle_completions_command(*shell);
      }
    }
    return;
  }

  handle_fetch(&cli, &colors).await;
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
