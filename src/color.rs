//! Color utilities for terminal output
//!
//! This module provides consistent color handling across the application,
//! respecting user preferences and terminal capabilities.

use owo_colors::OwoColorize;

use crate::cli::ColorOption;

/// Color scheme for the application
///
/// This provides semantic color names that make the code more readable
/// and ensure consistent visual design across the application.
pub struct ColorScheme {
  enabled: bool,
}

impl ColorScheme {
  /// Create a new color scheme based on user preference and terminal
  /// capabilities
  pub fn new(color_option: ColorOption) -> Self {
    let enabled = match color_option {
      ColorOption::Always => true,
      ColorOption::Never => false,
      ColorOption::Auto => {
        // Check if stdout is a TTY
        use std::io::IsTerminal;
        std::io::stdout().is_terminal()
      }
    };

    Self { enabled }
  }

  /// Style for error messages (bright red)
  pub fn error<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bright_red().bold())
    } else {
      text.to_string()
    }
  }

  /// Style for emphasized text (bold)
  pub fn emphasis<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bold())
    } else {
      text.to_string()
    }
  }

  /// Style for de-emphasized text (bright black/gray)
  pub fn dimmed<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bright_black())
    } else {
      text.to_string()
    }
  }

  /// Style for numbers and counts (bright cyan)
  pub fn number<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bright_cyan())
    } else {
      text.to_string()
    }
  }

  /// Style for inline code and identifiers (bright green)
  pub fn code<T: std::fmt::Display>(&self, text: T) -> String {
    if self.enabled {
      format!("{}", text.bright_green())
    } else {
      text.to_string()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn disabled_scheme_passes_text_through() {
    let colors = ColorScheme::new(ColorOption::Never);
    assert_eq!(colors.error("boom"), "boom");
    assert_eq!(colors.emphasis("title"), "title");
    assert_eq!(colors.number(42), "42");
  }

  #[test]
  fn enabled_scheme_adds_escape_codes() {
    let colors = ColorScheme::new(ColorOption::Always);
    assert_ne!(colors.error("boom"), "boom");
    assert!(colors.error("boom").contains("boom"));
  }
}
