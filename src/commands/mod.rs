//! Command handlers for the confluence-fetch CLI.

pub mod completions;
pub mod fetch;
pub mod version;
