//! Confluence module providing the API abstraction, the HTTP client, data
//! models, and child-page traversal.

pub mod api;
pub mod client;
pub mod models;
pub mod tree;

pub use api::ConfluenceApi;
pub use client::ConfluenceClient;
pub use models::{ChildPagesResponse, Page, PageBody, PageLinks, PageSpace, SearchResponse, StorageFormat, ViewFormat};
pub use tree::collect_page_with_children;
