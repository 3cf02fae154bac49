//! Maintenance utilities for the trackmcp.com directory: IndexNow sitemap
//! submission, catalog export with README enrichment, and GitHub URL
//! extraction from pasted text.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod github_urls;
pub mod indexnow;
pub mod logging;
pub mod meta;
pub mod readme;
pub mod sitemap;

pub use error::{Error, Result};

/// User agent sent with every outgoing request.
pub const USER_AGENT: &str = "trackmcp-util (https://www.trackmcp.com)";
/// Per-request timeout applied by every client in this crate.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Builds the blocking client shared by a script's requests.
pub fn http_client() -> Result<reqwest::blocking::Client> {
  let client = reqwest::blocking::Client::builder()
    .user_agent(USER_AGENT)
    .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
    .build()?;
  Ok(client)
}
