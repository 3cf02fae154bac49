//! Read-only access to the `mcp_tools` table through its REST interface.

use std::fmt;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 50;
const SELECT_COLUMNS: &str = "id,repo_name,description,stars,language,topics,github_url,category,status";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
  Number(i64),
  Text(String),
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecordId::Number(n) => write!(f, "{}", n),
      RecordId::Text(s) => f.write_str(s),
    }
  }
}

/// Lifecycle state of a catalog entry. Unknown states are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Status {
  Approved,
  Pending,
  Other(String),
}

impl Status {
  pub fn as_str(&self) -> &str {
    match self {
      Status::Approved => "approved",
      Status::Pending => "pending",
      Status::Other(s) => s,
    }
  }
}

impl From<String> for Status {
  fn from(value: String) -> Self {
    match value.as_str() {
      "approved" => Status::Approved,
      "pending" => Status::Pending,
      _ => Status::Other(value),
    }
  }
}

/// One row of `mcp_tools`. Every column except `id` may be null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogRecord {
  #[serde(default)]
  pub id: Option<RecordId>,
  #[serde(default)]
  pub repo_name: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub stars: Option<u64>,
  #[serde(default)]
  pub language: Option<String>,
  #[serde(default)]
  pub topics: Option<Vec<String>>,
  #[serde(default)]
  pub github_url: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub status: Option<Status>,
}

pub struct CatalogClient {
  client: Client,
  base_url: String,
  anon_key: String,
  page_size: usize,
  statuses: Vec<Status>,
}

impl CatalogClient {
  pub fn new(client: Client, base_url: &str, anon_key: &str) -> Self {
    CatalogClient {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      anon_key: anon_key.to_string(),
      page_size: DEFAULT_PAGE_SIZE,
      statuses: vec![Status::Approved, Status::Pending],
    }
  }

  pub fn with_page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size.max(1);
    self
  }

  pub fn with_statuses(mut self, statuses: Vec<Status>) -> Self {
    self.statuses = statuses;
    self
  }

  fn status_filter(&self) -> String {
    let names: Vec<&str> = self.statuses.iter().map(Status::as_str).collect();
    format!("in.({})", names.join(","))
  }

  /// Fetches one page of records, highest star count first.
  pub fn fetch_page(&self, offset: usize) -> Result<Vec<CatalogRecord>> {
    let url = format!("{}/rest/v1/mcp_tools", self.base_url);
    let limit = self.page_size.to_string();
    let offset = offset.to_string();
    let status = self.status_filter();
    let resp = self
      .client
      .get(&url)
      .header("apikey", &self.anon_key)
      .bearer_auth(&self.anon_key)
      .header("Content-Type", "application/json")
      .query(&[
        ("select", SELECT_COLUMNS),
        ("status", status.as_str()),
        ("order", "stars.desc"),
        ("limit", limit.as_str()),
        ("offset", offset.as_str()),
      ])
      .send()?;
    if !resp.status().is_success() {
      return Err(Error::Status {
        status: resp.status().as_u16(),
        url,
      });
    }
    Ok(resp.json()?)
  }

  /// Pages through the table until a short or empty page. A failed request
  /// ends the walk early; the records gathered up to that point are returned.
  pub fn fetch_all(&self) -> Vec<CatalogRecord> {
    info!("fetching MCP tools from the catalog...");
    let mut records = Vec::new();
    let mut offset = 0;
    loop {
      let page = match self.fetch_page(offset) {
        Ok(page) => page,
        Err(e) => {
          error!("error fetching from the catalog: {}", e);
          break;
        }
      };
      if page.is_empty() {
        break;
      }
      let page_len = page.len();
      records.extend(page);
      info!("  fetched {} tools...", records.len());
      if page_len < self.page_size {
        break;
      }
      offset += self.page_size;
    }
    info!("fetched {} tools from the catalog", records.len());
    records
  }
}
