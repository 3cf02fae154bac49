//! README lookups against the GitHub contents API, cached per run.

use std::collections::HashMap;
use std::fmt;
use std::thread;
use std::time::Duration;

use chrono::{Local, TimeZone};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::warn;

pub const GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Result of a README lookup. `Display` renders the text written to the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readme {
  Content(String),
  NotFound,
  RateLimited,
  Status(u16),
  Error(String),
}

impl Readme {
  pub fn content(&self) -> Option<&str> {
    match self {
      Readme::Content(text) => Some(text),
      _ => None,
    }
  }
}

impl fmt::Display for Readme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Readme::Content(text) => f.write_str(text),
      Readme::NotFound => f.write_str("No README found"),
      Readme::RateLimited => f.write_str("Rate limit exceeded"),
      Readme::Status(code) => write!(f, "Error: HTTP {}", code),
      Readme::Error(message) => write!(f, "Error: {}", message),
    }
  }
}

#[derive(Deserialize)]
struct ReadmeMeta {
  download_url: Option<String>,
}

/// Owner and repository name taken from the last two path segments of `url`.
pub fn owner_and_repo(url: &str) -> Option<(&str, &str)> {
  let mut segments = url.trim_end_matches('/').rsplit('/');
  let repo = segments.next().filter(|s| !s.is_empty())?;
  let owner = segments.next().filter(|s| !s.is_empty() && !s.ends_with(':'))?;
  Some((owner, repo))
}

/// Renders a unix timestamp header value as local `YYYY-MM-DD HH:MM:SS`.
pub fn format_reset_time(header: &str) -> Option<String> {
  let secs: i64 = header.trim().parse().ok()?;
  Local
    .timestamp_opt(secs, 0)
    .single()
    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

pub struct ReadmeFetcher {
  client: Client,
  api_base: String,
  token: Option<String>,
  delay: Duration,
  cache: HashMap<String, Readme>,
  fetches: usize,
}

impl ReadmeFetcher {
  pub fn new(client: Client, token: Option<String>) -> Self {
    ReadmeFetcher {
      client,
      api_base: GITHUB_API.to_string(),
      token,
      delay: DEFAULT_DELAY,
      cache: HashMap::new(),
      fetches: 0,
    }
  }

  pub fn with_api_base(mut self, api_base: &str) -> Self {
    self.api_base = api_base.trim_end_matches('/').to_string();
    self
  }

  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  pub fn has_token(&self) -> bool {
    self.token.is_some()
  }

  /// Number of README metadata requests issued so far.
  pub fn fetch_count(&self) -> usize {
    self.fetches
  }

  /// Looks up the README of `github_url`, hitting the network only on a cache miss.
  pub fn fetch(&mut self, github_url: &str) -> Readme {
    if let Some(cached) = self.cache.get(github_url) {
      return cached.clone();
    }
    let readme = self.fetch_uncached(github_url);
    self.cache.insert(github_url.to_string(), readme.clone());
    readme
  }

  fn fetch_uncached(&mut self, github_url: &str) -> Readme {
    let (owner, repo) = match owner_and_repo(github_url) {
      Some(parts) => parts,
      None => return Readme::Error(format!("cannot find owner/repo in {}", github_url)),
    };
    let readme_url = format!("{}/repos/{}/{}/readme", self.api_base, owner, repo);

    // stay under the API rate limit.
    thread::sleep(self.delay);
    self.fetches += 1;

    let mut request = self
      .client
      .get(&readme_url)
      .header("Accept", "application/vnd.github.v3+json");
    if let Some(token) = &self.token {
      request = request.header("Authorization", format!("token {}", token));
    }
    let resp = match request.send() {
      Ok(resp) => resp,
      Err(e) => {
        warn!("error fetching README for {}: {}", github_url, e);
        return Readme::Error(e.to_string());
      }
    };

    match resp.status().as_u16() {
      200 => {
        let download_url = match resp.json::<ReadmeMeta>() {
          Ok(ReadmeMeta {
            download_url: Some(url),
          }) => url,
          Ok(_) => return Readme::Error("README has no download_url".to_string()),
          Err(e) => return Readme::Error(e.to_string()),
        };
        match self.client.get(&download_url).send() {
          Ok(content) if content.status() == 200 => match content.text() {
            Ok(text) => Readme::Content(text),
            Err(e) => Readme::Error(e.to_string()),
          },
          Ok(content) => Readme::Status(content.status().as_u16()),
          Err(e) => {
            warn!("error downloading README for {}: {}", github_url, e);
            Readme::Error(e.to_string())
          }
        }
      }
      404 => Readme::NotFound,
      403 => {
        warn!("GitHub API rate limit exceeded!");
        if let Some(reset) = resp
          .headers()
          .get("X-RateLimit-Reset")
          .and_then(|v| v.to_str().ok())
          .and_then(format_reset_time)
        {
          warn!("  rate limit resets at: {}", reset);
        }
        warn!("  consider adding GITHUB_TOKEN to .env.local");
        Readme::RateLimited
      }
      other => Readme::Status(other),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_owner_and_repo() {
    assert_eq!(
      owner_and_repo("https://github.com/modelcontextprotocol/servers/"),
      Some(("modelcontextprotocol", "servers"))
    );
    assert_eq!(owner_and_repo("https://github.com/a/b/tree/main"), Some(("tree", "main")));
    assert_eq!(owner_and_repo("https://github.com"), None);
    assert_eq!(owner_and_repo(""), None);
  }

  #[test]
  fn sentinels_match_export_text() {
    assert_eq!(Readme::NotFound.to_string(), "No README found");
    assert_eq!(Readme::RateLimited.to_string(), "Rate limit exceeded");
    assert_eq!(Readme::Status(502).to_string(), "Error: HTTP 502");
    assert_eq!(Readme::Error("boom".into()).to_string(), "Error: boom");
    assert_eq!(Readme::Content("# hi".into()).to_string(), "# hi");
  }

  #[test]
  fn reset_header_must_be_numeric() {
    assert!(format_reset_time("1700000000").is_some());
    assert_eq!(format_reset_time("soon"), None);
  }
}
