use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Result;

const GITHUB_PREFIX: &str = "https://github.com/";

lazy_static! {
  static ref GITHUB_REPO_REGEX: Regex = Regex::new(r"https://github\.com/[\w-]+/[\w.-]+").unwrap();
}

/// The JSON document handed to the bulk submission tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlList {
  pub urls: Vec<String>,
}

impl UrlList {
  pub fn write_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, self)?;
    writer.flush()?;
    Ok(())
  }
}

/// Reduces a GitHub URL to `https://github.com/owner/repo`, dropping every
/// `.git` occurrence. Returns `None` when no owner/repo pair survives the cleanup.
pub fn normalize_github_url(url: &str) -> Option<String> {
  let url = url.trim_end_matches('/');
  let url = url.split('#').next().unwrap_or_default();
  let url = url.split('?').next().unwrap_or_default();
  let path = url.strip_prefix(GITHUB_PREFIX)?;

  let mut segments = path.split('/');
  let owner = strip_git(segments.next().unwrap_or_default());
  let repo = strip_git(segments.next().unwrap_or_default());
  if owner.is_empty() || repo.is_empty() {
    return None;
  }
  Some(format!("{}{}/{}", GITHUB_PREFIX, owner, repo))
}

// repeats until stable so a removal cannot leave a fresh `.git` behind.
fn strip_git(segment: &str) -> String {
  let mut segment = segment.to_string();
  while segment.contains(".git") {
    segment = segment.replace(".git", "");
  }
  segment
}

/// Pulls repository URLs out of free text, one candidate per line, keeping
/// the first occurrence of each normalized URL.
pub fn parse_github_urls(text: &str) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut urls = Vec::new();
  for line in text.lines().map(str::trim) {
    if line.is_empty() || !line.contains("github.com") {
      continue;
    }
    let Some(found) = GITHUB_REPO_REGEX.find(line) else {
      continue;
    };
    if let Some(url) = normalize_github_url(found.as_str()) {
      if seen.insert(url.clone()) {
        urls.push(url);
      }
    }
  }
  urls
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn variants_collapse_to_one_repo() {
    let text = "\
https://github.com/a/b
https://github.com/a/b/
https://github.com/a/b.git
https://github.com/a/b/issues/5
";
    assert_eq!(parse_github_urls(text), vec!["https://github.com/a/b"]);
  }

  #[test]
  fn normalization_is_idempotent() {
    for raw in [
      "https://github.com/owner/repo/",
      "https://github.com/owner/repo#readme",
      "https://github.com/owner/repo?tab=readme",
      "https://github.com/owner/repo/tree/main/src",
      "https://github.com/owner/repo.git",
      "https://github.com/owner/owner.github.io",
      "https://github.com/owner/repo.git.bak",
    ] {
      let once = normalize_github_url(raw).unwrap();
      assert_eq!(normalize_github_url(&once).as_deref(), Some(once.as_str()));
    }
  }

  #[test]
  fn drops_git_anywhere_in_the_repo_name() {
    assert_eq!(
      normalize_github_url("https://github.com/a/b.git.bak").as_deref(),
      Some("https://github.com/a/b.bak")
    );
    assert_eq!(
      normalize_github_url("https://github.com/me/me.github.io").as_deref(),
      Some("https://github.com/me/mehub.io")
    );
    assert_eq!(
      normalize_github_url("https://github.com/a/x..gitgit").as_deref(),
      Some("https://github.com/a/x")
    );
  }

  #[test]
  fn extracts_from_surrounding_text_in_first_seen_order() {
    let text = "\
- zeta: https://github.com/z/zeta (great)
not a link
* alpha -> https://github.com/a/alpha_tool.
see http://github.com/insecure/skip
https://gitlab.com/x/y
https://github.com/z/zeta/pulls
two per line https://github.com/one/first https://github.com/two/second
";
    assert_eq!(
      parse_github_urls(text),
      vec![
        "https://github.com/z/zeta",
        "https://github.com/a/alpha_tool.",
        "https://github.com/one/first",
      ]
    );
  }

  #[test]
  fn dedup_is_case_sensitive() {
    let text = "https://github.com/Owner/Repo\nhttps://github.com/owner/repo\n";
    assert_eq!(parse_github_urls(text).len(), 2);
  }

  #[test]
  fn rejects_missing_repo() {
    assert_eq!(normalize_github_url("https://github.com/owner"), None);
    assert_eq!(normalize_github_url("https://github.com/owner/.git"), None);
    assert_eq!(normalize_github_url("https://example.com/owner/repo"), None);
  }
}
