//! Search-snippet descriptions for catalog pages.

use crate::catalog::CatalogRecord;

pub const DEFAULT_DESCRIPTION: &str = "Model Context Protocol tool";
/// Descriptions longer than this are truncated.
pub const TRUNCATE_ABOVE: usize = 155;
/// Descriptions shorter than this get context clauses appended.
pub const EXTEND_BELOW: usize = 120;
pub const MAX_LENGTH: usize = 160;

/// Builds the meta description for `record`. Lengths count characters, not bytes.
pub fn meta_description(record: &CatalogRecord) -> String {
  let description = record
    .description
    .as_deref()
    .filter(|d| !d.is_empty())
    .unwrap_or(DEFAULT_DESCRIPTION);
  let stars = record.stars.unwrap_or(0);
  let language = record.language.as_deref().unwrap_or("");
  let len = description.chars().count();

  if len > TRUNCATE_ABOVE {
    let head: String = description.chars().take(TRUNCATE_ABOVE - 3).collect();
    return head + "...";
  }

  if len < EXTEND_BELOW {
    let lower = description.to_lowercase();
    let mut clauses = Vec::new();
    if stars > 100 {
      clauses.push(format!("⭐ {} stars", format_thousands(stars)));
    }
    if !language.is_empty() && !lower.contains(&language.to_lowercase()) {
      clauses.push(format!("{} implementation", language));
    }
    if !lower.contains("mcp") && !lower.contains("model context protocol") {
      clauses.push("MCP tool for AI development".to_string());
    }
    if !clauses.is_empty() {
      let extended = format!("{}. {}.", description, clauses.join(". "));
      return extended.chars().take(MAX_LENGTH).collect();
    }
  }

  description.to_string()
}

/// `1234567` -> `1,234,567`.
pub fn format_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}
