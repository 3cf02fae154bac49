//! Flattens catalog records into spreadsheet rows and writes the workbook.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::catalog::CatalogRecord;
use crate::meta::meta_description;
use crate::readme::{Readme, ReadmeFetcher};
use crate::Result;

pub const SHEET_NAME: &str = "MCP Tools";
/// Longest text a single spreadsheet cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;
pub const NO_URL: &str = "No URL";

/// Header text and column width, in column order.
pub const COLUMNS: [(&str, f64); 10] = [
  ("Title", 30.0),
  ("Repository URL", 50.0),
  ("README Content", 80.0),
  ("Existing Meta Description", 50.0),
  ("Stars", 10.0),
  ("Language", 15.0),
  ("Topics", 40.0),
  ("Category", 20.0),
  ("Status", 15.0),
  ("Description", 50.0),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
  pub title: String,
  pub repository_url: String,
  pub readme: String,
  pub meta_description: String,
  pub stars: u64,
  pub language: String,
  pub topics: String,
  pub category: String,
  pub status: String,
  pub description: String,
}

impl ExportRow {
  /// Projects `record` into a row. `readme` is the lookup text for its repository.
  pub fn new(record: &CatalogRecord, readme: String) -> Self {
    ExportRow {
      title: record
        .repo_name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_string()),
      repository_url: record.github_url.clone().unwrap_or_default(),
      readme,
      meta_description: meta_description(record),
      stars: record.stars.unwrap_or(0),
      language: record.language.clone().unwrap_or_default(),
      topics: record.topics.as_deref().unwrap_or_default().join(", "),
      category: record.category.clone().unwrap_or_default(),
      status: record
        .status
        .as_ref()
        .map(|s| s.as_str().to_string())
        .unwrap_or_default(),
      description: record.description.clone().unwrap_or_default(),
    }
  }
}

/// Builds one row per record, fetching READMEs through `fetcher`.
pub fn build_rows(records: &[CatalogRecord], fetcher: &mut ReadmeFetcher) -> Vec<ExportRow> {
  info!("processing tools and fetching README files...");
  let total = records.len();
  let mut rows = Vec::with_capacity(total);
  for (index, record) in records.iter().enumerate() {
    let position = index + 1;
    if position % 10 == 0 || position == total {
      info!(
        "  processing {}/{} tools... ({})",
        position,
        total,
        record.repo_name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unknown")
      );
    }
    let readme = match record.github_url.as_deref().filter(|url| !url.is_empty()) {
      Some(url) => fetcher.fetch(url).to_string(),
      None => NO_URL.to_string(),
    };
    rows.push(ExportRow::new(record, readme));
  }
  rows
}

fn cell_text(text: &str) -> String {
  match text.char_indices().nth(MAX_CELL_CHARS) {
    Some((cut, _)) => text[..cut].to_string(),
    None => text.to_string(),
  }
}

/// Writes `rows` to a single-sheet workbook at `path` with a frozen header row.
pub fn write_workbook(rows: &[ExportRow], path: &Path) -> Result<()> {
  let mut workbook = Workbook::new();
  let header_format = Format::new().set_bold();
  let worksheet = workbook.add_worksheet();
  worksheet.set_name(SHEET_NAME)?;

  for (col, (header, width)) in COLUMNS.iter().enumerate() {
    let col = col as u16;
    worksheet.write_string_with_format(0, col, *header, &header_format)?;
    worksheet.set_column_width(col, *width)?;
  }

  for (index, row) in rows.iter().enumerate() {
    let r = index as u32 + 1;
    worksheet.write_string(r, 0, cell_text(&row.title))?;
    worksheet.write_string(r, 1, cell_text(&row.repository_url))?;
    worksheet.write_string(r, 2, cell_text(&row.readme))?;
    worksheet.write_string(r, 3, cell_text(&row.meta_description))?;
    worksheet.write_number(r, 4, row.stars as f64)?;
    worksheet.write_string(r, 5, cell_text(&row.language))?;
    worksheet.write_string(r, 6, cell_text(&row.topics))?;
    worksheet.write_string(r, 7, cell_text(&row.category))?;
    worksheet.write_string(r, 8, cell_text(&row.status))?;
    worksheet.write_string(r, 9, cell_text(&row.description))?;
  }

  worksheet.set_freeze_panes(1, 0)?;
  workbook.save(path)?;
  Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
  pub total: usize,
  pub with_readme: usize,
  pub without_readme: usize,
  pub average_stars: u64,
  pub top_language: Option<String>,
  pub unique_categories: usize,
}

impl ExportSummary {
  pub fn from_rows(rows: &[ExportRow]) -> Self {
    let not_found = Readme::NotFound.to_string();
    let star_sum: u64 = rows.iter().map(|r| r.stars).sum();
    let average_stars = if rows.is_empty() {
      0
    } else {
      (star_sum as f64 / rows.len() as f64).round() as u64
    };

    let mut language_counts: HashMap<&str, usize> = HashMap::new();
    let mut language_order = Vec::new();
    for row in rows.iter().filter(|r| !r.language.is_empty()) {
      let count = language_counts.entry(row.language.as_str()).or_insert(0);
      if *count == 0 {
        language_order.push(row.language.as_str());
      }
      *count += 1;
    }
    // ties go to the language seen first.
    let mut top_language: Option<(&str, usize)> = None;
    for language in language_order {
      let count = language_counts[language];
      if top_language.map_or(true, |(_, best)| count > best) {
        top_language = Some((language, count));
      }
    }

    let categories: HashSet<&str> = rows
      .iter()
      .filter(|r| !r.category.is_empty())
      .map(|r| r.category.as_str())
      .collect();

    ExportSummary {
      total: rows.len(),
      with_readme: rows.iter().filter(|r| r.readme.chars().count() > 100).count(),
      without_readme: rows.iter().filter(|r| r.readme == not_found).count(),
      average_stars,
      top_language: top_language.map(|(language, _)| language.to_string()),
      unique_categories: categories.len(),
    }
  }
}
