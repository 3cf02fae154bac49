//! Exports every approved or pending MCP tool, together with its GitHub README
//! and generated meta description, into `mcp_page_data.xlsx`.
//!
//! Credentials come from `.env.local`:
//!   NEXT_PUBLIC_SUPABASE_URL, NEXT_PUBLIC_SUPABASE_ANON_KEY,
//!   and optionally NEXT_PUBLIC_GITHUB_TOKEN or GITHUB_TOKEN.

use std::error::Error;
use std::path::Path;
use std::process;

use trackmcp_util::catalog::CatalogClient;
use trackmcp_util::config::{ExporterConfig, SUPABASE_ANON_KEY_VAR, SUPABASE_URL_VAR};
use trackmcp_util::export::{build_rows, write_workbook, ExportSummary};
use trackmcp_util::readme::ReadmeFetcher;
use trackmcp_util::{http_client, logging};

const OUTPUT_FILE: &str = "mcp_page_data.xlsx";

fn main() -> Result<(), Box<dyn Error>> {
  logging::init();
  let config = match ExporterConfig::from_env() {
    Ok(config) => config,
    Err(e) => {
      tracing::error!("{}", e);
      eprintln!("   Please ensure .env.local has:");
      eprintln!("   {}=your_url", SUPABASE_URL_VAR);
      eprintln!("   {}=your_key", SUPABASE_ANON_KEY_VAR);
      process::exit(1);
    }
  };

  let rule = "=".repeat(60);
  println!("{}", rule);
  println!("MCP SERVER DATA EXPORT");
  println!("{}", rule);

  let client = http_client()?;
  let mut fetcher = ReadmeFetcher::new(client.clone(), config.github_token.clone());
  if fetcher.has_token() {
    tracing::info!("using GitHub token for API requests (5000 requests/hour)");
  } else {
    tracing::warn!("no GitHub token found, using unauthenticated requests (60 requests/hour)");
    tracing::warn!("  set GITHUB_TOKEN in .env.local for higher rate limits");
  }

  let catalog = CatalogClient::new(client, &config.supabase_url, &config.supabase_anon_key);
  let tools = catalog.fetch_all();
  if tools.is_empty() {
    tracing::error!("no tools found in database");
    process::exit(1);
  }

  let rows = build_rows(&tools, &mut fetcher);
  tracing::info!("creating Excel file...");
  let output_path = Path::new(OUTPUT_FILE);
  write_workbook(&rows, output_path)?;
  tracing::info!("Excel file created: {}", output_path.display());

  let summary = ExportSummary::from_rows(&rows);
  println!("{}", rule);
  println!("EXPORT SUMMARY");
  println!("{}", rule);
  println!("Total tools exported:        {}", summary.total);
  println!("Tools with README:           {}", summary.with_readme);
  println!("Tools without README:        {}", summary.without_readme);
  println!("Average stars:               {}", summary.average_stars);
  println!(
    "Top language:                {}",
    summary.top_language.as_deref().unwrap_or("N/A")
  );
  println!("Unique categories:           {}", summary.unique_categories);
  println!("{}", rule);
  println!("\nDone! Open the file: {}", OUTPUT_FILE);
  Ok(())
}
