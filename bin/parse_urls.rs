//! Collects GitHub repository URLs from pasted text (a file, or stdin when no
//! file is given) and writes them as `{"urls": [...]}` for bulk submission.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use trackmcp_util::github_urls::{parse_github_urls, UrlList};
use trackmcp_util::logging;

const OUTPUT_FILEPATH: &str = "scripts/bulk-urls-to-submit.json";
const PREVIEW_LEN: usize = 10;

#[derive(Parser, Debug)]
#[command(about = "Extract unique GitHub repository URLs from text")]
struct Args {
  /// Text file to scan; reads stdin when omitted.
  input: Option<PathBuf>,
  /// Where to write the JSON list.
  #[arg(short, long, default_value = OUTPUT_FILEPATH)]
  output: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
  logging::init();
  let args = Args::parse();
  let text = match &args.input {
    Some(path) => fs::read_to_string(path)?,
    None => {
      let mut buffer = String::new();
      io::stdin().read_to_string(&mut buffer)?;
      buffer
    }
  };

  let list = UrlList {
    urls: parse_github_urls(&text),
  };
  list.write_to(&args.output)?;

  println!("Created {}", args.output.display());
  println!("Found {} unique valid GitHub repository URLs", list.urls.len());
  println!("\nFirst {} URLs:", PREVIEW_LEN);
  for (i, url) in list.urls.iter().take(PREVIEW_LEN).enumerate() {
    println!("  {}. {}", i + 1, url);
  }
  if list.urls.len() > PREVIEW_LEN {
    println!("\n... and {} more", list.urls.len() - PREVIEW_LEN);
  }
  Ok(())
}
