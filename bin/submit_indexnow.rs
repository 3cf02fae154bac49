//! Pushes every URL listed in the site's sitemap to IndexNow, so that
//! participating search engines pick up new pages without waiting for a crawl.

use std::error::Error;

use trackmcp_util::indexnow::{IndexNowClient, INDEXNOW_ENDPOINT};
use trackmcp_util::sitemap::load_submittable_urls;
use trackmcp_util::{http_client, logging};

const HOST: &str = "www.trackmcp.com";
const KEY: &str = "7c6867e98d7a4de8913fd966093b715f";
const KEY_LOCATION: &str = "https://www.trackmcp.com/7c6867e98d7a4de8913fd966093b715f.txt";
const SITEMAP_URL: &str = "https://www.trackmcp.com/sitemap.xml";

fn main() -> Result<(), Box<dyn Error>> {
  logging::init();
  let rule = "=".repeat(60);
  println!("{}", rule);
  println!("IndexNow Bulk URL Submission");
  println!("{}", rule);
  println!("Host: {}", HOST);
  println!("Key: {}", KEY);
  println!("Key Location: {}", KEY_LOCATION);
  println!("API Endpoint: {}", INDEXNOW_ENDPOINT);
  println!("{}\n", rule);

  let client = http_client()?;
  // nothing is submitted from a partial or broken sitemap; the log is the report.
  let urls = match load_submittable_urls(&client, SITEMAP_URL) {
    Some(urls) => urls,
    None => return Ok(()),
  };

  let submitter = IndexNowClient::new(client, HOST, KEY, KEY_LOCATION);
  let report = submitter.submit_all(&urls)?;

  println!("\n{}", rule);
  println!("Submission Complete!");
  println!("{}", rule);
  println!("Total URLs: {}", report.total_urls);
  println!("Total batches: {}", report.total_batches);
  println!("Successful batches: {}", report.successful_batches);
  if report.failed_batches() > 0 {
    println!("Failed batches: {}", report.failed_batches());
  }
  println!("\nNext steps:");
  println!("1. Check Bing Webmaster Tools: https://www.bing.com/webmasters");
  println!("2. Monitor indexing progress");
  println!("3. Check Google Search Console for crawl stats");
  Ok(())
}
