use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use reqwest::blocking::Client;
use tracing::{error, info};

use crate::{Error, Result};

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

fn xml_error(e: impl std::fmt::Display) -> Error {
  Error::Xml(e.to_string())
}

/// Extracts the `<url><loc>` entries of a sitemap document, in document order.
/// The whole document must be well formed; nothing is returned otherwise.
pub fn parse_sitemap(payload: &str) -> Result<Vec<String>> {
  let mut reader = NsReader::from_str(payload);
  reader.config_mut().trim_text(true);

  // <urlset xmlns="..."><url><loc>https://...</loc></url>...</urlset>
  // each open element: (in the sitemap namespace, local name)
  let mut open: Vec<(bool, Vec<u8>)> = Vec::new();
  let mut saw_root = false;
  let mut loc = String::new();
  let mut urls = Vec::new();

  let in_loc = |open: &[(bool, Vec<u8>)]| {
    open.len() == 3
      && open[1] == (true, b"url".to_vec())
      && open[2] == (true, b"loc".to_vec())
  };

  loop {
    match reader.read_resolved_event().map_err(xml_error)? {
      (ns, Event::Start(e)) => {
        let in_sitemap_ns = matches!(ns, ResolveResult::Bound(Namespace(n)) if n == SITEMAP_NAMESPACE.as_bytes());
        open.push((in_sitemap_ns, e.local_name().as_ref().to_vec()));
        saw_root = true;
        if in_loc(&open) {
          loc.clear();
        }
      }
      (_, Event::Empty(_)) => saw_root = true,
      (_, Event::Text(e)) => {
        if in_loc(&open) {
          loc.push_str(&e.unescape().map_err(xml_error)?);
        }
      }
      (_, Event::CData(e)) => {
        if in_loc(&open) {
          loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
        }
      }
      (_, Event::End(_)) => {
        if in_loc(&open) {
          let value = loc.trim();
          if !value.is_empty() {
            urls.push(value.to_string());
          }
        }
        open.pop();
      }
      (_, Event::Eof) => break,
      _ => {}
    }
  }

  if !saw_root {
    return Err(Error::Xml("document has no root element".to_string()));
  }
  if !open.is_empty() {
    return Err(Error::Xml("unexpected end of document".to_string()));
  }
  Ok(urls)
}

/// Downloads and parses a sitemap. Any fetch failure, non-200 status or parse
/// failure is an error: a partial URL list is never returned.
pub fn fetch_sitemap(client: &Client, sitemap_url: &str) -> Result<Vec<String>> {
  info!("fetching URLs from sitemap: {}", sitemap_url);
  let resp = client.get(sitemap_url).send()?;
  let status = resp.status();
  if status != 200 {
    return Err(Error::Status {
      status: status.as_u16(),
      url: sitemap_url.to_string(),
    });
  }
  let payload = resp.text()?;
  let urls = parse_sitemap(&payload)?;
  info!("found {} URLs", urls.len());
  Ok(urls)
}

/// Sitemap URLs ready for submission, or `None` after logging why the run
/// has nothing to submit (fetch failure, malformed document, no entries).
pub fn load_submittable_urls(client: &Client, sitemap_url: &str) -> Option<Vec<String>> {
  match fetch_sitemap(client, sitemap_url) {
    Ok(urls) if urls.is_empty() => {
      error!("{}", Error::EmptySitemap(sitemap_url.to_string()));
      None
    }
    Ok(urls) => Some(urls),
    Err(e) => {
      error!("error fetching sitemap: {}", e);
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://www.trackmcp.com/</loc><priority>1.0</priority></url>
  <url>
    <loc>
      https://www.trackmcp.com/tool/a
    </loc>
  </url>
  <url><loc></loc></url>
  <url><loc>https://www.trackmcp.com/tool/b</loc></url>
</urlset>"#;

  #[test]
  fn extracts_locs_in_order() {
    let urls = parse_sitemap(SITEMAP).unwrap();
    assert_eq!(
      urls,
      vec![
        "https://www.trackmcp.com/",
        "https://www.trackmcp.com/tool/a",
        "https://www.trackmcp.com/tool/b",
      ]
    );
  }

  #[test]
  fn ignores_locs_outside_the_sitemap_namespace() {
    let doc = r#"<urlset xmlns="http://example.com/other"><url><loc>https://x/</loc></url></urlset>"#;
    assert!(parse_sitemap(doc).unwrap().is_empty());
  }

  #[test]
  fn unescapes_entities_in_locs() {
    let doc = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://x/?a=1&amp;b=2</loc></url></urlset>"#;
    assert_eq!(parse_sitemap(doc).unwrap(), vec!["https://x/?a=1&b=2"]);
  }

  #[test]
  fn rejects_empty_and_mismatched_documents() {
    assert!(matches!(parse_sitemap(""), Err(Error::Xml(_))));
    let mismatched = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://x/</lock></url></urlset>"#;
    assert!(matches!(parse_sitemap(mismatched), Err(Error::Xml(_))));
  }

  #[test]
  fn rejects_malformed_xml() {
    let broken = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://x/</url>"#;
    assert!(matches!(parse_sitemap(broken), Err(Error::Xml(_))));
  }
}
