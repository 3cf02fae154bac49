//! Bulk URL submission to the IndexNow API.
//!
//! URLs are pushed in contiguous batches, one JSON POST per batch. A batch
//! either succeeds (HTTP 200) or is counted as failed; failures never stop
//! the remaining batches from being sent.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{error, info, warn};
use url::Url;

use crate::batch::{batch_count, batches};
use crate::Result;

pub const INDEXNOW_ENDPOINT: &str = "https://api.indexnow.org/IndexNow";
pub const DEFAULT_BATCH_SIZE: usize = 5_000;

/// Request body of an IndexNow submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission<'a> {
  pub host: &'a str,
  pub key: &'a str,
  pub key_location: &'a str,
  pub url_list: &'a [String],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionReport {
  pub total_urls: usize,
  pub total_batches: usize,
  pub successful_batches: usize,
}

impl SubmissionReport {
  pub fn failed_batches(&self) -> usize {
    self.total_batches - self.successful_batches
  }
}

pub struct IndexNowClient {
  client: Client,
  endpoint: String,
  host: String,
  key: String,
  key_location: String,
  batch_size: usize,
  delay: Duration,
}

impl IndexNowClient {
  pub fn new(client: Client, host: &str, key: &str, key_location: &str) -> Self {
    IndexNowClient {
      client,
      endpoint: INDEXNOW_ENDPOINT.to_string(),
      host: host.to_string(),
      key: key.to_string(),
      key_location: key_location.to_string(),
      batch_size: DEFAULT_BATCH_SIZE,
      delay: Duration::from_secs(1),
    }
  }

  pub fn with_endpoint(mut self, endpoint: &str) -> Self {
    self.endpoint = endpoint.to_string();
    self
  }

  pub fn with_batch_size(mut self, batch_size: usize) -> Self {
    self.batch_size = batch_size;
    self
  }

  /// Pause inserted between consecutive batches.
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  /// Posts one batch. Only HTTP 200 counts as success.
  pub fn submit_batch(&self, urls: &[String], batch_num: usize) -> bool {
    let payload = Submission {
      host: &self.host,
      key: &self.key,
      key_location: &self.key_location,
      url_list: urls,
    };
    info!("submitting batch {} ({} URLs)...", batch_num, urls.len());
    match self
      .client
      .post(&self.endpoint)
      .header("Content-Type", "application/json; charset=utf-8")
      .json(&payload)
      .send()
    {
      Ok(resp) => {
        let status = resp.status();
        if status == 200 {
          info!("batch {} submitted successfully", batch_num);
          true
        } else {
          let body = resp.text().unwrap_or_default();
          warn!("batch {} response: {}", batch_num, status.as_u16());
          warn!("  response: {}", body);
          false
        }
      }
      Err(e) => {
        error!("error submitting batch {}: {}", batch_num, e);
        false
      }
    }
  }

  /// Submits every URL belonging to the configured host, batch by batch.
  pub fn submit_all(&self, urls: &[String]) -> Result<SubmissionReport> {
    let (own, foreign): (Vec<String>, Vec<String>) =
      urls.iter().cloned().partition(|url| same_host(url, &self.host));
    for url in &foreign {
      warn!("skipping {}: host differs from {}", url, self.host);
    }

    let chunks = batches(&own, self.batch_size)?;
    let mut report = SubmissionReport {
      total_urls: own.len(),
      total_batches: batch_count(own.len(), self.batch_size),
      successful_batches: 0,
    };
    let last = chunks.len().saturating_sub(1);
    for (index, chunk) in chunks.into_iter().enumerate() {
      if self.submit_batch(chunk, index + 1) {
        report.successful_batches += 1;
      }
      // courtesy pause between requests, none after the final batch.
      if index < last {
        thread::sleep(self.delay);
      }
    }
    Ok(report)
  }
}

/// Host of an absolute URL, lowercased by the URL parser.
pub fn url_host(url: &str) -> Option<String> {
  Url::parse(url).ok()?.host_str().map(str::to_string)
}

fn same_host(url: &str, host: &str) -> bool {
  url_host(url).map_or(false, |h| h.eq_ignore_ascii_case(host))
}
