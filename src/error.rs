use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  #[error("HTTP request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("malformed XML: {0}")]
  Xml(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("spreadsheet error: {0}")]
  Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

  #[error("missing environment variable {0}")]
  MissingEnv(&'static str),

  #[error("batch size must be between 1 and {max}, got {got}")]
  InvalidBatchSize { got: usize, max: usize },

  #[error("sitemap at {0} listed no URLs")]
  EmptySitemap(String),

  #[error("unexpected HTTP status {status} from {url}")]
  Status { status: u16, url: String },
}
