use std::env;

use crate::{Error, Result};

pub const ENV_FILE: &str = ".env.local";
pub const SUPABASE_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const SUPABASE_ANON_KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
pub const GITHUB_TOKEN_VARS: [&str; 2] = ["NEXT_PUBLIC_GITHUB_TOKEN", "GITHUB_TOKEN"];

/// Credentials for the catalog export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
  pub supabase_url: String,
  pub supabase_anon_key: String,
  pub github_token: Option<String>,
}

impl ExporterConfig {
  /// Loads `.env.local` (or `.env`) into the environment, then reads the credentials.
  pub fn from_env() -> Result<Self> {
    if dotenvy::from_filename(ENV_FILE).is_err() {
      let _ = dotenvy::dotenv();
    }
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. Empty values count as absent.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    Ok(ExporterConfig {
      supabase_url: get(SUPABASE_URL_VAR).ok_or(Error::MissingEnv(SUPABASE_URL_VAR))?,
      supabase_anon_key: get(SUPABASE_ANON_KEY_VAR).ok_or(Error::MissingEnv(SUPABASE_ANON_KEY_VAR))?,
      github_token: GITHUB_TOKEN_VARS.iter().find_map(|name| get(*name)),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn requires_database_credentials() {
    let err = ExporterConfig::from_lookup(lookup(&[(SUPABASE_URL_VAR, "https://db")])).unwrap_err();
    assert!(matches!(err, Error::MissingEnv(SUPABASE_ANON_KEY_VAR)));

    let err = ExporterConfig::from_lookup(lookup(&[(SUPABASE_URL_VAR, ""), (SUPABASE_ANON_KEY_VAR, "k")]))
      .unwrap_err();
    assert!(matches!(err, Error::MissingEnv(SUPABASE_URL_VAR)));
  }

  #[test]
  fn token_prefers_public_name() {
    let config = ExporterConfig::from_lookup(lookup(&[
      (SUPABASE_URL_VAR, "https://db"),
      (SUPABASE_ANON_KEY_VAR, "anon"),
      ("GITHUB_TOKEN", "plain"),
      ("NEXT_PUBLIC_GITHUB_TOKEN", "public"),
    ]))
    .unwrap();
    assert_eq!(config.github_token.as_deref(), Some("public"));

    let config = ExporterConfig::from_lookup(lookup(&[
      (SUPABASE_URL_VAR, "https://db"),
      (SUPABASE_ANON_KEY_VAR, "anon"),
    ]))
    .unwrap();
    assert_eq!(config.github_token, None);
  }
}
