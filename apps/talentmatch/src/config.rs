use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

/// Client configuration loaded from environment variables.
/// Fails at startup if the ranking service URL is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the ranking service, e.g. `http://127.0.0.1:8000/api/v1`.
    pub api_base_url: Url,
    /// Connect timeout for the HTTP transport. The pipeline itself never times out a scan.
    pub connect_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let raw_url = require_env("TALENTMATCH_API_URL")?;

        Ok(Config {
            api_base_url: Self::parse_base_url(&raw_url)?,
            connect_timeout: std::env::var("TALENTMATCH_CONNECT_TIMEOUT_SECS")
                .ok()
                .map(|v| {
                    v.parse::<u64>()
                        .context("TALENTMATCH_CONNECT_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?
                .map(Duration::from_secs),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Builds a config around an explicit base URL. Used when the URL does not come from the environment.
    pub fn with_base_url(raw_url: &str) -> Result<Self> {
        Ok(Config {
            api_base_url: Self::parse_base_url(raw_url)?,
            connect_timeout: None,
            rust_log: "info".to_string(),
        })
    }

    fn parse_base_url(raw_url: &str) -> Result<Url> {
        let url = Url::parse(raw_url.trim())
            .with_context(|| format!("TALENTMATCH_API_URL '{raw_url}' is not a valid URL"))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("TALENTMATCH_API_URL must use http or https, got '{}'", url.scheme());
        }
        Ok(url)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url_accepts_http() {
        let config = Config::with_base_url("http://127.0.0.1:8000/api/v1").unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:8000/api/v1");
        assert!(config.connect_timeout.is_none());
    }

    #[test]
    fn test_with_base_url_rejects_garbage() {
        assert!(Config::with_base_url("not a url").is_err());
    }

    #[test]
    fn test_with_base_url_rejects_other_schemes() {
        assert!(Config::with_base_url("ftp://example.com/api").is_err());
    }

    #[test]
    fn test_require_env_names_missing_key() {
        let err = require_env("TALENTMATCH_TEST_NEVER_SET").unwrap_err();
        assert!(err.to_string().contains("TALENTMATCH_TEST_NEVER_SET"), "{err}");
    }

    #[test]
    fn test_from_env_fails_without_api_url() {
        std::env::remove_var("TALENTMATCH_API_URL");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("TALENTMATCH_API_URL"), "{err}");
    }
}
