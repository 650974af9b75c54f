//! Process configuration
//!
//! The catalog token and base URL come from the environment; `.env` files
//! are honored because `main` loads dotenv before reading the config.

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://apiv3.iucnredlist.org/api/v3";

#[derive(Debug, Clone)]
pub struct Config {
    /// Opaque Red List API access token.
    pub token: String,
    /// Base URL of the catalog API, without a trailing slash requirement.
    pub base_url: String,
}

impl Config {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into(),
        }
    }

    /// Read `RED_LIST_API_TOKEN` (required) and `RED_LIST_API_URL`
    /// (optional override) from the environment.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("RED_LIST_API_TOKEN")
            .context("RED_LIST_API_TOKEN is not set")?;
        let base_url =
            std::env::var("RED_LIST_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Ok(Self { token, base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_reads_token_and_url_override() {
        std::env::set_var("RED_LIST_API_TOKEN", "test-token");
        std::env::remove_var("RED_LIST_API_URL");

        let config = Config::from_env().unwrap();
        assert_eq!(config.token, "test-token");
        assert_eq!(config.base_url, DEFAULT_API_URL);

        std::env::set_var("RED_LIST_API_URL", "http://localhost:9000/api/v3");
        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/api/v3");

        std::env::remove_var("RED_LIST_API_URL");
        std::env::remove_var("RED_LIST_API_TOKEN");
    }
}
