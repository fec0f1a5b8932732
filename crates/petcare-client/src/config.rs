// Client configuration loaded from the environment.
use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix, without a trailing slash.
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read `PETCARE_API_URL`, falling back to the local default.
    pub fn from_env() -> Result<Self> {
        match std::env::var("PETCARE_API_URL") {
            Ok(value) if !value.trim().is_empty() => {
                let value = value.trim();
                reqwest::Url::parse(value).with_context(|| "parse PETCARE_API_URL")?;
                Ok(Self::new(value))
            }
            _ => Ok(Self::default()),
        }
    }
}
