//! Process-wide configuration.
//!
//! The base URL and API key are read once at startup, validated, and
//! passed into the client by value. Nothing mutates them afterwards.

use crate::error::{Error, Result};

/// Environment variable names accepted for the base URL, primary first.
const BASE_URL_VARS: [&str; 2] = ["OPENPROJECT_BASE_URL", "OPENPROJECT_URL"];

/// Environment variable names accepted for the API key, primary first.
const API_KEY_VARS: [&str; 2] = ["OPENPROJECT_API_KEY", "OPENPROJECT_API_TOKEN"];

/// Connection settings for the upstream OpenProject instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the instance, without a trailing slash.
    pub base_url: String,
    /// API key used as the Basic-auth password for the `apikey` user.
    pub api_key: String,
}

impl Config {
    /// Build a configuration from explicit values.
    ///
    /// Trailing slashes on the base URL are trimmed so request paths can
    /// be appended verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when either value is empty.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        let api_key = api_key.trim();
        if base_url.is_empty() || api_key.is_empty() {
            return Err(missing());
        }
        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when neither the primary nor the legacy
    /// variable is set for either value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// Factored out of [`Config::from_env`] so tests can inject raw values
    /// without touching the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when either value resolves to nothing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = first_present(&lookup, &BASE_URL_VARS).ok_or_else(missing)?;
        let api_key = first_present(&lookup, &API_KEY_VARS).ok_or_else(missing)?;
        Self::new(&base_url, &api_key)
    }
}

fn first_present(lookup: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
}

fn missing() -> Error {
    Error::Config("OPENPROJECT_BASE_URL and OPENPROJECT_API_KEY must be set".to_string())
}
