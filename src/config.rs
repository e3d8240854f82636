//! Configuration for building absolute cursor URLs.
//!
//! Loaded with Figment, lowest priority first:
//!
//! 1. Built-in defaults (`http`, `localhost:3000`)
//! 2. A TOML file (`pagecrate.toml` in the working directory, or an explicit path)
//! 3. `PAGECRATE_` environment variables, e.g. `PAGECRATE_HOST=api.example.com`
//!
//! ```toml
//! protocol = "https"
//! host = "api.example.com"
//! ```

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default configuration file name
pub const CONFIG_FILE: &str = "pagecrate.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PAGECRATE_";

/// The externally visible origin clients use to reach the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// URL scheme, e.g. `https`
    pub protocol: String,
    /// Host with optional port and path prefix, e.g. `api.example.com` or `localhost:3000/api`
    pub host: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost:3000".to_string(),
        }
    }
}

impl PaginationConfig {
    /// Load from `pagecrate.toml` (if present) and the environment.
    ///
    /// # Errors
    ///
    /// Returns the Figment error when a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from a specific TOML file (if present) and the environment.
    ///
    /// # Errors
    ///
    /// Returns the Figment error when a source cannot be read or a value has the wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading pagination configuration");
        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Extract from an already assembled Figment.
    ///
    /// # Errors
    ///
    /// Returns the Figment error when extraction fails.
    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    /// `protocol://host/`, always ending in `/` so resource paths join under it
    ///
    /// # Errors
    ///
    /// Fails when the protocol and host do not form a valid URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}://{}/",
            self.protocol,
            self.host.trim_end_matches('/')
        ))
    }
}
