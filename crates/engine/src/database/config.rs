//! Server configuration via `pelilauta.toml`
//!
//! On first start a default `pelilauta.toml` is written next to the binary
//! (or wherever `--config` points). To change settings, edit the file and
//! restart. `PELILAUTA_BIND` overrides `bind` without touching the file.

use pelilauta_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "pelilauta.toml";

/// Environment variable overriding `bind`
pub const BIND_ENV: &str = "PELILAUTA_BIND";

fn default_bind() -> String {
    "127.0.0.1:4321".to_string()
}

fn default_channel() -> String {
    pelilauta_core::schema::DEFAULT_CHANNEL.to_string()
}

/// CDN cache lifetimes for cacheable JSON endpoints, in seconds
///
/// The tiers must grow outward: `s_maxage < cdn_max_age < edge_max_age`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// `Cache-Control: s-maxage`
    #[serde(default = "default_s_maxage")]
    pub s_maxage: u32,
    /// `CDN-Cache-Control: max-age`
    #[serde(default = "default_cdn_max_age")]
    pub cdn_max_age: u32,
    /// `Vercel-CDN-Cache-Control: max-age`
    #[serde(default = "default_edge_max_age")]
    pub edge_max_age: u32,
}

fn default_s_maxage() -> u32 {
    1
}

fn default_cdn_max_age() -> u32 {
    60
}

fn default_edge_max_age() -> u32 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            s_maxage: default_s_maxage(),
            cdn_max_age: default_cdn_max_age(),
            edge_max_age: default_edge_max_age(),
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// Name of the HTTP-only session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session cookie lifetime in days
    #[serde(default = "default_cookie_max_age_days")]
    pub cookie_max_age_days: u32,
    /// Accepted bearer tokens, token -> uid
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_cookie_max_age_days() -> u32 {
    5
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cookie_max_age_days: default_cookie_max_age_days(),
            tokens: BTreeMap::new(),
        }
    }
}

/// Server configuration loaded from `pelilauta.toml`
///
/// # Example
///
/// ```toml
/// bind = "127.0.0.1:4321"
/// data_dir = "./data"
/// default_channel = "yleinen"
///
/// [cache]
/// s_maxage = 1
/// cdn_max_age = 60
/// edge_max_age = 3600
///
/// [auth]
/// cookie_name = "session"
/// cookie_max_age_days = 5
///
/// [auth.tokens]
/// "dev-token" = "dev-uid"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PelilautaConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory for snapshot persistence; `None` keeps everything in memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Channel used when a thread names none
    #[serde(default = "default_channel")]
    pub default_channel: String,
    /// CDN cache lifetimes
    #[serde(default)]
    pub cache: CacheConfig,
    /// Session settings
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for PelilautaConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_dir: None,
            default_channel: default_channel(),
            cache: CacheConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl PelilautaConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Pelilauta server configuration
#
# Listen address. PELILAUTA_BIND overrides this value.
bind = "127.0.0.1:4321"

# Snapshot directory. Leave unset to keep all data in memory only.
# data_dir = "./data"

# Channel used for threads that do not name one.
default_channel = "yleinen"

# CDN cache lifetimes (seconds) for pages.json.
# Must satisfy s_maxage < cdn_max_age < edge_max_age.
[cache]
s_maxage = 1
cdn_max_age = 60
edge_max_age = 3600

[auth]
cookie_name = "session"
cookie_max_age_days = 5

# Accepted bearer tokens, token = uid.
# [auth.tokens]
# "dev-token" = "dev-uid"
"#
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        let c = &self.cache;
        if !(c.s_maxage < c.cdn_max_age && c.cdn_max_age < c.edge_max_age) {
            return Err(Error::validation(format!(
                "cache lifetimes must grow outward: s_maxage ({}) < cdn_max_age ({}) < edge_max_age ({})",
                c.s_maxage, c.cdn_max_age, c.edge_max_age
            )));
        }
        if self.default_channel.trim().is_empty() {
            return Err(Error::validation("default_channel must not be empty"));
        }
        if self.auth.cookie_name.trim().is_empty() {
            return Err(Error::validation("auth.cookie_name must not be empty"));
        }
        Ok(())
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PelilautaConfig = toml::from_str(content)
            .map_err(|e| Error::validation(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content).map_err(|e| {
            Error::validation(format!("config file '{}': {}", path.display(), e))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Apply the `PELILAUTA_BIND` override from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_bind_override(std::env::var(BIND_ENV).ok())
    }

    /// Apply a bind override; empty values are ignored
    pub fn apply_bind_override(mut self, bind: Option<String>) -> Self {
        if let Some(bind) = bind.filter(|b| !b.trim().is_empty()) {
            self.bind = bind;
        }
        self
    }
}
