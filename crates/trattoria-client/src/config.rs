//! Client configuration
//!
//! Built from defaults, a TOML document, or environment overrides:
//!
//! | Variable | Field |
//! |---|---|
//! | `TRATTORIA_BASE_URL` | `base_url` |
//! | `TRATTORIA_TIMEOUT_SECS` | `request_timeout_secs` |
//! | `TRATTORIA_COOKIE_NAME` | `cookie_name` |
//! | `TRATTORIA_NOTICE_TTL_MS` | `notice_ttl_ms` |
//! | `TRATTORIA_CACHE_CAPACITY` | `lookup_cache_capacity` |
//! | `TRATTORIA_CACHE_TTL_SECS` | `lookup_cache_ttl_secs` |

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin serving the cart endpoints
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Name of the cart cookie
    pub cookie_name: String,
    /// How long notices stay visible, in milliseconds
    pub notice_ttl_ms: u64,
    /// Maximum cached product records
    pub lookup_cache_capacity: u64,
    /// Product record time-to-live in seconds
    pub lookup_cache_ttl_secs: u64,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// With cookie name
    #[inline]
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// With notice lifetime
    #[inline]
    #[must_use]
    pub fn with_notice_ttl_ms(mut self, ms: u64) -> Self {
        self.notice_ttl_ms = ms;
        self
    }

    /// With product cache size and lifetime
    #[inline]
    #[must_use]
    pub fn with_lookup_cache(mut self, capacity: u64, ttl_secs: u64) -> Self {
        self.lookup_cache_capacity = capacity;
        self.lookup_cache_ttl_secs = ttl_secs;
        self
    }

    /// Parse from TOML; absent keys keep their defaults
    ///
    /// # Errors
    /// Returns error on invalid TOML or invalid values
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `TRATTORIA_*` environment variables
    ///
    /// # Errors
    /// Returns error if a variable is set but invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay_env()
    }

    /// Overlay `TRATTORIA_*` environment variables onto this config
    ///
    /// # Errors
    /// Returns error if a variable is set but invalid
    pub fn overlay_env(mut self) -> Result<Self, ConfigError> {
        if let Some(url) = var("TRATTORIA_BASE_URL") {
            self.base_url = url;
        }
        if let Some(secs) = parse_var("TRATTORIA_TIMEOUT_SECS")? {
            self.request_timeout_secs = secs;
        }
        if let Some(name) = var("TRATTORIA_COOKIE_NAME") {
            self.cookie_name = name;
        }
        if let Some(ms) = parse_var("TRATTORIA_NOTICE_TTL_MS")? {
            self.notice_ttl_ms = ms;
        }
        if let Some(capacity) = parse_var("TRATTORIA_CACHE_CAPACITY")? {
            self.lookup_cache_capacity = capacity;
        }
        if let Some(secs) = parse_var("TRATTORIA_CACHE_TTL_SECS")? {
            self.lookup_cache_ttl_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check values are usable
    ///
    /// # Errors
    /// Returns the first invalid field
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "must be positive".to_string(),
            });
        }
        if self.cookie_name.is_empty() || !self.cookie_name.bytes().all(is_token_byte) {
            return Err(ConfigError::Invalid {
                field: "cookie_name",
                reason: format!("'{}' is not a cookie token", self.cookie_name),
            });
        }
        if self.lookup_cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "lookup_cache_ttl_secs",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Parsed base URL, normalized to end in `/`
    ///
    /// # Errors
    /// Returns error if `base_url` is not an absolute http(s) URL
    pub fn base(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            field: "base_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "base_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Notice lifetime
    #[inline]
    #[must_use]
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    /// Product cache time-to-live
    #[inline]
    #[must_use]
    pub fn lookup_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.lookup_cache_ttl_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            request_timeout_secs: 10,
            cookie_name: trattoria_cart::CART_COOKIE.to_string(),
            notice_ttl_ms: 3_000,
            lookup_cache_capacity: 1_000,
            lookup_cache_ttl_secs: 60,
        }
    }
}

// RFC 6265 cookie-name token characters
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| {
        info!("{key} set, overriding default");
        value
    })
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| {
                warn!("Invalid {key} value: {e}");
                ConfigError::Invalid {
                    field: key,
                    reason: e.to_string(),
                }
            })
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML syntax or type error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
