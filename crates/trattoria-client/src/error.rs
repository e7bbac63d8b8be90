//! Error types for the HTTP client
//!
//! - [`AddToCartError`]: the server refused an add, or it never arrived
//! - [`ClientError`]: construction and order endpoint failures
//!
//! Product lookups fail with [`trattoria_cart::LookupError`].

use crate::config::ConfigError;

/// Fallback text when a rejection carries no `error` field
pub const ADD_TO_CART_FALLBACK: &str = "Error adding product to cart";

/// An add-to-cart request was not confirmed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddToCartError {
    /// Non-2xx answer; `message` is the server's `error` text verbatim
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// No response
    #[error("add to cart failed: {0}")]
    Transport(String),

    /// 2xx answer whose body is not a confirmation (e.g. a login page)
    #[error("unexpected add to cart response: {0}")]
    Malformed(String),
}

impl AddToCartError {
    /// Text to show the user
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } => message,
            Self::Transport(_) | Self::Malformed(_) => ADD_TO_CART_FALLBACK,
        }
    }
}

/// Main client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be built or the request failed in transit
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint path could not be joined onto the base URL
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    /// Non-2xx answer
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ClientError {
    /// Check if a retry could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Rejected { status, .. } => *status >= 500,
            Self::Config(_) | Self::Url(_) | Self::Malformed(_) => false,
        }
    }
}
