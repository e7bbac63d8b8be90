//! Transient user notifications
//!
//! Failures at the cart boundary surface as notices that dismiss themselves,
//! never as blocking dialogs.

use crate::error::{AddToCartError, ClientError};
use serde::Serialize;
use std::time::Duration;

/// Default time a notice stays visible
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

const ORDER_PLACED: &str = "Order placed successfully";
const ORDER_FALLBACK: &str = "Error placing order";

/// Visual weight of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Confirmation
    Success,
    /// Failure
    Danger,
    /// Neutral state
    Info,
}

/// A self-dismissing message for the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the user
    pub message: String,
    /// Time until dismissal
    #[serde(with = "millis")]
    pub ttl: Duration,
}

impl Notice {
    /// Create a notice with the default lifetime
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            ttl: DEFAULT_NOTICE_TTL,
        }
    }

    /// With lifetime
    #[inline]
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Add-to-cart confirmed
    #[must_use]
    pub fn cart_added() -> Self {
        Self::new(NoticeLevel::Success, "Product added to cart successfully")
    }

    /// Add-to-cart refused; shows the server's message verbatim
    #[must_use]
    pub fn from_add_error(error: &AddToCartError) -> Self {
        Self::new(NoticeLevel::Danger, error.user_message())
    }

    /// Server accepted the add but the cart cookie has no room for it
    #[must_use]
    pub fn cart_full() -> Self {
        Self::new(
            NoticeLevel::Danger,
            "Your cart is full. Remove something before adding more.",
        )
    }

    /// Order accepted; shows the server's confirmation when it sent one
    #[must_use]
    pub fn order_placed(message: &str) -> Self {
        let message = if message.is_empty() { ORDER_PLACED } else { message };
        Self::new(NoticeLevel::Success, message)
    }

    /// Order refused or lost; a server `error` text is shown verbatim
    #[must_use]
    pub fn from_order_error(error: &ClientError) -> Self {
        match error {
            ClientError::Rejected { message, .. } if !message.is_empty() => {
                Self::new(NoticeLevel::Danger, message.as_str())
            }
            _ => Self::new(NoticeLevel::Danger, ORDER_FALLBACK),
        }
    }

    /// Nothing in the cart (also shown after a malformed cookie reset)
    #[must_use]
    pub fn empty_cart() -> Self {
        Self::new(NoticeLevel::Info, "Your cart is empty.")
    }

    /// Some cart lines could not be priced
    #[must_use]
    pub fn unpriced_lines(count: usize) -> Self {
        let noun = if count == 1 { "item" } else { "items" };
        Self::new(
            NoticeLevel::Danger,
            format!("{count} cart {noun} could not be loaded and are not included in the total"),
        )
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        ttl: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX))
    }
}
