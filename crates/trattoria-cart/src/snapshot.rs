//! Order snapshots and the QR order payload
//!
//! A snapshot is taken fresh for every render and encoded as
//! `{"items": [...], "total": "30.98", "timestamp": "...Z"}`. The payload is
//! forward-only: it is consumed by whoever scans the code, so there is no
//! decoder. Size is unbounded; the renderer picks a symbol size that fits.

use crate::item::MenuItem;
use crate::money::Money;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Source of capture instants
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock whose readings strictly advance
///
/// Two captures within the same millisecond would otherwise render the same
/// timestamp; each reading is bumped to at least 1 ms past the previous one.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl SystemClock {
    /// Create clock
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let mut last = self.last.lock();
        let mut now = truncate_millis(Utc::now());
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + Duration::milliseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

/// Clock pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn truncate_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(instant.timestamp_millis()).unwrap_or(instant)
}

/// Read-only projection of a cart at render time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSnapshot {
    items: Vec<MenuItem>,
    total: Money,
    timestamp: DateTime<Utc>,
}

impl OrderSnapshot {
    /// Capture items and their total at the clock's current instant
    #[must_use]
    pub fn capture(items: Vec<MenuItem>, clock: &dyn Clock) -> Self {
        let total = items.iter().map(|item| item.price).sum();
        Self {
            items,
            total,
            timestamp: clock.now(),
        }
    }

    /// Items in cart order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Sum of item prices
    #[inline]
    #[must_use]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Capture instant
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Encode as the QR order payload
    ///
    /// # Errors
    /// Returns error if JSON encoding fails
    pub fn to_payload(&self) -> Result<String, PayloadError> {
        let view = PayloadView {
            items: &self.items,
            total: self.total.to_string(),
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let payload = serde_json::to_string(&view)?;
        tracing::debug!(bytes = payload.len(), items = self.items.len(), "Encoded order payload");
        Ok(payload)
    }
}

#[derive(Serialize)]
struct PayloadView<'a> {
    items: &'a [MenuItem],
    total: String,
    timestamp: String,
}

/// Encode items as a QR order payload stamped with the current instant
///
/// # Errors
/// Returns error if JSON encoding fails
pub fn to_order_payload(items: &[MenuItem], clock: &dyn Clock) -> Result<String, PayloadError> {
    OrderSnapshot::capture(items.to_vec(), clock).to_payload()
}

/// Errors from payload encoding
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// JSON encoding failed
    #[error("payload encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
