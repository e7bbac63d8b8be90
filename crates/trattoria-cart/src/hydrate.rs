//! Latest-request-wins cart hydration
//!
//! Loading the cart page prices every line through the product lookup. A
//! newer load may start while an older one is still waiting on lookups; only
//! the newest result may be rendered.

use crate::lookup::ProductLookup;
use crate::map::CartMap;
use crate::pricing::PricedCart;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome of one hydration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// Newest request; safe to render
    Current(PricedCart),
    /// A newer request started while this one was in flight; discard
    Superseded {
        /// Generation of the discarded request
        generation: u64,
    },
}

impl Hydration {
    /// Priced cart if this result is current
    #[inline]
    #[must_use]
    pub fn into_current(self) -> Option<PricedCart> {
        match self {
            Self::Current(priced) => Some(priced),
            Self::Superseded { .. } => None,
        }
    }

    /// Check if this result must be discarded
    #[inline]
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

/// Issues hydration generations and rejects stale results
#[derive(Debug, Default)]
pub struct Hydrator {
    latest: AtomicU64,
}

impl Hydrator {
    /// Create hydrator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any in flight
    #[inline]
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Check if `generation` is still the newest request
    #[inline]
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.latest.load(Ordering::Acquire) == generation
    }

    /// Price `cart` and report whether the result is still wanted
    pub async fn hydrate<L>(&self, cart: &CartMap, lookup: &L) -> Hydration
    where
        L: ProductLookup + ?Sized,
    {
        let generation = self.begin();
        tracing::debug!(generation, lines = cart.len(), "Hydrating cart");
        let priced = cart.price(lookup).await;
        if self.is_current(generation) {
            Hydration::Current(priced)
        } else {
            tracing::debug!(generation, "Discarding superseded hydration");
            Hydration::Superseded { generation }
        }
    }
}
