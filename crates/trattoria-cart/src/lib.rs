//! Trattoria Cart
//!
//! One canonical cart with two serialization adapters.
//!
//! # Core Concepts
//!
//! - [`CartMap`]: canonical product id → quantity cart, persisted in the
//!   `cart` cookie via [`CartMap::serialize`] / [`CartMap::deserialize`]
//! - [`ItemList`]: ordered item sequence used by the menu view; collapses
//!   into a [`CartMap`] and renders the QR order payload
//! - [`OrderSnapshot`]: `{items, total, timestamp}` captured per render
//! - [`CartSession`]: working cart bound to an explicit [`CartStore`]
//! - [`ProductLookup`]: async price source; [`PricedCart`] flags lines that
//!   failed to resolve instead of hiding them
//! - [`Hydrator`]: drops results of superseded cart loads
//!
//! # Example
//!
//! ```rust,ignore
//! use trattoria_cart::{CartSession, CookieJar, SystemClock};
//!
//! let jar = CookieJar::from_header(request_cookie_header);
//! let mut session = CartSession::new(&jar);
//! if session.load().is_empty_state() {
//!     show_empty_cart();
//! }
//! session.cart_mut().add_one(product_id);
//! session.save()?;
//!
//! let priced = session.cart().price(&catalog).await;
//! let payload = session.cart().expand(&catalog)?.to_order_payload(&SystemClock::new())?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod catalog;
mod cookie;
mod hydrate;
mod item;
mod list;
mod lookup;
mod map;
mod money;
mod pricing;
mod snapshot;
mod store;

// Re-exports
pub use catalog::Catalog;
pub use cookie::{CookieEncoding, MalformedCookieError, MalformedReason};
pub use hydrate::{Hydration, Hydrator};
pub use item::{ItemError, MenuItem, Product, ProductId, Quantity};
pub use list::ItemList;
pub use lookup::{LookupError, LookupErrorKind, ProductLookup};
pub use map::CartMap;
pub use money::{Money, MoneyError};
pub use pricing::{PricedCart, PricedLine};
pub use snapshot::{to_order_payload, Clock, FixedClock, OrderSnapshot, PayloadError, SystemClock};
pub use store::{
    CartSession, CartStore, CookieJar, LoadOutcome, StoreError, CART_COOKIE, MAX_COOKIE_BYTES,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
