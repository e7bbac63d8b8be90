//! Trattoria Client
//!
//! HTTP collaborator for the cart core:
//! - Confirms adds with the server before touching the local cart
//! - Resolves products over HTTP (optionally cached) for pricing
//! - Places table orders, checks out session carts and polls order status
//! - Turns boundary failures into self-dismissing [`Notice`]s
//!
//! # Example
//!
//! ```rust,ignore
//! use trattoria_cart::{CartSession, CookieJar, Hydrator};
//! use trattoria_client::{load_cart_page, ClientConfig, StoreClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let client = StoreClient::new(&config)?;
//!
//! let jar = CookieJar::with_name(&config.cookie_name);
//! let mut session = CartSession::new(&jar);
//! let notice = client.add_to_session(&mut session, product_id, quantity).await;
//!
//! let page = load_cart_page(&mut session, &Hydrator::new(), &client).await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod notice;
pub mod order;
pub mod page;
pub mod telemetry;

// Re-exports for convenience
pub use cache::CachedLookup;
pub use client::{AddedToCart, StoreClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{AddToCartError, ClientError, ADD_TO_CART_FALLBACK};
pub use notice::{Notice, NoticeLevel, DEFAULT_NOTICE_TTL};
pub use order::{CheckoutOutcome, OrderLine, OrderRequest, OrderState, OrderStatus, PlacedOrder};
pub use page::{load_cart_page, CartPage};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
