//! Scoped cart persistence
//!
//! The cart cookie is reached only through an explicitly passed
//! [`CartStore`]. [`CartSession`] owns the working cart and performs explicit
//! `load`/`save`; nothing reads cookie state ambiently.

use crate::cookie::MalformedCookieError;
use crate::map::CartMap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Browsers cap a cookie (name, `=`, value) at 4096 bytes
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Default cookie name
pub const CART_COOKIE: &str = "cart";

/// Persistence handle for the encoded cart
pub trait CartStore: Send + Sync {
    /// Name the value is stored under
    fn name(&self) -> &str;

    /// Stored value, if any
    fn load(&self) -> Option<String>;

    /// Replace the stored value
    fn save(&self, value: &str);

    /// Delete the stored value
    fn clear(&self);
}

impl<T: CartStore + ?Sized> CartStore for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, value: &str) {
        (**self).save(value);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, value: &str) {
        (**self).save(value);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

/// In-memory cookie jar scoped to one session
///
/// Holds every cookie seen on a request so the cart cookie can be read from
/// a `Cookie` header and written back as a `Set-Cookie` header.
#[derive(Debug)]
pub struct CookieJar {
    cart_name: String,
    cookies: Mutex<BTreeMap<String, String>>,
}

impl CookieJar {
    /// Empty jar using the default `cart` cookie name
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_name(CART_COOKIE)
    }

    /// Empty jar storing the cart under `name`
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            cart_name: name.into(),
            cookies: Mutex::new(BTreeMap::new()),
        }
    }

    /// Parse a request `Cookie` header (`a=1; cart=7:3`)
    ///
    /// Pairs without `=` are skipped. Surrounding double quotes on a value
    /// are stripped.
    #[must_use]
    pub fn from_header(header: &str) -> Self {
        Self::from_header_named(CART_COOKIE, header)
    }

    /// Parse a request `Cookie` header, storing the cart under `name`
    #[must_use]
    pub fn from_header_named(name: impl Into<String>, header: &str) -> Self {
        let jar = Self::with_name(name);
        jar.absorb_header(header);
        jar
    }

    /// Merge cookies from a request `Cookie` header
    pub fn absorb_header(&self, header: &str) {
        let mut cookies = self.cookies.lock();
        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            cookies.insert(name.trim().to_string(), value.to_string());
        }
    }

    /// Value of an arbitrary cookie
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies.lock().get(name).cloned()
    }

    /// `Set-Cookie` header value for the cart cookie
    ///
    /// Session cookie: no `Expires`/`Max-Age`, so it lives as long as the
    /// browser session. A cleared cart renders an immediately expiring
    /// deletion.
    #[must_use]
    pub fn set_cookie_header(&self) -> String {
        match self.load() {
            Some(value) => format!("{}={value}; Path=/; SameSite=Lax", self.cart_name),
            None => format!("{}=; Path=/; Max-Age=0", self.cart_name),
        }
    }
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore for CookieJar {
    fn name(&self) -> &str {
        &self.cart_name
    }

    fn load(&self) -> Option<String> {
        self.get(&self.cart_name)
    }

    fn save(&self, value: &str) {
        self.cookies
            .lock()
            .insert(self.cart_name.clone(), value.to_string());
    }

    fn clear(&self) {
        self.cookies.lock().remove(&self.cart_name);
    }
}

/// How a session's cart was obtained on load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored cart was decoded
    Restored,
    /// Nothing was stored
    Empty,
    /// The stored value was malformed and the cart was reset to empty
    Reset(MalformedCookieError),
}

impl LoadOutcome {
    /// Check if the caller should show the empty-cart state
    #[inline]
    #[must_use]
    pub fn is_empty_state(&self) -> bool {
        !matches!(self, Self::Restored)
    }
}

/// Working cart bound to an explicit store
#[derive(Debug)]
pub struct CartSession<S> {
    store: S,
    cart: CartMap,
}

impl<S: CartStore> CartSession<S> {
    /// Session with an empty cart; call [`load`](Self::load) to restore
    #[inline]
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            cart: CartMap::new(),
        }
    }

    /// Replace the working cart with the stored one
    ///
    /// A malformed value never fails the caller: the cart is reset to empty
    /// and the reason returned in [`LoadOutcome::Reset`].
    pub fn load(&mut self) -> LoadOutcome {
        let Some(raw) = self.store.load() else {
            self.cart = CartMap::new();
            return LoadOutcome::Empty;
        };
        match CartMap::deserialize(&raw) {
            Ok(cart) if cart.is_empty() => {
                self.cart = cart;
                LoadOutcome::Empty
            }
            Ok(cart) => {
                tracing::debug!(lines = cart.len(), "Restored cart from {}", self.store.name());
                self.cart = cart;
                LoadOutcome::Restored
            }
            Err(error) => {
                tracing::warn!("Resetting cart: {}", error);
                self.cart = CartMap::new();
                LoadOutcome::Reset(error)
            }
        }
    }

    /// Write the working cart to the store
    ///
    /// # Errors
    /// Returns error if the cookie would exceed [`MAX_COOKIE_BYTES`]; the
    /// stored value is left untouched
    pub fn save(&self) -> Result<(), StoreError> {
        let encoded = self.cart.serialize();
        let size = self.store.name().len() + 1 + encoded.len();
        if size > MAX_COOKIE_BYTES {
            return Err(StoreError::TooLarge {
                size,
                limit: MAX_COOKIE_BYTES,
            });
        }
        if encoded.is_empty() {
            self.store.clear();
        } else {
            self.store.save(encoded.as_str());
        }
        Ok(())
    }

    /// Empty the cart and delete the stored value
    pub fn clear(&mut self) {
        self.cart.clear();
        self.store.clear();
    }

    /// Working cart
    #[inline]
    #[must_use]
    pub fn cart(&self) -> &CartMap {
        &self.cart
    }

    /// Mutable working cart; call [`save`](Self::save) to persist
    #[inline]
    pub fn cart_mut(&mut self) -> &mut CartMap {
        &mut self.cart
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Errors from persisting the cart
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Encoded cookie over the browser limit
    #[error("cart cookie is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}
