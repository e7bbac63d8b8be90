//! Canonical cart: product id → quantity
//!
//! Keyed by identity, so adding an id twice bumps its quantity. Entries keep
//! insertion order, which fixes the order of the cookie encoding and of
//! expanded item lists. A quantity of zero is never stored.

use crate::catalog::Catalog;
use crate::cookie::{self, CookieEncoding, MalformedCookieError};
use crate::item::{ProductId, Quantity};
use crate::list::ItemList;
use crate::lookup::{LookupError, ProductLookup};
use crate::pricing::PricedCart;
use indexmap::IndexMap;

/// Identity-keyed cart with positive quantities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartMap {
    lines: IndexMap<ProductId, Quantity>,
}

impl CartMap {
    /// Create empty cart
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase the quantity of `id` by `qty`, inserting it if absent
    ///
    /// Quantities saturate at `u32::MAX`.
    pub fn add(&mut self, id: ProductId, qty: Quantity) {
        let entry = self
            .lines
            .entry(id)
            .and_modify(|current| *current = current.saturating_add(qty))
            .or_insert(qty);
        tracing::debug!(%id, quantity = entry.get(), "Cart add");
    }

    /// Add a single unit of `id`
    #[inline]
    pub fn add_one(&mut self, id: ProductId) {
        self.add(id, Quantity::ONE);
    }

    /// Overwrite the quantity of `id`; zero removes the entry
    pub fn set_quantity(&mut self, id: ProductId, qty: u32) {
        match Quantity::new(qty) {
            Some(qty) => {
                self.lines.insert(id, qty);
                tracing::debug!(%id, quantity = qty.get(), "Cart set quantity");
            }
            None => {
                self.remove(id);
            }
        }
    }

    /// Remove one unit of `id`, dropping the entry when it reaches zero
    ///
    /// Mirrors the list cart's first-match removal: exactly one instance
    /// goes away. No-op if `id` is absent.
    pub fn decrement(&mut self, id: ProductId) {
        let Some(current) = self.lines.get(&id).copied() else {
            return;
        };
        self.set_quantity(id, current.get() - 1);
    }

    /// Remove `id` entirely, returning its quantity
    pub fn remove(&mut self, id: ProductId) -> Option<Quantity> {
        let removed = self.lines.shift_remove(&id);
        if removed.is_some() {
            tracing::debug!(%id, "Cart remove");
        }
        removed
    }

    /// Stored quantity of `id`, zero if absent
    #[inline]
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> u32 {
        self.lines.get(&id).map_or(0, |qty| qty.get())
    }

    /// Check if `id` has an entry
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.lines.contains_key(&id)
    }

    /// Number of distinct products
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if cart has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all entries
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.values().map(|qty| u64::from(qty.get())).sum()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, Quantity)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Encode for the `cart` cookie
    #[must_use]
    pub fn serialize(&self) -> CookieEncoding {
        cookie::encode(self)
    }

    /// Decode a `cart` cookie value
    ///
    /// # Errors
    /// Returns [`MalformedCookieError`] if any entry is not an
    /// `(id, positive quantity)` pair
    pub fn deserialize(encoding: &str) -> Result<Self, MalformedCookieError> {
        cookie::decode(encoding)
    }

    /// Price every line through `lookup`
    ///
    /// Lookups run concurrently. Lines whose product cannot be resolved
    /// contribute zero and are reported in [`PricedCart::unresolved`].
    pub async fn price<L>(&self, lookup: &L) -> PricedCart
    where
        L: ProductLookup + ?Sized,
    {
        PricedCart::resolve(self, lookup).await
    }

    /// Expand into a sequence with one entry per unit, in entry order
    ///
    /// # Errors
    /// Returns error for the first id missing from `catalog`
    pub fn expand(&self, catalog: &Catalog) -> Result<ItemList, LookupError> {
        let mut list = ItemList::new();
        for (id, qty) in self.iter() {
            let item = catalog.get(id).ok_or_else(|| LookupError::not_found(id))?;
            for _ in 0..qty.get() {
                list.add(item.clone());
            }
        }
        Ok(list)
    }
}

impl FromIterator<(ProductId, Quantity)> for CartMap {
    fn from_iter<I: IntoIterator<Item = (ProductId, Quantity)>>(iter: I) -> Self {
        let mut cart = Self::new();
        for (id, qty) in iter {
            cart.add(id, qty);
        }
        cart
    }
}
