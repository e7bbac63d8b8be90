//! Pricing a cart against a product lookup
//!
//! A failed lookup never corrupts the total silently: the line is zero-valued
//! and listed in [`PricedCart::unresolved`] so the caller can flag it.

use crate::item::{Product, ProductId, Quantity};
use crate::lookup::{LookupError, ProductLookup};
use crate::map::CartMap;
use crate::money::Money;
use futures::future::join_all;

/// A cart line resolved to its product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    /// Product id
    pub id: ProductId,
    /// Resolved record
    pub product: Product,
    /// Units in cart
    pub quantity: Quantity,
    /// `price × quantity`
    pub subtotal: Money,
}

/// Result of pricing every line of a cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricedCart {
    lines: Vec<PricedLine>,
    unresolved: Vec<(ProductId, Quantity, LookupError)>,
    total: Money,
}

impl PricedCart {
    pub(crate) async fn resolve<L>(cart: &CartMap, lookup: &L) -> Self
    where
        L: ProductLookup + ?Sized,
    {
        let entries: Vec<(ProductId, Quantity)> = cart.iter().collect();
        let results = join_all(entries.iter().map(|(id, _)| lookup.product(*id))).await;

        let mut priced = Self::default();
        for ((id, quantity), result) in entries.into_iter().zip(results) {
            match result {
                Ok(product) => {
                    let subtotal = product.price.times(quantity.get());
                    priced.total += subtotal;
                    priced.lines.push(PricedLine {
                        id,
                        product,
                        quantity,
                        subtotal,
                    });
                }
                Err(error) => {
                    tracing::warn!("Pricing line {} as zero: {}", id, error);
                    priced.unresolved.push((id, quantity, error));
                }
            }
        }
        priced
    }

    /// Resolved lines in cart order
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    /// Lines that contributed zero because their lookup failed
    #[inline]
    #[must_use]
    pub fn unresolved(&self) -> &[(ProductId, Quantity, LookupError)] {
        &self.unresolved
    }

    /// Sum of resolved subtotals
    #[inline]
    #[must_use]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Check if every line resolved
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Check if nothing is in the cart
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.unresolved.is_empty()
    }

    /// Checkout stays disabled while the total is zero
    #[inline]
    #[must_use]
    pub fn checkout_enabled(&self) -> bool {
        !self.total.is_zero()
    }
}
