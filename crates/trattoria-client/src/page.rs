//! Cart page loading
//!
//! Ties the scoped cookie session, hydration and notices together: a
//! malformed or missing cookie shows the empty-cart state, unpriceable lines
//! are flagged, and superseded loads are dropped.

use crate::notice::Notice;
use trattoria_cart::{
    CartSession, CartStore, Hydration, Hydrator, LoadOutcome, PricedCart, ProductLookup,
};

/// What the cart page should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartPage {
    /// Nothing to show; checkout disabled
    Empty {
        /// "Your cart is empty." notice
        notice: Notice,
    },
    /// Priced lines with any partial-failure notices
    Priced {
        /// Priced cart
        cart: PricedCart,
        /// Notices to display alongside
        notices: Vec<Notice>,
    },
    /// A newer load started; render nothing from this one
    Stale,
}

impl CartPage {
    /// Checkout button state
    #[must_use]
    pub fn checkout_enabled(&self) -> bool {
        match self {
            Self::Priced { cart, .. } => cart.checkout_enabled(),
            Self::Empty { .. } | Self::Stale => false,
        }
    }
}

/// Restore the session cart and price it for display
pub async fn load_cart_page<S, L>(
    session: &mut CartSession<S>,
    hydrator: &Hydrator,
    lookup: &L,
) -> CartPage
where
    S: CartStore,
    L: ProductLookup + ?Sized,
{
    let outcome = session.load();
    if let LoadOutcome::Reset(error) = &outcome {
        tracing::warn!("Showing empty cart after reset: {}", error);
    }
    if outcome.is_empty_state() {
        return CartPage::Empty {
            notice: Notice::empty_cart(),
        };
    }

    match hydrator.hydrate(session.cart(), lookup).await {
        Hydration::Current(cart) => {
            let mut notices = Vec::new();
            if !cart.is_complete() {
                notices.push(Notice::unpriced_lines(cart.unresolved().len()));
            }
            CartPage::Priced { cart, notices }
        }
        Hydration::Superseded { .. } => CartPage::Stale,
    }
}
