//! Sequence cart used by the menu view
//!
//! An ordered list of menu items where the same item may appear more than
//! once. Removal by id drops only the first matching entry.

use crate::item::{MenuItem, ProductId, Quantity};
use crate::map::CartMap;
use crate::money::Money;
use crate::snapshot::{Clock, OrderSnapshot, PayloadError};

/// Ordered sequence of selected items (duplicates allowed)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemList {
    items: Vec<MenuItem>,
}

impl ItemList {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item
    pub fn add(&mut self, item: MenuItem) {
        tracing::debug!(id = %item.id, "Adding item to list");
        self.items.push(item);
    }

    /// Remove the first entry with this id, if any
    ///
    /// Returns the removed entry. Later duplicates are left in place.
    pub fn remove(&mut self, id: ProductId) -> Option<MenuItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        tracing::debug!(%id, index, "Removing item from list");
        Some(self.items.remove(index))
    }

    /// Sum of prices over current entries
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(|item| item.price).sum()
    }

    /// Check if list has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries (duplicates counted)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Entries in insertion order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, MenuItem> {
        self.items.iter()
    }

    /// Collapse into the canonical id → quantity cart
    ///
    /// Ids keep the order of their first appearance.
    #[must_use]
    pub fn to_cart_map(&self) -> CartMap {
        let mut cart = CartMap::new();
        for item in &self.items {
            cart.add(item.id, Quantity::ONE);
        }
        cart
    }

    /// Capture an order snapshot at the clock's current instant
    #[must_use]
    pub fn snapshot(&self, clock: &dyn Clock) -> OrderSnapshot {
        OrderSnapshot::capture(self.items.clone(), clock)
    }

    /// Encode the current contents as a QR order payload
    ///
    /// # Errors
    /// Returns error if JSON encoding fails
    pub fn to_order_payload(&self, clock: &dyn Clock) -> Result<String, PayloadError> {
        self.snapshot(clock).to_payload()
    }
}

impl From<Vec<MenuItem>> for ItemList {
    fn from(items: Vec<MenuItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<MenuItem> for ItemList {
    fn from_iter<I: IntoIterator<Item = MenuItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a MenuItem;
    type IntoIter = std::slice::Iter<'a, MenuItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn item(id: u32, cents: u64) -> MenuItem {
        let price = Money::from_cents(cents);
        MenuItem::new(ProductId::new(id).unwrap(), format!("item {id}"), price, "").unwrap()
    }

    fn pid(id: u32) -> ProductId {
        ProductId::new(id).unwrap()
    }

    #[test]
    fn menu_scenario_totals() {
        let mut cart = ItemList::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total().to_string(), "0.00");

        cart.add(item(1, 599));
        assert_eq!(cart.total().to_string(), "5.99");

        cart.add(item(4, 2499));
        assert_eq!(cart.total().to_string(), "30.98");

        cart.remove(pid(1));
        assert_eq!(cart.total().to_string(), "24.99");
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut cart: ItemList = vec![item(1, 599), item(2, 699)].into();
        let before = cart.clone();
        assert!(cart.remove(pid(9)).is_none());
        assert_eq!(cart, before);
        assert_eq!(cart.total(), before.total());
    }

    #[test]
    fn remove_drops_only_first_duplicate() {
        let mut cart: ItemList =
            vec![item(1, 100), item(2, 200), item(1, 100), item(1, 100)].into();
        cart.remove(pid(1));
        let ids: Vec<u32> = cart.iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![2, 1, 1]);
    }

    #[test]
    fn collapses_to_cart_map() {
        let cart: ItemList = vec![item(4, 100), item(1, 100), item(4, 100)].into();
        let map = cart.to_cart_map();
        assert_eq!(map.quantity(pid(4)), 2);
        assert_eq!(map.quantity(pid(1)), 1);
        assert_eq!(map.serialize().as_str(), "4:2|1:1");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u32, u64),
        Remove(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u32..6, 0u64..10_000).prop_map(|(id, cents)| Op::Add(id, cents)),
            (1u32..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_matches_contents(ops in prop::collection::vec(op(), 0..40)) {
            let mut cart = ItemList::new();
            let mut model: Vec<(u32, u64)> = Vec::new();
            for op in ops {
                match op {
                    Op::Add(id, cents) => {
                        cart.add(item(id, cents));
                        model.push((id, cents));
                    }
                    Op::Remove(id) => {
                        cart.remove(pid(id));
                        if let Some(pos) = model.iter().position(|(m, _)| *m == id) {
                            model.remove(pos);
                        }
                    }
                }
            }
            let expected: u64 = model.iter().map(|(_, c)| c).sum();
            prop_assert_eq!(cart.total().cents(), expected);
            prop_assert_eq!(cart.len(), model.len());
        }
    }
}
