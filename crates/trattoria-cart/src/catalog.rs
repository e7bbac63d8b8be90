//! In-memory menu catalog
//!
//! Loaded once, never mutated. Keeps items in load order and groups them by
//! category in first-seen order, which is how the menu renders sections.

use crate::item::{ItemError, MenuItem, Product, ProductId};
use crate::lookup::{LookupError, ProductLookup};
use async_trait::async_trait;
use indexmap::IndexMap;

/// Immutable set of menu items keyed by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: IndexMap<ProductId, MenuItem>,
}

impl Catalog {
    /// Build a catalog
    ///
    /// # Errors
    /// Returns error if two items share an id
    pub fn new(items: impl IntoIterator<Item = MenuItem>) -> Result<Self, ItemError> {
        let mut map = IndexMap::new();
        for item in items {
            let id = item.id;
            if map.insert(id, item).is_some() {
                return Err(ItemError::DuplicateId(id));
            }
        }
        tracing::debug!("Loaded catalog with {} items", map.len());
        Ok(Self { items: map })
    }

    /// Get item by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&MenuItem> {
        self.items.get(&id)
    }

    /// Check if id is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.contains_key(&id)
    }

    /// Number of items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in load order
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.values()
    }

    /// Group items by category in first-seen order
    ///
    /// Items without a category are collected under `"Other"`.
    #[must_use]
    pub fn sections(&self) -> Vec<(&str, Vec<&MenuItem>)> {
        let mut sections: IndexMap<&str, Vec<&MenuItem>> = IndexMap::new();
        for item in self.items.values() {
            let name = item.category.as_deref().unwrap_or("Other");
            sections.entry(name).or_default().push(item);
        }
        sections.into_iter().collect()
    }
}

#[async_trait]
impl ProductLookup for Catalog {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.get(id)
            .map(Product::from)
            .ok_or_else(|| LookupError::not_found(id))
    }
}
