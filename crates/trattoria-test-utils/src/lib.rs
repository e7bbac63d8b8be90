//! Testing utilities for the Trattoria workspace
//!
//! Shared fixtures: the demo menu and scripted product lookups.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use trattoria_cart::{
    Catalog, LookupError, LookupErrorKind, MenuItem, Money, Product, ProductId, ProductLookup,
};

pub fn pid(id: u32) -> ProductId {
    ProductId::new(id).unwrap()
}

pub fn menu_item(id: u32, name: &str, cents: u64) -> MenuItem {
    MenuItem::new(pid(id), name, Money::from_cents(cents), format!("{name} description")).unwrap()
}

/// The demo restaurant menu: three sections of three items
pub fn sample_menu() -> Catalog {
    let sections: [(&str, [(u32, &str, u64, &str); 3]); 3] = [
        (
            "Appetizers",
            [
                (1, "Garlic Bread", 599, "Freshly baked bread with garlic butter"),
                (2, "Bruschetta", 699, "Toasted bread topped with tomatoes, garlic, and basil"),
                (3, "Calamari", 899, "Crispy fried squid rings with marinara sauce"),
            ],
        ),
        (
            "Main Courses",
            [
                (4, "Grilled Salmon", 2499, "Fresh salmon with lemon herb sauce"),
                (5, "Beef Tenderloin", 2999, "8oz tenderloin with red wine reduction"),
                (6, "Chicken Marsala", 1999, "Chicken breast in mushroom marsala sauce"),
            ],
        ),
        (
            "Desserts",
            [
                (7, "Tiramisu", 799, "Classic Italian coffee-flavored dessert"),
                (8, "Chocolate Lava Cake", 899, "Warm chocolate cake with molten center"),
                (9, "Cheesecake", 699, "New York style cheesecake"),
            ],
        ),
    ];

    let items = sections.into_iter().flat_map(|(category, items)| {
        items.into_iter().map(move |(id, name, cents, description)| {
            MenuItem::new(pid(id), name, Money::from_cents(cents), description)
                .unwrap()
                .with_category(category)
        })
    });
    Catalog::new(items).unwrap()
}

/// Lookup with per-id scripted answers, delays and call counting
#[derive(Debug, Default)]
pub struct ScriptedLookup {
    answers: HashMap<ProductId, Result<Product, LookupErrorKind>>,
    delays: HashMap<ProductId, Duration>,
    calls: Mutex<Vec<ProductId>>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every catalog item with its product record
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut lookup = Self::new();
        for item in catalog.iter() {
            lookup.answers.insert(item.id, Ok(Product::from(item)));
        }
        lookup
    }

    pub fn with_product(mut self, id: u32, name: &str, cents: u64) -> Self {
        let product = Product::from(&menu_item(id, name, cents));
        self.answers.insert(pid(id), Ok(product));
        self
    }

    pub fn with_failure(mut self, id: u32, kind: LookupErrorKind) -> Self {
        self.answers.insert(pid(id), Err(kind));
        self
    }

    pub fn with_delay(mut self, id: u32, delay: Duration) -> Self {
        self.delays.insert(pid(id), delay);
        self
    }

    /// Ids looked up so far, in call order
    pub fn calls(&self) -> Vec<ProductId> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ProductLookup for ScriptedLookup {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        self.calls.lock().push(id);
        if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
        }
        match self.answers.get(&id) {
            Some(Ok(product)) => Ok(product.clone()),
            Some(Err(kind)) => Err(LookupError {
                id,
                kind: kind.clone(),
            }),
            None => Err(LookupError::not_found(id)),
        }
    }
}
