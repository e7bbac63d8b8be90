//! Catalog records and identifiers
//!
//! - [`ProductId`]: positive integer identity of a catalog entry
//! - [`Quantity`]: positive line quantity
//! - [`MenuItem`]: immutable catalog entry
//! - [`Product`]: record returned by the product lookup endpoint

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU32;
use std::str::FromStr;

/// Unique product identifier (positive integer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProductId(NonZeroU32);

impl ProductId {
    /// Create a product id
    ///
    /// # Errors
    /// Returns error if `raw` is zero
    #[inline]
    pub fn new(raw: u32) -> Result<Self, ItemError> {
        NonZeroU32::new(raw).map(Self).ok_or(ItemError::ZeroId)
    }

    /// Raw integer value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for ProductId {
    type Error = ItemError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ProductId> for u32 {
    fn from(id: ProductId) -> Self {
        id.get()
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = parse_digits(s).ok_or_else(|| ItemError::InvalidId(s.to_string()))?;
        Self::new(raw)
    }
}

/// Positive line quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// Quantity of one
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, `None` for zero
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Raw integer value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add, saturating at `u32::MAX`
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.get()))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = ItemError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(ItemError::ZeroQuantity)
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        qty.get()
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = parse_digits(s).ok_or_else(|| ItemError::InvalidQuantity(s.to_string()))?;
        Self::new(raw).ok_or(ItemError::ZeroQuantity)
    }
}

/// Parse a non-empty run of ASCII digits into a `u32`
///
/// Stricter than `u32::from_str`, which also accepts a leading `+`.
pub(crate) fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Short description
    pub description: String,
    /// Menu section (e.g. "Desserts")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MenuItem {
    /// Create a validated menu item
    ///
    /// # Errors
    /// Returns error if the name is blank
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        description: impl Into<String>,
    ) -> Result<Self, ItemError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ItemError::BlankName(id));
        }
        Ok(Self {
            id,
            name,
            price,
            description: description.into(),
            category: None,
        })
    }

    /// With menu section
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Product record served by `GET /product/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier, when the server echoes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Image location
    #[serde(default)]
    pub image_url: String,
    /// Description, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Units in stock, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
    /// Category, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&MenuItem> for Product {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
            price: item.price,
            image_url: String::new(),
            description: Some(item.description.clone()),
            stock_quantity: None,
            category: item.category.clone(),
        }
    }
}

/// Errors from validated record constructors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    /// Product ids start at one
    #[error("product id must be positive")]
    ZeroId,

    /// Not a decimal integer
    #[error("invalid product id: '{0}'")]
    InvalidId(String),

    /// Quantities start at one
    #[error("quantity must be positive")]
    ZeroQuantity,

    /// Not a decimal integer
    #[error("invalid quantity: '{0}'")]
    InvalidQuantity(String),

    /// Item name missing
    #[error("menu item {0} has a blank name")]
    BlankName(ProductId),

    /// Two catalog entries share an id
    #[error("duplicate catalog id: {0}")]
    DuplicateId(ProductId),
}
