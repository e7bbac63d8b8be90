//! Table order payloads
//!
//! Request and response shapes for `POST /api/place_order` and
//! `GET /api/order_status/{id}`.

use crate::notice::Notice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trattoria_cart::{CartMap, Money, ProductId, Quantity};

/// One ordered line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// Menu item
    pub id: ProductId,
    /// Units
    pub quantity: Quantity,
    /// Free-text kitchen note
    pub special_instructions: String,
}

/// Order placed from a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Table the order is served to, if seated
    pub table_number: Option<u32>,
    /// Lines in cart order
    pub items: Vec<OrderLine>,
}

impl OrderRequest {
    /// Build from the canonical cart
    #[must_use]
    pub fn from_cart(cart: &CartMap) -> Self {
        Self {
            table_number: None,
            items: cart
                .iter()
                .map(|(id, quantity)| OrderLine {
                    id,
                    quantity,
                    special_instructions: String::new(),
                })
                .collect(),
        }
    }

    /// With table number
    #[inline]
    #[must_use]
    pub fn with_table(mut self, table: u32) -> Self {
        self.table_number = Some(table);
        self
    }

    /// Attach kitchen notes by item id; unknown ids are ignored
    #[must_use]
    pub fn with_instructions(mut self, notes: &HashMap<ProductId, String>) -> Self {
        for line in &mut self.items {
            if let Some(note) = notes.get(&line.id) {
                line.special_instructions.clone_from(note);
            }
        }
        self
    }

    /// Check if there is anything to order
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Server acknowledgement of a placed order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlacedOrder {
    /// Confirmation text
    #[serde(default)]
    pub message: String,
    /// Assigned order id
    pub order_id: u64,
}

/// Result of checking out a session cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// What to show the user
    pub notice: Notice,
    /// The placed order; `None` if nothing was ordered
    pub order: Option<PlacedOrder>,
}

impl CheckoutOutcome {
    /// Check if the server accepted the order
    #[inline]
    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.order.is_some()
    }
}

/// Kitchen progress of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    /// Received, not yet accepted
    Pending,
    /// Accepted by the kitchen
    Confirmed,
    /// Served
    Completed,
    /// Withdrawn
    Cancelled,
}

impl OrderState {
    /// Check if the order can still change
    #[inline]
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// Status record for a placed order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderStatus {
    /// Current state
    pub status: OrderState,
    /// Creation time as sent by the server
    pub created_at: String,
    /// Order total
    pub total_amount: Money,
}

impl OrderStatus {
    /// Creation time, accepting HTTP-date (RFC 2822) or RFC 3339 text
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(&self.created_at)
            .or_else(|_| DateTime::parse_from_rfc3339(&self.created_at))
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}
