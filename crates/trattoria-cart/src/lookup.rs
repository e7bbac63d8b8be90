//! Product lookup boundary
//!
//! Pricing and hydration resolve product ids through [`ProductLookup`]. The
//! HTTP client implements it against `GET /product/{id}`; [`Catalog`]
//! implements it in memory.
//!
//! [`Catalog`]: crate::Catalog

use crate::item::{Product, ProductId};
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves a product id to its current record
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Look up a single product
    async fn product(&self, id: ProductId) -> Result<Product, LookupError>;
}

#[async_trait]
impl<L: ProductLookup + ?Sized> ProductLookup for Arc<L> {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        (**self).product(id).await
    }
}

#[async_trait]
impl<L: ProductLookup + ?Sized> ProductLookup for &L {
    async fn product(&self, id: ProductId) -> Result<Product, LookupError> {
        (**self).product(id).await
    }
}

/// A referenced product could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lookup of product {id} failed: {kind}")]
pub struct LookupError {
    /// Product that failed to resolve
    pub id: ProductId,
    /// Failure classification
    pub kind: LookupErrorKind,
}

impl LookupError {
    /// Product does not exist
    #[inline]
    #[must_use]
    pub fn not_found(id: ProductId) -> Self {
        Self {
            id,
            kind: LookupErrorKind::NotFound,
        }
    }

    /// Server answered with a non-success status
    #[inline]
    #[must_use]
    pub fn status(id: ProductId, status: u16) -> Self {
        Self {
            id,
            kind: LookupErrorKind::Status(status),
        }
    }

    /// Request never produced a response
    #[inline]
    pub fn transport(id: ProductId, message: impl Into<String>) -> Self {
        Self {
            id,
            kind: LookupErrorKind::Transport(message.into()),
        }
    }

    /// Response body was not a product record
    #[inline]
    pub fn malformed(id: ProductId, message: impl Into<String>) -> Self {
        Self {
            id,
            kind: LookupErrorKind::Malformed(message.into()),
        }
    }

    /// Check if a retry could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self.kind {
            LookupErrorKind::Transport(_) => true,
            LookupErrorKind::Status(code) => code >= 500,
            LookupErrorKind::NotFound | LookupErrorKind::Malformed(_) => false,
        }
    }
}

/// Lookup failure classification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupErrorKind {
    /// 404 or absent from catalog
    #[error("not found")]
    NotFound,

    /// Other non-2xx status
    #[error("http status {0}")]
    Status(u16),

    /// Network failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Unparseable body
    #[error("malformed response: {0}")]
    Malformed(String),
}
