//! `cart` cookie encoding
//!
//! Grammar: `pair ("|" pair)*`, `pair = digits ":" digits`. Ids and quantities
//! are positive decimal integers; an id may appear once. The empty string is
//! the empty cart. Every character is a legal RFC 6265 cookie-octet, so the
//! value needs no quoting.

use crate::item::{parse_digits, ProductId, Quantity};
use crate::map::CartMap;
use std::fmt::{self, Display, Formatter};

const PAIR_SEPARATOR: char = '|';
const FIELD_SEPARATOR: char = ':';

/// Encoded cart, ready to store as a cookie value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CookieEncoding(String);

impl CookieEncoding {
    /// Encoded text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encoded length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this encodes the empty cart
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the encoded text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for CookieEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CookieEncoding {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub(crate) fn encode(cart: &CartMap) -> CookieEncoding {
    let mut out = String::new();
    for (index, (id, qty)) in cart.iter().enumerate() {
        if index > 0 {
            out.push(PAIR_SEPARATOR);
        }
        out.push_str(&id.to_string());
        out.push(FIELD_SEPARATOR);
        out.push_str(&qty.to_string());
    }
    CookieEncoding(out)
}

pub(crate) fn decode(encoding: &str) -> Result<CartMap, MalformedCookieError> {
    let mut cart = CartMap::new();
    if encoding.is_empty() {
        return Ok(cart);
    }

    for (index, pair) in encoding.split(PAIR_SEPARATOR).enumerate() {
        let malformed = |reason| MalformedCookieError {
            entry: index,
            text: pair.to_string(),
            reason,
        };

        let (raw_id, raw_qty) = pair
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| malformed(MalformedReason::MissingSeparator))?;

        let id = parse_digits(raw_id)
            .and_then(|raw| ProductId::new(raw).ok())
            .ok_or_else(|| malformed(MalformedReason::InvalidId))?;

        let qty = parse_digits(raw_qty)
            .and_then(Quantity::new)
            .ok_or_else(|| malformed(MalformedReason::InvalidQuantity))?;

        if cart.contains(id) {
            return Err(malformed(MalformedReason::DuplicateId));
        }
        cart.add(id, qty);
    }
    Ok(cart)
}

/// Stored cart encoding does not parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed cart cookie at entry {entry} ('{text}'): {reason}")]
pub struct MalformedCookieError {
    /// Zero-based index of the offending entry
    pub entry: usize,
    /// Offending entry text
    pub text: String,
    /// What was wrong with it
    pub reason: MalformedReason,
}

/// Why an entry was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    /// No `:` between id and quantity
    #[error("expected 'id:quantity'")]
    MissingSeparator,

    /// Id is not a positive decimal integer
    #[error("id is not a positive integer")]
    InvalidId,

    /// Quantity is not a positive decimal integer
    #[error("quantity is not a positive integer")]
    InvalidQuantity,

    /// Id already seen in this encoding
    #[error("duplicate id")]
    DuplicateId,
}
