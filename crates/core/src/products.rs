//! Products

use std::fmt;

use crate::prices::Amount;

/// Product identifier, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Amount,
}

impl Product {
    /// Create a new product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Amount) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}
