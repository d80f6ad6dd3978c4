//! Payment

use std::{fmt, str::FromStr};

use thiserror::Error;

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Cash, with change given back.
    Cash,

    /// Card.
    #[default]
    Card,
}

impl PaymentMethod {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised payment method name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method '{0}', expected 'cash' or 'card'")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}
