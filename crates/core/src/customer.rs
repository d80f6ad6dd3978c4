//! Customer details
//!
//! Contact fields captured on the order form and their validation rules.

use std::{borrow::Cow, fmt};

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use validator::{Validate, ValidationError};

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal and covered by tests"
)]
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10,11}$").expect("phone pattern must compile"));

/// Customer contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CustomerInfo {
    /// Customer name; must not be blank
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    /// Customer email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Customer phone number: 10 or 11 digits
    #[validate(regex(path = "PHONE_PATTERN", message = "Invalid phone number"))]
    pub phone: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::from(CustomerField::Name.default_message()));

        return Err(error);
    }

    Ok(())
}

/// A customer form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    /// Name
    Name,

    /// Email
    Email,

    /// Phone
    Phone,
}

impl CustomerField {
    /// Every field, in form order.
    pub const ALL: [CustomerField; 3] = [
        CustomerField::Name,
        CustomerField::Email,
        CustomerField::Phone,
    ];

    /// Field name as used in validation results.
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerField::Name => "name",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            CustomerField::Name => "Please enter the customer name",
            CustomerField::Email => "Invalid email address",
            CustomerField::Phone => "Invalid phone number",
        }
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation message for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The failing field
    pub field: CustomerField,

    /// Message shown next to the field
    pub message: String,
}

/// Validation failures, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(SmallVec<[FieldError; 3]>);

impl FieldErrors {
    /// Message for `field`, if it failed.
    pub fn get(&self, field: CustomerField) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Iterate over failures.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when every field is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", error.field, error.message)?;
        }

        Ok(())
    }
}

impl CustomerInfo {
    /// Create customer details from the three form fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Validate every field, returning the failures in form order.
    pub fn field_errors(&self) -> FieldErrors {
        let Err(errors) = self.validate() else {
            return FieldErrors::default();
        };

        let by_field = errors.field_errors();

        CustomerField::ALL
            .into_iter()
            .filter_map(|field| {
                let failures = by_field.get(&field.as_str())?;

                let message = failures
                    .first()
                    .and_then(|failure| failure.message.as_ref())
                    .map_or_else(|| field.default_message().to_string(), ToString::to_string);

                Some(FieldError { field, message })
            })
            .collect()
    }

    /// `true` when every field passes validation.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CustomerInfo {
        CustomerInfo::new("Nguyen Van A", "a@example.com", "0912345678")
    }

    #[test]
    fn valid_customer_has_no_errors() {
        assert!(valid().field_errors().is_empty());
        assert!(valid().is_valid());
    }

    #[test]
    fn blank_name_fails() {
        let customer = CustomerInfo {
            name: "   ".to_string(),
            ..valid()
        };

        assert_eq!(
            customer.field_errors().get(CustomerField::Name),
            Some("Please enter the customer name")
        );
    }

    #[test]
    fn malformed_email_fails() {
        let customer = CustomerInfo {
            email: "not-an-email".to_string(),
            ..valid()
        };

        assert_eq!(
            customer.field_errors().get(CustomerField::Email),
            Some("Invalid email address")
        );
    }

    #[test]
    fn phone_must_be_ten_or_eleven_digits() {
        for phone in ["0912345678", "09123456789"] {
            let customer = CustomerInfo {
                phone: phone.to_string(),
                ..valid()
            };

            assert!(customer.is_valid(), "{phone} should be accepted");
        }

        for phone in ["091234567", "091234567890", "09123x5678", "+84912345678", ""] {
            let customer = CustomerInfo {
                phone: phone.to_string(),
                ..valid()
            };

            assert_eq!(
                customer.field_errors().get(CustomerField::Phone),
                Some("Invalid phone number"),
                "{phone} should be rejected"
            );
        }
    }

    #[test]
    fn empty_form_reports_every_field_in_order() {
        let errors = CustomerInfo::default().field_errors();
        let fields: Vec<CustomerField> = errors.iter().map(|e| e.field).collect();

        assert_eq!(
            fields,
            vec![
                CustomerField::Name,
                CustomerField::Email,
                CustomerField::Phone
            ]
        );
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn display_joins_messages() {
        let customer = CustomerInfo {
            email: "nope".to_string(),
            ..valid()
        };

        assert_eq!(
            customer.field_errors().to_string(),
            "email: Invalid email address"
        );
    }
}
