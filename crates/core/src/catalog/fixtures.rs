//! Catalog Fixtures
//!
//! YAML shapes for product and promotion lists.
//!
//! ```yaml
//! products:
//!   - id: sp01
//!     name: Wireless Mouse
//!     price: 250000 VND
//! ```
//!
//! ```yaml
//! promotions:
//!   - code: P10
//!     type: percent
//!     value: "10%"
//!   - code: D50000
//!     type: direct
//!     value: 50000 VND
//! ```

use serde::Deserialize;

use crate::{
    catalog::CatalogError,
    discounts::Discount,
    prices::{parse_percentage, parse_price},
    products::Product,
    promotions::Promotion,
};

/// Embedded default product list.
pub const DEFAULT_PRODUCTS: &str = include_str!("../../../../fixtures/products/default.yml");

/// Embedded default promotion list.
pub const DEFAULT_PROMOTIONS: &str = include_str!("../../../../fixtures/promotions/default.yml");

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Unit price (e.g., "100000 VND")
    pub price: String,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = parse_price(&fixture.price)?;

        Ok(Product::new(fixture.id, fixture.name, price))
    }
}

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Promotions in display order
    pub promotions: Vec<PromotionFixture>,
}

/// Promotion type as written in fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionTypeFixture {
    /// Percentage off the line
    Percent,

    /// Fixed amount off the line
    Direct,
}

/// Promotion Fixture
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion code
    pub code: String,

    /// Promotion type
    #[serde(rename = "type")]
    pub kind: PromotionTypeFixture,

    /// `"10%"`/`"0.10"` for percent promotions, `"50000 VND"` for direct ones
    pub value: String,
}

impl TryFrom<PromotionFixture> for Promotion {
    type Error = CatalogError;

    fn try_from(fixture: PromotionFixture) -> Result<Self, Self::Error> {
        let discount = match fixture.kind {
            PromotionTypeFixture::Percent => {
                Discount::PercentageOff(parse_percentage(&fixture.value)?)
            }
            PromotionTypeFixture::Direct => Discount::AmountOff(parse_price(&fixture.value)?),
        };

        Ok(Promotion::new(fixture.code, discount))
    }
}

/// Parse a products YAML document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a price is invalid.
pub fn parse_products(yaml: &str) -> Result<Vec<Product>, CatalogError> {
    let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

    fixture.products.into_iter().map(Product::try_from).collect()
}

/// Parse a promotions YAML document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a value is invalid.
pub fn parse_promotions(yaml: &str) -> Result<Vec<Promotion>, CatalogError> {
    let fixture: PromotionsFixture = serde_norway::from_str(yaml)?;

    fixture
        .promotions
        .into_iter()
        .map(Promotion::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use crate::prices::PriceError;

    use super::*;

    #[test]
    fn parse_products_in_order() -> TestResult {
        let products = parse_products(
            "products:\n  - id: a\n    name: Alpha\n    price: 100000 VND\n  - id: b\n    name: Beta\n    price: 5000 VND\n",
        )?;

        assert_eq!(products.len(), 2);
        assert_eq!(
            products.first().map(|p| p.price),
            Some(Money::from_minor(100_000, VND))
        );
        assert_eq!(products.get(1).map(|p| p.name.as_str()), Some("Beta"));

        Ok(())
    }

    #[test]
    fn parse_promotions_both_types() -> TestResult {
        let promotions = parse_promotions(
            "promotions:\n  - code: P10\n    type: percent\n    value: \"10%\"\n  - code: D50000\n    type: direct\n    value: 50000 VND\n",
        )?;

        let types: Vec<&str> = promotions
            .iter()
            .map(|p| p.discount().type_name())
            .collect();

        assert_eq!(types, vec!["percent", "direct"]);

        Ok(())
    }

    #[test]
    fn unknown_promotion_type_is_yaml_error() {
        let result =
            parse_promotions("promotions:\n  - code: X\n    type: bogus\n    value: \"1%\"\n");

        assert!(matches!(result, Err(CatalogError::Yaml(_))));
    }

    #[test]
    fn invalid_price_is_reported() {
        let result = parse_products("products:\n  - id: a\n    name: A\n    price: cheap\n");

        assert!(matches!(
            result,
            Err(CatalogError::Price(PriceError::InvalidPrice(_)))
        ));
    }
}
