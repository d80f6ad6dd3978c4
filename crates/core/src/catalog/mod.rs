//! Catalog
//!
//! Read-only product and promotion lists consumed by an order session. Both keep their
//! fixture order (it is the order selectors display) and index entries for constant-time
//! lookup by id or code.

use std::path::Path;

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    discounts::{Discount, is_valid_percentage},
    prices::PriceError,
    products::{Product, ProductId},
    promotions::{Promotion, PromotionCode},
};

pub mod fixtures;

/// Catalog construction and loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading fixture files
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price or percentage
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Currency mismatch between catalog entries
    #[error("currency mismatch: expected {expected}, found {found} ({entry})")]
    CurrencyMismatch {
        /// Currency of the catalog
        expected: &'static str,
        /// Currency of the offending entry
        found: &'static str,
        /// Product id or promotion code of the offending entry
        entry: String,
    },

    /// No products were supplied, so the catalog currency is unknown
    #[error("no products loaded; currency unknown")]
    NoProducts,

    /// Two products share an id
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// Two promotions share a code
    #[error("duplicate promotion code: {0}")]
    DuplicatePromotion(PromotionCode),

    /// A product has a negative price
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A promotion's magnitude is out of range
    #[error("promotion {0} has an invalid value: {1}")]
    InvalidPromotionValue(PromotionCode, &'static str),
}

/// Ordered products indexed by id.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl ProductCatalog {
    /// Build a product catalog, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateProduct`] if an id repeats, or
    /// [`CatalogError::NegativePrice`] if a price is below zero.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for product in products {
            if product.price.to_minor_units() < 0 {
                return Err(CatalogError::NegativePrice(product.id));
            }

            if catalog.index.contains_key(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }

            catalog
                .index
                .insert(product.id.clone(), catalog.products.len());
            catalog.products.push(product);
        }

        Ok(catalog)
    }

    /// Find a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|idx| self.products.get(*idx))
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Ordered promotions indexed by code.
#[derive(Debug, Clone, Default)]
pub struct PromotionCatalog {
    promotions: Vec<Promotion>,
    index: FxHashMap<PromotionCode, usize>,
}

impl PromotionCatalog {
    /// Build a promotion catalog, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePromotion`] if a code repeats, or
    /// [`CatalogError::InvalidPromotionValue`] if a percentage is outside 0–100 % or a direct
    /// amount is negative.
    pub fn new(promotions: impl IntoIterator<Item = Promotion>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for promotion in promotions {
            match promotion.discount() {
                Discount::PercentageOff(pct) if !is_valid_percentage(pct) => {
                    return Err(CatalogError::InvalidPromotionValue(
                        promotion.code().clone(),
                        "percentage must be between 0% and 100%",
                    ));
                }
                Discount::AmountOff(amount) if amount.to_minor_units() < 0 => {
                    return Err(CatalogError::InvalidPromotionValue(
                        promotion.code().clone(),
                        "amount must not be negative",
                    ));
                }
                _ => {}
            }

            if catalog.index.contains_key(promotion.code()) {
                return Err(CatalogError::DuplicatePromotion(promotion.code().clone()));
            }

            catalog
                .index
                .insert(promotion.code().clone(), catalog.promotions.len());
            catalog.promotions.push(promotion);
        }

        Ok(catalog)
    }

    /// Find a promotion by code.
    pub fn get(&self, code: &PromotionCode) -> Option<&Promotion> {
        self.index.get(code).and_then(|idx| self.promotions.get(*idx))
    }

    /// Iterate over promotions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Promotion> {
        self.promotions.iter()
    }

    /// Number of promotions.
    pub fn len(&self) -> usize {
        self.promotions.len()
    }

    /// Check if the catalog has no promotions.
    pub fn is_empty(&self) -> bool {
        self.promotions.is_empty()
    }
}

/// Products and promotions sharing a single currency.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: &'static Currency,
    products: ProductCatalog,
    promotions: PromotionCatalog,
}

impl Catalog {
    /// Create a catalog, checking every price and direct discount is in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CurrencyMismatch`] for the first entry in another currency.
    pub fn new(
        currency: &'static Currency,
        products: ProductCatalog,
        promotions: PromotionCatalog,
    ) -> Result<Self, CatalogError> {
        let mismatch = |found: &'static Currency, entry: String| CatalogError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            found: found.iso_alpha_code,
            entry,
        };

        if let Some(product) = products.iter().find(|p| p.price.currency() != currency) {
            return Err(mismatch(product.price.currency(), product.id.to_string()));
        }

        for promotion in promotions.iter() {
            if let Discount::AmountOff(amount) = promotion.discount()
                && amount.currency() != currency
            {
                return Err(mismatch(amount.currency(), promotion.code().to_string()));
            }
        }

        Ok(Self {
            currency,
            products,
            promotions,
        })
    }

    /// The catalog bundled with the crate, used when no fixture files are configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded fixtures fail to parse.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(fixtures::DEFAULT_PRODUCTS, fixtures::DEFAULT_PROMOTIONS)
    }

    /// Parse a catalog from product and promotion YAML documents.
    ///
    /// The catalog currency is taken from the first product.
    ///
    /// # Errors
    ///
    /// Returns an error if either document is malformed, no products are defined, or entries
    /// disagree on currency.
    pub fn from_yaml(products_yaml: &str, promotions_yaml: &str) -> Result<Self, CatalogError> {
        let products = ProductCatalog::new(fixtures::parse_products(products_yaml)?)?;
        let promotions = PromotionCatalog::new(fixtures::parse_promotions(promotions_yaml)?)?;

        let currency = products
            .iter()
            .next()
            .map(|product| product.price.currency())
            .ok_or(CatalogError::NoProducts)?;

        Self::new(currency, products, promotions)
    }

    /// Load a catalog from fixture files, falling back to the embedded fixture for any path
    /// that is not given.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or its contents are invalid.
    pub fn load(
        products_path: Option<&Path>,
        promotions_path: Option<&Path>,
    ) -> Result<Self, CatalogError> {
        let products_yaml = match products_path {
            Some(path) => std::fs::read_to_string(path)?,
            None => fixtures::DEFAULT_PRODUCTS.to_string(),
        };

        let promotions_yaml = match promotions_path {
            Some(path) => std::fs::read_to_string(path)?,
            None => fixtures::DEFAULT_PROMOTIONS.to_string(),
        };

        Self::from_yaml(&products_yaml, &promotions_yaml)
    }

    /// Currency shared by every amount in the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Products, in catalog order.
    pub fn products(&self) -> &ProductCatalog {
        &self.products
    }

    /// Promotions, in catalog order.
    pub fn promotions(&self) -> &PromotionCatalog {
        &self.promotions
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use decimal_percentage::Percentage;
    use rusty_money::{
        Money,
        iso::{USD, VND},
    };
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    fn write_fixture(base: &Path, name: &str, contents: &str) -> TestResult {
        fs::write(base.join(name), contents)?;

        Ok(())
    }

    #[test]
    fn builtin_catalog_loads() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert_eq!(catalog.currency(), VND);
        assert!(!catalog.products().is_empty());
        assert!(
            catalog
                .promotions()
                .get(&PromotionCode::from("P10"))
                .is_some()
        );
        assert!(
            catalog
                .promotions()
                .get(&PromotionCode::from("D50000"))
                .is_some()
        );

        Ok(())
    }

    #[test]
    fn products_keep_fixture_order() -> TestResult {
        let products = ProductCatalog::new([
            Product::new("b", "Second", Money::from_minor(2, VND)),
            Product::new("a", "First", Money::from_minor(1, VND)),
        ])?;

        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(
            products.get(&ProductId::from("a")).map(|p| p.name.as_str()),
            Some("First")
        );

        Ok(())
    }

    #[test]
    fn duplicate_product_id_errors() {
        let result = ProductCatalog::new([
            Product::new("a", "One", Money::from_minor(1, VND)),
            Product::new("a", "Two", Money::from_minor(2, VND)),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(id)) if id.as_str() == "a"));
    }

    #[test]
    fn negative_product_price_errors() {
        let result = ProductCatalog::new([Product::new("a", "One", Money::from_minor(-1, VND))]);

        assert!(matches!(result, Err(CatalogError::NegativePrice(_))));
    }

    #[test]
    fn duplicate_promotion_code_errors() {
        let result = PromotionCatalog::new([
            Promotion::new("P10", Discount::PercentageOff(Percentage::from(0.1))),
            Promotion::new("P10", Discount::PercentageOff(Percentage::from(0.2))),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicatePromotion(_))));
    }

    #[test]
    fn out_of_range_percentage_errors() {
        let result = PromotionCatalog::new([Promotion::new(
            "P150",
            Discount::PercentageOff(Percentage::from(1.5)),
        )]);

        assert!(matches!(
            result,
            Err(CatalogError::InvalidPromotionValue(..))
        ));
    }

    #[test]
    fn currency_mismatch_errors() -> TestResult {
        let products = ProductCatalog::new([Product::new("a", "A", Money::from_minor(1, VND))])?;
        let promotions = PromotionCatalog::new([Promotion::new(
            "D1",
            Discount::AmountOff(Money::from_minor(1, USD)),
        )])?;

        let result = Catalog::new(VND, products, promotions);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch { found: "USD", .. })
        ));

        Ok(())
    }

    #[test]
    fn from_yaml_requires_products() {
        let result = Catalog::from_yaml("products: []\n", "promotions: []\n");

        assert!(matches!(result, Err(CatalogError::NoProducts)));
    }

    #[test]
    fn load_reads_files_and_falls_back_to_builtin() -> TestResult {
        let dir = tempdir()?;

        write_fixture(
            dir.path(),
            "products.yml",
            "products:\n  - id: tea\n    name: Tea\n    price: 2.50 GBP\n",
        )?;

        let catalog = Catalog::load(Some(&dir.path().join("products.yml")), None);

        // The builtin promotions are priced in VND, so a GBP product list cannot use them.
        assert!(matches!(
            catalog,
            Err(CatalogError::CurrencyMismatch { expected: "GBP", .. })
        ));

        write_fixture(
            dir.path(),
            "promotions.yml",
            "promotions:\n  - code: HALF\n    type: percent\n    value: 50%\n",
        )?;

        let catalog = Catalog::load(
            Some(&dir.path().join("products.yml")),
            Some(&dir.path().join("promotions.yml")),
        )?;

        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.promotions().len(), 1);

        Ok(())
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = Catalog::load(Some(Path::new("/nonexistent/products.yml")), None);

        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
