//! Fixtures
//!
//! Product catalogs defined in YAML, loaded once at startup.

use std::{fs, path::PathBuf, sync::Arc};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::products::{Catalog, Product};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Prices cannot be negative
    #[error("Negative price for product {0}")]
    NegativePrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products loaded so far
    catalog: Catalog,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::default(),
            currency: None,
        }
    }

    /// Load a named fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the products cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?;

        Ok(fixture)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a price is invalid, if
    /// product ids repeat, or if products are priced in different currencies.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.load_products_str(&contents)
    }

    /// Load products from YAML text
    ///
    /// # Errors
    ///
    /// See [`Fixture::load_products`].
    pub fn load_products_str(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let fixture: products::ProductsFixture = serde_norway::from_str(yaml)?;

        for product_fixture in fixture.products {
            let product: Product = product_fixture.try_into()?;
            let currency = product.currency();

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            let id = product.id.clone();

            if self.catalog.insert(product).is_none() {
                return Err(FixtureError::DuplicateProduct(id));
            }
        }

        Ok(self)
    }

    /// Get a product by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &str) -> Result<&Arc<Product>, FixtureError> {
        self.catalog
            .get(id)
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// Loaded catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Take the loaded catalog
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Currency of the loaded products, if any were loaded
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
