//! Products

use std::sync::Arc;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Image token, rendered by the UI as-is
    pub image: String,

    /// Price per kilogram
    pub price_per_kg: Money<'static, Currency>,
}

impl Product {
    /// Create a new product.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        price_per_kg: Money<'static, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            price_per_kg,
        }
    }

    /// Currency the product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.price_per_kg.currency()
    }
}

/// Read-only product catalog, iterated in insertion order.
#[derive(Debug, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Arc<Product>>,
    keys: FxHashMap<String, ProductKey>,
}

impl Catalog {
    /// Build a catalog from a list of products.
    ///
    /// Products whose id is already present are skipped; use [`Catalog::insert`] to detect them.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::default();

        for product in products {
            catalog.insert(product);
        }

        catalog
    }

    /// Insert a product, returning its key, or `None` if the id is already taken.
    pub fn insert(&mut self, product: Product) -> Option<ProductKey> {
        if self.keys.contains_key(&product.id) {
            return None;
        }

        let id = product.id.clone();
        let key = self.products.insert(Arc::new(product));

        self.keys.insert(id, key);

        Some(key)
    }

    /// Look up a product by its catalog identifier.
    pub fn get(&self, id: &str) -> Option<&Arc<Product>> {
        self.keys.get(id).and_then(|key| self.products.get(*key))
    }

    /// Look up a product by key.
    pub fn by_key(&self, key: ProductKey) -> Option<&Arc<Product>> {
        self.products.get(key)
    }

    /// Iterate over the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.values()
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency of the catalog, taken from its first product.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.iter().next().map(|product| product.currency())
    }
}
