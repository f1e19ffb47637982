// src/catalog.rs
use crate::analysis::aggregator::{filter_by_price_range, filter_in_range, PriceRange};
use crate::domain::errors::{AppError, AppResult, CatalogError, CatalogResult, PriceResult};
use crate::domain::models::{DerivedStats, PricedProduct, ProductId};
use crate::domain::product::{Product, RawProduct};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read-only snapshot of the tracked products, in feed order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    // Position of each product in `products`
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: Vec<Product>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.to_string()));
            }
        }

        Ok(Self { products, index })
    }

    /// Parse a JSON array of products, validating each one
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let raw: Vec<RawProduct> = serde_json::from_str(json)?;
        let products = raw
            .into_iter()
            .map(Product::try_from)
            .collect::<CatalogResult<Vec<_>>>()?;

        let catalog = Self::from_products(products)?;
        log::debug!("Parsed catalog with {} products", catalog.len());
        Ok(catalog)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to read catalog file {}: {}",
                path.display(),
                e
            ))
        })?;

        let catalog = Self::from_json_str(&contents)?;
        log::info!(
            "Loaded {} products from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&position| &self.products[position])
    }

    pub fn priced_products(&self) -> Vec<PricedProduct> {
        self.products.iter().filter_map(Product::priced).collect()
    }

    /// Every product paired with its derived statistics
    pub fn summaries(&self) -> CatalogResult<Vec<(&Product, DerivedStats)>> {
        self.products
            .iter()
            .map(|product| {
                product
                    .summary()
                    .map(|stats| (product, stats))
                    .map_err(|source| CatalogError::InvalidProduct {
                        id: product.id.to_string(),
                        source,
                    })
            })
            .collect()
    }

    pub fn filter_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> PriceResult<Vec<ProductId>> {
        filter_by_price_range(&self.priced_products(), min, max)
    }

    /// Products whose category matches `category`, ignoring case
    pub fn in_category(&self, category: &str) -> Vec<&Product> {
        let wanted = category.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase() == wanted)
            })
            .collect()
    }

    /// Listing query: price range plus optional category, in feed order
    pub fn search(&self, range: &PriceRange, category: Option<&str>) -> Vec<ProductId> {
        let candidates: Vec<PricedProduct> = match category {
            Some(category) => self
                .in_category(category)
                .into_iter()
                .filter_map(Product::priced)
                .collect(),
            None => self.priced_products(),
        };

        filter_in_range(&candidates, range)
    }
}
