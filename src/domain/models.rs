// src/domain/models.rs
use crate::domain::errors::{PriceError, PriceResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque product identifier as supplied by the catalog service
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single timestamped price reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub price: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl PriceObservation {
    pub fn new(price: Decimal, observed_at: DateTime<Utc>) -> Self {
        Self { price, observed_at }
    }
}

/// Append-only price history of one tracked product.
///
/// The history is never empty once created and `original_price` always
/// equals the price of the first observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPriceRecord {
    pub(crate) product_id: ProductId,
    pub(crate) history: Vec<PriceObservation>,
    pub(crate) original_price: Decimal,
}

impl ProductPriceRecord {
    /// Start tracking a product with its first observation
    pub fn new(
        product_id: impl Into<ProductId>,
        price: Decimal,
        observed_at: DateTime<Utc>,
    ) -> PriceResult<Self> {
        let product_id = product_id.into();
        if price < Decimal::ZERO {
            return Err(PriceError::NegativePrice(format!(
                "{} cannot start tracking at {}",
                product_id, price
            )));
        }

        Ok(Self {
            product_id,
            history: vec![PriceObservation::new(price, observed_at)],
            original_price: price,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn history(&self) -> &[PriceObservation] {
        &self.history
    }

    pub fn original_price(&self) -> Decimal {
        self.original_price
    }

    pub fn latest(&self) -> Option<&PriceObservation> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Summary statistics computed from a price history
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedStats {
    pub current_price: Decimal,
    pub highest_price: Decimal,
    pub lowest_price: Decimal,
    pub average_price: Decimal,
    /// Fractional drop from the original price, negative when the price rose
    pub discount_rate: Decimal,
}

impl DerivedStats {
    pub fn discount_percent(&self) -> Decimal {
        (self.discount_rate * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

/// Listing row used by price-range filtering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedProduct {
    pub id: ProductId,
    pub current_price: Decimal,
}

impl PricedProduct {
    pub fn new(id: impl Into<ProductId>, current_price: Decimal) -> Self {
        Self {
            id: id.into(),
            current_price,
        }
    }
}
