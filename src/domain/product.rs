// src/domain/product.rs
use crate::analysis::aggregator::{append_observation, summarize};
use crate::domain::errors::{CatalogError, PriceError, PriceResult};
use crate::domain::models::{DerivedStats, PricedProduct, ProductId, ProductPriceRecord};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price reading as it arrives from the catalog feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawObservation {
    pub price: Decimal,
    #[serde(alias = "observedAt")]
    pub observed_at: DateTime<Utc>,
}

/// Product as it arrives from the catalog feed.
///
/// Older feeds use French or abbreviated field names; each concept accepts
/// exactly one spelling per object, so `img` and `image` together are a
/// deserialization error rather than a guess.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub id: String,

    #[serde(default, alias = "nom")]
    pub name: Option<String>,

    #[serde(default, alias = "img")]
    pub image: Option<String>,

    #[serde(default, alias = "categorie")]
    pub category: Option<String>,

    #[serde(default, alias = "fournisseur")]
    pub supplier: Option<String>,

    #[serde(default, alias = "lien")]
    pub url: Option<String>,

    #[serde(default, alias = "prices")]
    pub history: Vec<RawObservation>,
}

/// Canonical product with its tracked price history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub url: Option<String>,
    pub record: ProductPriceRecord,
}

impl Product {
    pub fn current_price(&self) -> Option<Decimal> {
        self.record.latest().map(|o| o.price)
    }

    pub fn summary(&self) -> PriceResult<DerivedStats> {
        summarize(&self.record)
    }

    pub fn priced(&self) -> Option<PricedProduct> {
        self.current_price()
            .map(|price| PricedProduct::new(self.id.clone(), price))
    }
}

impl TryFrom<RawProduct> for Product {
    type Error = CatalogError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        let id = raw.id.trim().to_string();
        if id.is_empty() {
            return Err(CatalogError::MissingField("id".to_string()));
        }

        let name = non_blank(raw.name)
            .ok_or_else(|| CatalogError::MissingField(format!("name of product {}", id)))?;

        let invalid = |source: PriceError| CatalogError::InvalidProduct {
            id: id.clone(),
            source,
        };

        let mut history = raw.history;
        // Stable sort: equal timestamps keep feed order
        history.sort_by_key(|o| o.observed_at);

        let mut observations = history.into_iter();
        let first = observations.next().ok_or_else(|| {
            invalid(PriceError::InvalidRecord(
                "no price observations".to_string(),
            ))
        })?;

        let mut record = ProductPriceRecord::new(id.as_str(), first.price, first.observed_at)
            .map_err(&invalid)?;
        for observation in observations {
            record = append_observation(&record, observation.price, observation.observed_at)
                .map_err(&invalid)?;
        }

        Ok(Product {
            id: ProductId::new(id.clone()),
            name,
            image: non_blank(raw.image),
            category: non_blank(raw.category),
            supplier: non_blank(raw.supplier),
            url: non_blank(raw.url),
            record,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(json: &str) -> Result<Product, CatalogError> {
        let raw: RawProduct = serde_json::from_str(json)?;
        Product::try_from(raw)
    }

    #[test]
    fn test_canonical_fields() {
        let product = parse(
            r#"{
                "id": "tv-55",
                "name": "Smart TV 55\"",
                "image": "https://cdn.example/tv.png",
                "category": "TV",
                "supplier": "Darty",
                "url": "https://example/tv-55",
                "history": [
                    {"price": "599.99", "observed_at": "2024-02-01T10:00:00Z"},
                    {"price": 549.0, "observed_at": "2024-02-08T10:00:00Z"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(product.id, ProductId::from("tv-55"));
        assert_eq!(product.category.as_deref(), Some("TV"));
        assert_eq!(product.supplier.as_deref(), Some("Darty"));
        assert_eq!(product.current_price(), Some(dec!(549)));
        assert_eq!(product.record.original_price(), dec!(599.99));
    }

    #[test]
    fn test_legacy_field_names() {
        let product = parse(
            r#"{
                "id": "phone-1",
                "nom": "Téléphone",
                "img": "phone.jpg",
                "categorie": "Mobile",
                "fournisseur": "Fnac",
                "lien": "https://example/phone-1",
                "prices": [{"price": "199", "observedAt": "2024-02-01T10:00:00Z"}]
            }"#,
        )
        .unwrap();

        assert_eq!(product.name, "Téléphone");
        assert_eq!(product.image.as_deref(), Some("phone.jpg"));
        assert_eq!(product.category.as_deref(), Some("Mobile"));
        assert_eq!(product.supplier.as_deref(), Some("Fnac"));
        assert_eq!(product.url.as_deref(), Some("https://example/phone-1"));
    }

    #[test]
    fn test_duplicate_spellings_rejected() {
        let result = parse(
            r#"{
                "id": "x",
                "name": "X",
                "img": "a.jpg",
                "image": "b.jpg",
                "history": [{"price": "1", "observed_at": "2024-02-01T10:00:00Z"}]
            }"#,
        );
        assert!(matches!(result, Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn test_history_sorted_stably() {
        let product = parse(
            r#"{
                "id": "x",
                "name": "X",
                "history": [
                    {"price": "30", "observed_at": "2024-03-01T00:00:00Z"},
                    {"price": "10", "observed_at": "2024-01-01T00:00:00Z"},
                    {"price": "21", "observed_at": "2024-02-01T00:00:00Z"},
                    {"price": "20", "observed_at": "2024-02-01T00:00:00Z"}
                ]
            }"#,
        )
        .unwrap();

        let prices: Vec<Decimal> = product.record.history().iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![dec!(10), dec!(21), dec!(20), dec!(30)]);
        assert_eq!(product.record.original_price(), dec!(10));
    }

    #[test]
    fn test_missing_name_and_history() {
        let no_name = parse(
            r#"{"id": "x", "name": "  ", "history": [{"price": "1", "observed_at": "2024-02-01T10:00:00Z"}]}"#,
        );
        assert!(matches!(no_name, Err(CatalogError::MissingField(_))));

        let no_history = parse(r#"{"id": "x", "name": "X"}"#);
        assert!(matches!(
            no_history,
            Err(CatalogError::InvalidProduct {
                source: PriceError::InvalidRecord(_),
                ..
            })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = parse(
            r#"{"id": "x", "name": "X", "history": [
                {"price": "5", "observed_at": "2024-02-01T10:00:00Z"},
                {"price": "-2", "observed_at": "2024-02-02T10:00:00Z"}
            ]}"#,
        );
        assert!(matches!(
            result,
            Err(CatalogError::InvalidProduct {
                source: PriceError::NegativePrice(_),
                ..
            })
        ));
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let product = parse(
            r#"{"id": "x", "name": "X", "image": "", "category": "  ",
                "history": [{"price": "1", "observed_at": "2024-02-01T10:00:00Z"}]}"#,
        )
        .unwrap();
        assert!(product.image.is_none());
        assert!(product.category.is_none());
    }
}
