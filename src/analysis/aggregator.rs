// src/analysis/aggregator.rs
use crate::domain::errors::{PriceError, PriceResult};
use crate::domain::models::{
    DerivedStats, PriceObservation, PricedProduct, ProductId, ProductPriceRecord,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// Inclusive price bounds, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> PriceResult<Self> {
        if min < Decimal::ZERO || max < Decimal::ZERO {
            return Err(PriceError::InvalidRange(format!(
                "bounds must be non-negative, got [{}, {}]",
                min, max
            )));
        }
        if min > max {
            return Err(PriceError::InvalidRange(format!(
                "min {} is greater than max {}",
                min, max
            )));
        }

        Ok(Self { min, max })
    }

    /// Range with no upper bound
    pub fn at_least(min: Decimal) -> PriceResult<Self> {
        Self::new(min, Decimal::MAX)
    }

    /// Parse bounds typed into a price filter form.
    ///
    /// A comma is accepted as the decimal separator. Anything that is not a
    /// plain decimal number (including `NaN` and `inf`) is rejected.
    pub fn parse(min: &str, max: &str) -> PriceResult<Self> {
        Self::new(parse_bound(min)?, parse_bound(max)?)
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

fn parse_bound(raw: &str) -> PriceResult<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|e| PriceError::InvalidRange(format!("cannot parse bound {:?}: {}", raw, e)))
}

/// Compute current, highest, lowest, average and discount rate in one pass.
///
/// The average is a running mean so that it never overflows and stays
/// within `[lowest, highest]` even at full 28-digit scale.
pub fn summarize(record: &ProductPriceRecord) -> PriceResult<DerivedStats> {
    let first = record.history.first().ok_or_else(|| {
        PriceError::InvalidRecord(format!("{} has an empty price history", record.product_id))
    })?;

    let mut current = first.price;
    let mut highest = first.price;
    let mut lowest = first.price;
    let mut mean = first.price;

    for (seen, observation) in record.history.iter().enumerate().skip(1) {
        let price = observation.price;
        current = price;
        highest = highest.max(price);
        lowest = lowest.min(price);

        // Both operands are in [0, MAX], so the difference cannot overflow
        let step = (price - mean) / Decimal::from(seen + 1);
        mean = mean.checked_add(step).unwrap_or(highest);
    }

    let average = mean.clamp(lowest, highest);

    // Only a steep price rise from a tiny original price overflows; saturate
    let discount_rate = if record.original_price > Decimal::ZERO {
        (record.original_price - current)
            .checked_div(record.original_price)
            .unwrap_or(Decimal::MIN)
    } else {
        Decimal::ZERO
    };

    Ok(DerivedStats {
        current_price: current,
        highest_price: highest,
        lowest_price: lowest,
        average_price: average,
        discount_rate,
    })
}

/// Ids of the products whose current price lies within `[min, max]`, in input order
pub fn filter_by_price_range(
    products: &[PricedProduct],
    min: Decimal,
    max: Decimal,
) -> PriceResult<Vec<ProductId>> {
    let range = PriceRange::new(min, max).map_err(|e| {
        log::debug!("Rejected price filter: {}", e);
        e
    })?;

    Ok(filter_in_range(products, &range))
}

/// Same as [`filter_by_price_range`] for an already validated range
pub fn filter_in_range(products: &[PricedProduct], range: &PriceRange) -> Vec<ProductId> {
    products
        .iter()
        .filter(|p| range.contains(p.current_price))
        .map(|p| p.id.clone())
        .collect()
}

/// Return a copy of `record` with one more observation; `record` is left untouched
pub fn append_observation(
    record: &ProductPriceRecord,
    price: Decimal,
    at: DateTime<Utc>,
) -> PriceResult<ProductPriceRecord> {
    if price < Decimal::ZERO {
        return Err(PriceError::NegativePrice(format!(
            "{} observed at {} with price {}",
            record.product_id, at, price
        )));
    }

    if let Some(last) = record.latest() {
        if at < last.observed_at {
            log::debug!(
                "Out of order observation for {}: {} is before {}",
                record.product_id,
                at,
                last.observed_at
            );
            return Err(PriceError::OutOfOrderObservation(format!(
                "{} observed at {} but last observation is at {}",
                record.product_id, at, last.observed_at
            )));
        }
    }

    let mut next = record.clone();
    if next.history.is_empty() {
        next.original_price = price;
    }
    next.history.push(PriceObservation::new(price, at));

    log::trace!(
        "Appended {} @ {} to {} ({} observations)",
        price,
        at,
        next.product_id,
        next.history.len()
    );

    Ok(next)
}
