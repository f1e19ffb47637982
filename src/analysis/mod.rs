// src/analysis/mod.rs
pub mod aggregator;

pub use aggregator::{
    append_observation, filter_by_price_range, filter_in_range, summarize, PriceRange,
};
