// src/domain/mod.rs
pub mod errors;
pub mod models;
pub mod product;

// Re-export common types for convenience
pub use errors::{
    AppError, AppResult, CatalogError, CatalogResult, PriceError, PriceResult, RoutingError,
    RoutingResult,
};
pub use models::{DerivedStats, PriceObservation, PricedProduct, ProductId, ProductPriceRecord};
pub use product::{Product, RawObservation, RawProduct};
