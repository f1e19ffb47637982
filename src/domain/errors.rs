// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid price range: {0}")]
    InvalidRange(String),

    #[error("Out of order observation: {0}")]
    OutOfOrderObservation(String),

    #[error("Negative price: {0}")]
    NegativePrice(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid product {id}: {source}")]
    InvalidProduct {
        id: String,
        #[source]
        source: PriceError,
    },

    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    #[error("Malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type PriceResult<T> = Result<T, PriceError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
pub type RoutingResult<T> = Result<T, RoutingError>;
