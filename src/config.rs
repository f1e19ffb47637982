// src/config.rs
use crate::analysis::aggregator::PriceRange;
use crate::domain::errors::{AppError, AppResult};
use dotenv::dotenv;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;

/// Price tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog source
    pub catalog: CatalogConfig,

    /// Default listing filter
    pub filter: FilterConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the JSON catalog export
    pub path: String,
}

/// Listing filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Lower price bound, 0 when unset
    pub min_price: Option<Decimal>,

    /// Upper price bound, unbounded when unset
    pub max_price: Option<Decimal>,

    /// Only list products of this category
    pub category: Option<String>,
}

impl FilterConfig {
    /// Resolve the configured bounds into a validated range
    pub fn price_range(&self) -> AppResult<PriceRange> {
        let min = self.min_price.unwrap_or(Decimal::ZERO);
        let range = match self.max_price {
            Some(max) => PriceRange::new(min, max)?,
            None => PriceRange::at_least(min)?,
        };
        Ok(range)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source
    pub fn from_vars<F>(var: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_config = CatalogConfig {
            path: var("CATALOG_PATH").unwrap_or_else(|| "catalog.json".to_string()),
        };

        let filter_config = FilterConfig {
            min_price: parse_price_var("FILTER_MIN_PRICE", var("FILTER_MIN_PRICE"))?,
            max_price: parse_price_var("FILTER_MAX_PRICE", var("FILTER_MAX_PRICE"))?,
            category: var("FILTER_CATEGORY")
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        };

        // Fail at startup rather than on the first listing query
        filter_config.price_range()?;

        let logging_config = LoggingConfig {
            level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            to_file: var("LOG_TO_FILE")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .unwrap_or(false),
            file_path: var("LOG_FILE_PATH"),
        };

        Ok(Config {
            catalog: catalog_config,
            filter: filter_config,
            logging: logging_config,
        })
    }

    /// Load a JSON configuration file, validating the filter range
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Cannot parse {}: {}", path.display(), e))
        })?;
        config.filter.price_range()?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Snapshot the effective configuration as JSON, readable by [`Config::from_file`]
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|e| {
            AppError::Config(format!("Cannot write {}: {}", path.display(), e))
        })?;

        log::info!("Wrote configuration to {}", path.display());
        Ok(())
    }

    /// Logger for `LoggingConfig`; `RUST_LOG` still refines per-module levels
    pub fn logger_builder(&self) -> AppResult<env_logger::Builder> {
        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(level_filter(&self.logging.level))
            .parse_env("RUST_LOG");

        match (self.logging.to_file, &self.logging.file_path) {
            (true, Some(file_path)) => {
                let file = File::create(file_path).map_err(|e| {
                    AppError::Config(format!("Cannot create log file {}: {}", file_path, e))
                })?;
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            (true, None) => {
                return Err(AppError::Config(
                    "LOG_TO_FILE is set but LOG_FILE_PATH is missing".to_string(),
                ));
            }
            (false, _) => {}
        }

        Ok(builder)
    }

    pub fn init_logging(&self) -> AppResult<()> {
        self.logger_builder()?
            .try_init()
            .map_err(|e| AppError::Config(format!("Logger already set: {}", e)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                path: "catalog.json".to_string(),
            },
            filter: FilterConfig {
                min_price: None,
                max_price: None,
                category: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}

fn level_filter(level: &str) -> log::LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => log::LevelFilter::Off,
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}

fn parse_price_var(name: &str, value: Option<String>) -> AppResult<Option<Decimal>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Decimal::from_str(raw)
            .map(Some)
            .map_err(|e| AppError::Config(format!("Invalid {} {:?}: {}", name, raw, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::PriceError;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config, Config::default());

        let range = config.filter.price_range().unwrap();
        assert_eq!(range.min(), Decimal::ZERO);
        assert_eq!(range.max(), Decimal::MAX);
    }

    #[test]
    fn test_reads_filter_and_logging() {
        let config = Config::from_vars(vars(&[
            ("CATALOG_PATH", "/data/products.json"),
            ("FILTER_MIN_PRICE", "15"),
            ("FILTER_MAX_PRICE", "99.90"),
            ("FILTER_CATEGORY", " Audio "),
            ("LOG_LEVEL", "debug"),
            ("LOG_TO_FILE", "true"),
            ("LOG_FILE_PATH", "/tmp/flashprix.log"),
        ]))
        .unwrap();

        assert_eq!(config.catalog.path, "/data/products.json");
        assert_eq!(config.filter.min_price, Some(dec!(15)));
        assert_eq!(config.filter.max_price, Some(dec!(99.90)));
        assert_eq!(config.filter.category.as_deref(), Some("Audio"));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.to_file);
    }

    #[test]
    fn test_rejects_unparseable_bound() {
        let result = Config::from_vars(vars(&[("FILTER_MIN_PRICE", "cheap")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let result = Config::from_vars(vars(&[
            ("FILTER_MIN_PRICE", "50"),
            ("FILTER_MAX_PRICE", "10"),
        ]));
        assert!(matches!(result, Err(AppError::Price(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashprix.json");

        let mut config = Config::default();
        config.catalog.path = "/srv/feeds/catalog.json".to_string();
        config.filter.min_price = Some(dec!(9.99));
        config.filter.max_price = Some(dec!(149));
        config.filter.category = Some("Audio".to_string());

        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_from_file_rejects_inverted_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inverted.json");

        let mut config = Config::default();
        config.filter.min_price = Some(dec!(100));
        config.filter.max_price = Some(dec!(10));
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(AppError::Price(PriceError::InvalidRange(_)))
        ));
    }

    #[test]
    fn test_from_file_missing_or_garbled() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(dir.path().join("absent.json")),
            Err(AppError::Config(_))
        ));

        let garbled = dir.path().join("garbled.json");
        fs::write(&garbled, "{\"catalog\":").unwrap();
        assert!(matches!(Config::from_file(&garbled), Err(AppError::Config(_))));
    }

    #[test]
    fn test_logger_writes_to_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("flashprix.log");

        let mut config = Config::default();
        config.logging.to_file = true;
        config.logging.file_path = Some(log_path.display().to_string());

        config.logger_builder().unwrap();
        assert!(log_path.exists());

        config.logging.file_path = None;
        assert!(matches!(config.logger_builder(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("WARN"), log::LevelFilter::Warn);
        assert_eq!(level_filter("verbose"), log::LevelFilter::Info);
    }
}
