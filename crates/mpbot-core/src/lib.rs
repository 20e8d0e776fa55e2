//! Shared domain types and configuration for the marketplace listing bot.
//!
//! The normalization engine (`mpbot-normalizer`) and the CLI both depend on
//! this crate; it carries no I/O beyond reading environment variables.

pub mod app_config;
pub mod config;
pub mod images;
pub mod listing;
pub mod prices;

pub use app_config::{EngineConfig, ImageFilterThresholds};
pub use config::{load_engine_config, load_engine_config_from_env};
pub use images::{ImageCandidate, ImageOrigin, NormalizedListing};
pub use listing::{RawListing, RawSku, SkuProp, SkuPropValue};
pub use prices::{NormalizedPriceLine, PriceGroup, RawVariant};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
