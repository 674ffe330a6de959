pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileComparableSource, FileCreditLedger, InMemoryCreditLedger, LocalStorage};
pub use config::{RunSettings, TomlConfig};
pub use self::core::{
    engine::ValuationEngine,
    estimator::{estimate, EstimatorSettings, PriceAnalysis, PriceEstimator},
};
pub use domain::model::{
    ComparableObservation, Estimate, ParcelAddress, TargetParcel, TargetPricingContext,
    ValuationOutcome,
};
pub use utils::error::{EstimateError, PricerError, Result};
