pub mod toml_config;

use crate::core::estimator::EstimatorSettings;
use crate::domain::model::TargetParcel;
use crate::utils::error::{PricerError, Result};
use crate::utils::validation::{self, Validate};
use serde::Serialize;

pub use toml_config::TomlConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Fully resolved settings for one CLI run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSettings {
    pub comparables_path: String,
    pub require_zip_code: bool,
    pub output_path: String,
    pub output_format: OutputFormat,
    pub initial_credits: u64,
    pub ledger_path: Option<String>,
    pub estimator: EstimatorSettings,
    pub target: TargetParcel,
    /// Print the record saved by an earlier run instead of estimating again.
    pub show_saved: bool,
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("comparables", &self.comparables_path)?;
        validation::validate_file_extension(
            "comparables",
            &self.comparables_path,
            &toml_config::COMPARABLE_EXTENSIONS,
        )?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_open_closed_range(
            "similarity_threshold",
            self.estimator.similarity_threshold,
            0.0,
            1.0,
        )?;
        if let Some(ledger) = &self.ledger_path {
            validation::validate_path("ledger_path", ledger)?;
        }
        if let Some(zip) = self.target.address.as_ref().and_then(|a| a.zipcode.as_deref()) {
            validation::validate_non_empty_string("zip_code", zip)?;
        }
        if self.show_saved && self.target.address.is_none() {
            return Err(PricerError::ValidationError {
                message: "--show-saved needs the parcel address used for the original run".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
mod cli {
    use super::*;
    use crate::domain::model::ParcelAddress;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "parcel-pricer")]
    #[command(about = "Estimate a land parcel's price from comparable sales")]
    pub struct CliConfig {
        /// Comparable sales file (.json or .csv)
        #[arg(long)]
        pub comparables: Option<String>,

        /// Optional TOML configuration file; command-line values take precedence
        #[arg(long)]
        pub config: Option<String>,

        /// Target parcel GIS area in acres
        #[arg(long)]
        pub gis_area: Option<f64>,

        /// Target parcel market value in USD
        #[arg(long)]
        pub market_value: Option<f64>,

        #[arg(long)]
        pub street_address: Option<String>,

        #[arg(long)]
        pub city: Option<String>,

        #[arg(long)]
        pub state: Option<String>,

        #[arg(long)]
        pub zip_code: Option<String>,

        /// Fail when the parcel has no zip code instead of searching by city alone
        #[arg(long)]
        pub require_zip_code: bool,

        /// Print the saved record for this parcel without spending a credit
        #[arg(long)]
        pub show_saved: bool,

        #[arg(long)]
        pub output_path: Option<String>,

        /// Starting credit balance when no ledger file exists yet
        #[arg(long)]
        pub credits: Option<u64>,

        #[arg(long)]
        pub ledger_path: Option<String>,

        #[arg(long)]
        pub similarity_threshold: Option<f64>,

        /// Output format: text or json
        #[arg(long)]
        pub format: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// Merges the optional TOML file with command-line overrides.
        pub fn resolve(&self) -> Result<RunSettings> {
            let file_config = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };
            file_config.validate()?;
            self.resolve_with(&file_config)
        }

        pub fn resolve_with(&self, file_config: &TomlConfig) -> Result<RunSettings> {
            let comparables_path = self
                .comparables
                .clone()
                .or_else(|| file_config.source.comparables_path.clone());
            let comparables_path =
                validation::validate_required_field("comparables", &comparables_path)?.clone();

            let format_name = self
                .format
                .clone()
                .unwrap_or_else(|| file_config.output_format().to_string());
            validation::validate_one_of("format", &format_name, &toml_config::OUTPUT_FORMATS)?;

            let mut estimator = file_config.estimator_settings();
            if let Some(threshold) = self.similarity_threshold {
                estimator.similarity_threshold = threshold;
            }

            let address = ParcelAddress {
                street_address: self.street_address.clone(),
                city: self.city.clone(),
                state: self.state.clone(),
                zipcode: self.zip_code.clone(),
            };
            let has_address = address != ParcelAddress::default();

            let settings = RunSettings {
                comparables_path,
                require_zip_code: self.require_zip_code || file_config.require_zip_code(),
                output_path: self
                    .output_path
                    .clone()
                    .unwrap_or_else(|| file_config.output_path().to_string()),
                output_format: OutputFormat::from_name(&format_name),
                initial_credits: self.credits.unwrap_or_else(|| file_config.initial_credits()),
                ledger_path: self
                    .ledger_path
                    .clone()
                    .or_else(|| file_config.credits.ledger_path.clone()),
                estimator,
                target: TargetParcel {
                    address: has_address.then_some(address),
                    market_value: self.market_value,
                    gis_area_acres: self.gis_area,
                },
                show_saved: self.show_saved,
            };

            settings.validate()?;
            Ok(settings)
        }
    }

}

#[cfg(feature = "cli")]
pub use cli::CliConfig;
