use thiserror::Error;

/// Failures of the estimator itself. Retrying with the same input yields the same failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateError {
    #[error("No comparable observations with both a positive area and a positive price")]
    NoValidObservations,

    #[error("Target parcel has no usable GIS area")]
    MissingTargetArea,

    #[error("Comparable prices are too large to produce a finite estimate")]
    NonFiniteEstimate,
}

#[derive(Error, Debug)]
pub enum PricerError {
    #[error("Estimation failed: {0}")]
    Estimate(#[from] EstimateError),

    #[error("Comparable source failed: {message}")]
    UpstreamFetch { message: String },

    #[error("No credits remaining")]
    InsufficientCredits,

    #[error("An estimate for '{key}' is already running")]
    EstimateInProgress { key: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Upstream,
    Account,
    Concurrency,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PricerError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFetch {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Estimate(_) | Self::ValidationError { .. } => ErrorCategory::Data,
            Self::UpstreamFetch { .. } => ErrorCategory::Upstream,
            Self::InsufficientCredits => ErrorCategory::Account,
            Self::EstimateInProgress { .. } => ErrorCategory::Concurrency,
            Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Io
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EstimateInProgress { .. } => ErrorSeverity::Low,
            Self::UpstreamFetch { .. } => ErrorSeverity::Medium,
            Self::Estimate(_)
            | Self::InsufficientCredits
            | Self::ValidationError { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Estimate(EstimateError::NoValidObservations) => {
                "Widen the search area or supply comparables that include both acreage and price"
            }
            Self::Estimate(EstimateError::MissingTargetArea) => {
                "Provide the parcel's GIS area in acres (must be greater than zero)"
            }
            Self::Estimate(EstimateError::NonFiniteEstimate) => {
                "Check the comparables for prices or acreages entered in the wrong unit"
            }
            Self::UpstreamFetch { .. } => "Check that the comparable source is reachable and retry",
            Self::InsufficientCredits => "Purchase more credits to continue analyzing properties",
            Self::EstimateInProgress { .. } => "Wait for the running estimate to finish",
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Check that the comparables file is valid CSV or JSON"
            }
            Self::IoError(_) => "Check file paths and permissions",
            Self::ValidationError { .. } => "Check the parcel details passed on the command line",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file and arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Estimate(EstimateError::NoValidObservations) => {
                "No comparable properties found for this parcel".to_string()
            }
            Self::Estimate(EstimateError::MissingTargetArea) => {
                "The parcel's area is unknown, so a price cannot be estimated".to_string()
            }
            Self::Estimate(EstimateError::NonFiniteEstimate) => {
                "The comparable prices are out of range, so a price cannot be estimated".to_string()
            }
            Self::ValidationError { message } => message.clone(),
            Self::InsufficientCredits => "You are out of credits".to_string(),
            Self::UpstreamFetch { .. } => "Comparable sales could not be retrieved".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PricerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_errors_are_distinguishable() {
        let none: PricerError = EstimateError::NoValidObservations.into();
        let area: PricerError = EstimateError::MissingTargetArea.into();

        assert!(matches!(none, PricerError::Estimate(EstimateError::NoValidObservations)));
        assert!(matches!(area, PricerError::Estimate(EstimateError::MissingTargetArea)));
        assert_ne!(none.user_friendly_message(), area.user_friendly_message());
        assert_eq!(none.category(), ErrorCategory::Data);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(PricerError::upstream("timeout").severity() < PricerError::InsufficientCredits.severity());
        assert_eq!(
            PricerError::MissingConfigError {
                field: "source.comparables_path".to_string()
            }
            .severity(),
            ErrorSeverity::Critical
        );
    }
}
