use crate::core::estimator::EstimatorSettings;
use crate::utils::error::{PricerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INITIAL_CREDITS: u64 = 10;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const OUTPUT_FORMATS: [&str; 2] = ["text", "json"];
pub const COMPARABLE_EXTENSIONS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub credits: CreditsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub similarity_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub comparables_path: Option<String>,
    /// Refuse to look up comparables for a parcel without a zip code.
    pub require_zip_code: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditsConfig {
    pub initial_balance: Option<u64>,
    /// When unset, credits live only for the duration of the run.
    pub ledger_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COMPS_FILE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PricerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn estimator_settings(&self) -> EstimatorSettings {
        let defaults = EstimatorSettings::default();
        EstimatorSettings {
            similarity_threshold: self
                .estimator
                .similarity_threshold
                .unwrap_or(defaults.similarity_threshold),
        }
    }

    pub fn require_zip_code(&self) -> bool {
        self.source.require_zip_code.unwrap_or(false)
    }

    pub fn initial_credits(&self) -> u64 {
        self.credits.initial_balance.unwrap_or(DEFAULT_INITIAL_CREDITS)
    }

    pub fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn output_format(&self) -> &str {
        self.output.format.as_deref().unwrap_or("text")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.estimator.similarity_threshold {
            validation::validate_open_closed_range(
                "estimator.similarity_threshold",
                threshold,
                0.0,
                1.0,
            )?;
        }

        if let Some(path) = &self.source.comparables_path {
            validation::validate_path("source.comparables_path", path)?;
            validation::validate_file_extension(
                "source.comparables_path",
                path,
                &COMPARABLE_EXTENSIONS,
            )?;
        }

        if let Some(path) = &self.credits.ledger_path {
            validation::validate_path("credits.ledger_path", path)?;
        }

        validation::validate_path("output.path", self.output_path())?;
        validation::validate_one_of("output.format", self.output_format(), &OUTPUT_FORMATS)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[estimator]
similarity_threshold = 0.3

[source]
comparables_path = "./comps/elgin.csv"
require_zip_code = true

[credits]
initial_balance = 25
ledger_path = "./state/credits.json"

[output]
path = "./reports"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.estimator_settings().similarity_threshold, 0.3);
        assert_eq!(config.source.comparables_path.as_deref(), Some("./comps/elgin.csv"));
        assert!(config.require_zip_code());
        assert_eq!(config.initial_credits(), 25);
        assert_eq!(config.output_path(), "./reports");
        assert_eq!(config.output_format(), "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.estimator_settings(), EstimatorSettings::default());
        assert_eq!(config.initial_credits(), DEFAULT_INITIAL_CREDITS);
        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(config.output_format(), "text");
        assert!(!config.require_zip_code());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PARCEL_PRICER_TEST_COMPS", "/data/comps.json");

        let toml_content = r#"
[source]
comparables_path = "${PARCEL_PRICER_TEST_COMPS}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.comparables_path.as_deref(), Some("/data/comps.json"));

        std::env::remove_var("PARCEL_PRICER_TEST_COMPS");
    }

    #[test]
    fn test_config_validation() {
        let bad_threshold = TomlConfig::from_toml_str("[estimator]\nsimilarity_threshold = 0.0\n").unwrap();
        assert!(bad_threshold.validate().is_err());

        let bad_format = TomlConfig::from_toml_str("[output]\nformat = \"xml\"\n").unwrap();
        assert!(bad_format.validate().is_err());

        let bad_source = TomlConfig::from_toml_str("[source]\ncomparables_path = \"comps.xlsx\"\n").unwrap();
        assert!(bad_source.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[estimator"),
            Err(PricerError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[credits]\ninitial_balance = 3\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.initial_credits(), 3);
    }
}
