use crate::utils::error::{PricerError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PricerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PricerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension.to_ascii_lowercase().as_str()) => Ok(()),
        Some(extension) => Err(PricerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(PricerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PricerError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PricerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(PricerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// Accepts values in `(min, max]`.
pub fn validate_open_closed_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value <= min || value > max {
        return Err(PricerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be greater than {} and at most {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.path", "./output").is_ok());
        assert!(validate_path("output.path", "").is_err());
        assert!(validate_path("output.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("source.comparables_path", "comps.csv", &["csv", "json"]).is_ok());
        assert!(validate_file_extension("source.comparables_path", "COMPS.JSON", &["csv", "json"]).is_ok());
        assert!(validate_file_extension("source.comparables_path", "comps.txt", &["csv", "json"]).is_err());
        assert!(validate_file_extension("source.comparables_path", "comps", &["csv", "json"]).is_err());
    }

    #[test]
    fn test_validate_open_closed_range() {
        assert!(validate_open_closed_range("estimator.similarity_threshold", 0.25, 0.0, 1.0).is_ok());
        assert!(validate_open_closed_range("estimator.similarity_threshold", 1.0, 0.0, 1.0).is_ok());
        assert!(validate_open_closed_range("estimator.similarity_threshold", 0.0, 0.0, 1.0).is_err());
        assert!(validate_open_closed_range("estimator.similarity_threshold", 1.5, 0.0, 1.0).is_err());
        assert!(validate_open_closed_range("estimator.similarity_threshold", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_required_and_one_of() {
        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("address.zipcode", &missing),
            Err(PricerError::MissingConfigError { .. })
        ));
        assert!(validate_one_of("output.format", "json", &["text", "json"]).is_ok());
        assert!(validate_one_of("output.format", "xml", &["text", "json"]).is_err());
        assert!(validate_non_empty_string("address.zipcode", "  ").is_err());
    }
}
