use crate::utils::error::{BreedError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_rate(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(BreedError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    validate_range(field_name, value, 0.0, 1.0)
}

pub fn validate_bounds(field_name: &str, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(BreedError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", min, max),
            reason: "Minimum must be lower than maximum".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BreedError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_unique_names<'a, I>(field_name: &str, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        validate_non_empty_string(field_name, name)?;
        if !seen.insert(name) {
            return Err(BreedError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.to_string(),
                reason: "Duplicate name".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value.to_ascii_lowercase().as_str()) {
        return Err(BreedError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Expected one of: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BreedError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("mutation_rate", 0.05).is_ok());
        assert!(validate_rate("mutation_rate", 0.0).is_ok());
        assert!(validate_rate("mutation_rate", 1.5).is_err());
        assert!(validate_rate("mutation_rate", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds("success_rate", 10.0, 95.0).is_ok());
        assert!(validate_bounds("success_rate", 95.0, 10.0).is_err());
        assert!(validate_bounds("success_rate", 50.0, 50.0).is_err());
    }

    #[test]
    fn test_validate_unique_names() {
        assert!(validate_unique_names("dominance", ["gold", "red"]).is_ok());
        assert!(validate_unique_names("dominance", ["gold", "gold"]).is_err());
        assert!(validate_unique_names("dominance", ["gold", " "]).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("log_level", "INFO", &["info", "debug"]).is_ok());
        assert!(validate_one_of("log_level", "loud", &["info", "debug"]).is_err());
    }
}
