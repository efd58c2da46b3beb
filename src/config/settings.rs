use crate::utils::error::{BreedError, Result};
use crate::utils::validation::{
    validate_bounds, validate_non_empty_string, validate_one_of, validate_range, validate_rate,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Knobs the calculator reads. Fixed for the lifetime of a calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConfig {
    pub mutation_enabled: bool,
    pub mutation_rate: f64,
    pub min_success_rate: f64,
    pub max_success_rate: f64,
    /// Largest relative swing applied to a blended quantitative value.
    pub quantitative_variation: f64,
    pub inbreeding_penalties: bool,
    /// Traits both parents must carry, on top of the ones either supplies.
    pub required_traits: Vec<String>,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            mutation_enabled: true,
            mutation_rate: 0.05,
            min_success_rate: 10.0,
            max_success_rate: 95.0,
            quantitative_variation: 0.1,
            inbreeding_penalties: true,
            required_traits: Vec::new(),
        }
    }
}

impl BreedingConfig {
    /// No mutation and no variation; handy when exact numbers matter.
    pub fn deterministic() -> Self {
        Self {
            mutation_enabled: false,
            quantitative_variation: 0.0,
            ..Self::default()
        }
    }
}

impl Validate for BreedingConfig {
    fn validate(&self) -> Result<()> {
        validate_rate("breeding.mutation_rate", self.mutation_rate)?;
        validate_rate("breeding.quantitative_variation", self.quantitative_variation)?;
        validate_bounds(
            "breeding.success_rate",
            self.min_success_rate,
            self.max_success_rate,
        )?;
        validate_range("breeding.min_success_rate", self.min_success_rate, 0.0, 100.0)?;
        validate_range("breeding.max_success_rate", self.max_success_rate, 0.0, 100.0)?;
        for name in &self.required_traits {
            validate_non_empty_string("breeding.required_traits", name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    Production,
    Testing,
}

impl Profile {
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Profile::Development | Profile::Testing => "debug",
            Profile::Production => "warn",
        }
    }
}

impl FromStr for Profile {
    type Err = BreedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "default" => Ok(Profile::Development),
            "production" => Ok(Profile::Production),
            "testing" => Ok(Profile::Testing),
            other => Err(BreedError::InvalidConfigValueError {
                field: "profile".to_string(),
                value: other.to_string(),
                reason: "Expected development, production or testing".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Falls back to the profile's level when unset.
    pub level: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub profile: Profile,
    pub breeding: BreedingConfig,
    pub logging: LoggingConfig,
    /// Seed for the engine's random source; entropy when absent.
    pub seed: Option<u64>,
    /// TOML trait catalog to use instead of the built-in dragon table.
    pub catalog_path: Option<String>,
}

impl Settings {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content, &path.as_ref().display().to_string())
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, "settings")
    }

    fn parse(content: &str, source_name: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BreedError::TomlError {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    /// 替換環境變數 (例如 ${MUTATION_RATE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BreedError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Defaults overridden by whichever breeding variables are set.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(profile) = lookup("BREEDING_ENV") {
            self.profile = profile.parse()?;
        }
        if let Some(v) = lookup("ENABLE_MUTATIONS") {
            self.breeding.mutation_enabled = parse_flag("ENABLE_MUTATIONS", &v)?;
        }
        if let Some(v) = lookup("MUTATION_RATE") {
            self.breeding.mutation_rate = parse_number("MUTATION_RATE", &v)?;
        }
        if let Some(v) = lookup("MIN_BREEDING_SUCCESS_RATE") {
            self.breeding.min_success_rate = parse_number("MIN_BREEDING_SUCCESS_RATE", &v)?;
        }
        if let Some(v) = lookup("MAX_BREEDING_SUCCESS_RATE") {
            self.breeding.max_success_rate = parse_number("MAX_BREEDING_SUCCESS_RATE", &v)?;
        }
        if let Some(v) = lookup("ENABLE_INBREEDING_PENALTIES") {
            self.breeding.inbreeding_penalties = parse_flag("ENABLE_INBREEDING_PENALTIES", &v)?;
        }
        if let Some(v) = lookup("QUANTITATIVE_VARIATION") {
            self.breeding.quantitative_variation = parse_number("QUANTITATIVE_VARIATION", &v)?;
        }
        if let Some(v) = lookup("BREEDING_SEED") {
            self.seed = Some(parse_number("BREEDING_SEED", &v)?);
        }
        if let Some(v) = lookup("BREEDING_CATALOG") {
            self.catalog_path = Some(v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = Some(v.to_ascii_lowercase());
        }
        Ok(self)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .level
            .as_deref()
            .unwrap_or_else(|| self.profile.default_log_level())
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(BreedError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected true or false".to_string(),
        }),
    }
}

fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BreedError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected a number".to_string(),
        })
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.breeding.validate()?;
        validate_one_of("logging.level", self.log_level(), &LOG_LEVELS)?;
        if let Some(path) = &self.catalog_path {
            validate_non_empty_string("catalog_path", path)?;
        }
        Ok(())
    }
}
