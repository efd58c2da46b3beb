use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreedError {
    #[error("Unknown trait: {trait_name}")]
    UnknownTrait { trait_name: String },

    #[error("Unknown allele '{allele}' for trait {trait_name}")]
    UnknownAllele { trait_name: String, allele: String },

    #[error("Parent {parent} is missing trait {trait_name}")]
    IncompleteTraitData { parent: String, trait_name: String },

    #[error("Value {value} for trait {trait_name} is outside [{min}, {max}]")]
    OutOfRange {
        trait_name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Trait {trait_name} needs exactly two alleles, got {count}")]
    MalformedAllelePair { trait_name: String, count: usize },

    #[error("Trait {trait_name} is {expected}, but a {found} value was supplied")]
    TraitKindMismatch {
        trait_name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error in {source_name}: {message}")]
    TomlError { source_name: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The request was rejected; the caller can correct it and resend.
    Medium,
    High,
    Critical,
}

impl BreedError {
    /// The request or config field the error points at, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            BreedError::UnknownTrait { trait_name }
            | BreedError::UnknownAllele { trait_name, .. }
            | BreedError::IncompleteTraitData { trait_name, .. }
            | BreedError::OutOfRange { trait_name, .. }
            | BreedError::MalformedAllelePair { trait_name, .. }
            | BreedError::TraitKindMismatch { trait_name, .. } => Some(trait_name.as_str()),
            BreedError::InvalidConfigValueError { field, .. } => Some(field.as_str()),
            BreedError::TomlError { source_name, .. } => Some(source_name.as_str()),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BreedError::UnknownTrait { .. }
            | BreedError::UnknownAllele { .. }
            | BreedError::IncompleteTraitData { .. }
            | BreedError::OutOfRange { .. }
            | BreedError::MalformedAllelePair { .. }
            | BreedError::TraitKindMismatch { .. }
            | BreedError::SerializationError(_) => ErrorCategory::Input,
            BreedError::ConfigError { .. }
            | BreedError::InvalidConfigValueError { .. }
            | BreedError::TomlError { .. } => ErrorCategory::Configuration,
            BreedError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BreedError::UnknownTrait { .. } => {
                "Use one of the trait names listed by the `catalog` command"
            }
            BreedError::UnknownAllele { .. } => {
                "Use an allele from the trait's dominance list in the catalog"
            }
            BreedError::IncompleteTraitData { .. } => {
                "Supply the same set of traits for both parents"
            }
            BreedError::OutOfRange { .. } => "Keep quantitative values inside the trait's bounds",
            BreedError::MalformedAllelePair { .. } => {
                "Categorical traits take a list of exactly two allele names"
            }
            BreedError::TraitKindMismatch { .. } => {
                "Use an allele pair for categorical traits and a number for quantitative ones"
            }
            BreedError::ConfigError { .. } | BreedError::InvalidConfigValueError { .. } => {
                "Check the configuration file and BREEDING_* environment variables"
            }
            BreedError::TomlError { .. } => "Make sure the file is valid TOML",
            BreedError::IoError(_) => "Check that the file exists and is readable",
            BreedError::SerializationError(_) => "Make sure the request body is valid JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid breeding request: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BreedError>;
