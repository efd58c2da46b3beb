use crate::domain::model::{
    AlleleProbability, BreedingSuccess, DiversityReport, GenotypeProbability, OffspringPrediction,
    PunnettSquare,
};
use crate::utils::error::{BreedError, ErrorCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub offspring: OffspringPrediction,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub trait_name: String,
    pub probabilities: Vec<AlleleProbability>,
    pub genotypes: Vec<GenotypeProbability>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    pub breeding_success_rate: f64,
    pub details: BreedingSuccess,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunnettResponse {
    pub success: bool,
    pub punnett_square: PunnettSquare,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversityResponse {
    pub success: bool,
    pub diversity: DiversityReport,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub category: ErrorCategory,
    pub suggestion: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl From<&BreedError> for ErrorResponse {
    fn from(err: &BreedError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            field: err.field().map(str::to_string),
            category: err.category(),
            suggestion: err.recovery_suggestion(),
            timestamp: Utc::now(),
        }
    }
}
