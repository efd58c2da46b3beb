pub mod calculator;
pub mod catalog;
pub mod engine;
pub mod genetics;

pub use crate::domain::model::{
    BreedingSuccess, OffspringPrediction, ParentTraits, ProbabilityDistribution, TraitDefinition,
};
pub use crate::utils::error::Result;
