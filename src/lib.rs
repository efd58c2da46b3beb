pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{BreedingConfig, Settings};

pub use crate::core::{
    calculator::BreedingCalculator, catalog::TraitCatalog, engine::BreedingEngine,
};
pub use domain::model::{
    BreedingRequest, DiversityRequest, GeneticsRequest, ParentTraits, Pedigree, TraitValue,
};
pub use utils::error::{BreedError, Result};
