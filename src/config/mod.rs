#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use settings::{BreedingConfig, LoggingConfig, Profile, Settings};
