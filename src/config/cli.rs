use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "dragon-breed")]
#[command(about = "Offspring trait and breeding success calculator for dragons")]
pub struct CliConfig {
    /// Path to a TOML settings file; environment variables still apply on top
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed the random source for reproducible results
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Predict offspring traits for two parents
    Calculate {
        /// Request body file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Expressed-allele probabilities for one categorical trait
    Analyze {
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Breeding success rate for two parents
    Predict {
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Full Punnett square for one categorical trait
    Punnett {
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Per-trait diversity of a population
    Diversity {
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Print the trait catalog in use
    Catalog,
}

impl Command {
    pub fn input(&self) -> Option<&str> {
        match self {
            Command::Calculate { input }
            | Command::Analyze { input }
            | Command::Predict { input }
            | Command::Punnett { input }
            | Command::Diversity { input } => Some(input.as_str()),
            Command::Catalog => None,
        }
    }
}
