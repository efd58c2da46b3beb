use anyhow::Context;
use clap::Parser;
use dragon_breed::config::{CliConfig, Command};
use dragon_breed::domain::response::ErrorResponse;
use dragon_breed::utils::error::ErrorSeverity;
use dragon_breed::utils::{logger, validation::Validate};
use dragon_breed::{
    BreedError, BreedingEngine, BreedingRequest, DiversityRequest, GeneticsRequest, Settings,
};
use serde::de::DeserializeOwned;
use std::io::Read;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => Settings::default(),
    };
    let mut settings = settings
        .with_env_overrides()
        .context("Failed to read breeding settings from the environment")?;

    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    if cli.verbose {
        settings.logging.level = Some("debug".to_string());
    }
    if cli.json_logs {
        settings.logging.json = true;
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // 初始化日誌
    logger::init_logger(settings.log_level(), settings.logging.json);

    tracing::info!("Starting dragon-breed ({:?} profile)", settings.profile);
    if cli.verbose {
        tracing::debug!("Settings: {:?}", settings);
    }

    let outcome = BreedingEngine::from_settings(&settings).and_then(|mut engine| {
        run(&mut engine, &cli.command)
    });

    match outcome {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(&e))?);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run(engine: &mut BreedingEngine, command: &Command) -> Result<serde_json::Value, BreedError> {
    let body = match command {
        Command::Calculate { input } => {
            let request: BreedingRequest = read_request(input)?;
            serde_json::to_value(engine.calculate(&request)?)?
        }
        Command::Analyze { input } => {
            let request: GeneticsRequest = read_request(input)?;
            serde_json::to_value(engine.analyze(&request)?)?
        }
        Command::Predict { input } => {
            let request: BreedingRequest = read_request(input)?;
            serde_json::to_value(engine.predict(&request)?)?
        }
        Command::Punnett { input } => {
            let request: GeneticsRequest = read_request(input)?;
            serde_json::to_value(engine.punnett(&request)?)?
        }
        Command::Diversity { input } => {
            let request: DiversityRequest = read_request(input)?;
            serde_json::to_value(engine.diversity(&request)?)?
        }
        Command::Catalog => {
            let traits: Vec<_> = engine.calculator().catalog().traits().collect();
            serde_json::to_value(traits)?
        }
    };
    Ok(body)
}

fn read_request<T: DeserializeOwned>(input: &str) -> Result<T, BreedError> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(input)?
    };
    tracing::debug!("Read {} bytes of request body from {}", content.len(), input);
    Ok(serde_json::from_str(&content)?)
}
