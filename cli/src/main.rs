use clap::Parser;
use colored::*;
use dotenvy::dotenv;
use log::LevelFilter;
use std::error::Error;

use tutor_core::client::GeminiClient;
use tutor_core::config::TutorConfig;
use tutor_core::gateway::Gateway;

mod app;
mod cli;
mod logging;
mod output;
mod session;

use crate::cli::{Args, Command};
use crate::logging::{log_error, log_info};

/// Main function - builds the gateway and dispatches the selected tool
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, applying the API-key environment override
    let mut config = match &args.config {
        Some(path) => TutorConfig::load_from_file(path)?,
        None => TutorConfig::load()?,
    };
    if config.api_key.is_none() {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
    }

    // Get log level from config or use default; --verbose wins
    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        config
            .log_level
            .as_deref()
            .map(|level| match level.to_lowercase().as_str() {
                "trace" => LevelFilter::Trace,
                "debug" => LevelFilter::Debug,
                "info" => LevelFilter::Info,
                "warn" => LevelFilter::Warn,
                "error" => LevelFilter::Error,
                _ => LevelFilter::Info,
            })
            .unwrap_or(LevelFilter::Info)
    };

    // Initialize logger with configured log level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.to_string()),
    )
    .init();

    // Initialize the Gemini client
    let client = match GeminiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            log_error(&format!("Failed to initialize Gemini client: {}", e));
            eprintln!(
                "{}",
                "Defina GEMINI_API_KEY (ou api_key no arquivo de configuração) para usar o tutor."
                    .red()
            );
            return Err(e.into());
        }
    };
    let gateway = Gateway::new(client, &config);
    log_info("Gemini client initialized.");

    // Dispatch the selected tool
    let result = match args.command {
        Command::Tutor { prompt, image } => app::run_tutor(&gateway, prompt, image).await,
        Command::Analyze { image, prompt } => app::run_analyze(&gateway, image, prompt).await,
        Command::Slides {
            topic,
            images,
            out_dir,
            interactive,
        } => app::run_slides(&gateway, topic, images, out_dir, interactive).await,
        Command::Quiz { topic } => app::run_quiz(&gateway, topic).await,
        Command::MindMap { topic } => app::run_mind_map(&gateway, topic).await,
        Command::Essay { topic, essay_file } => app::run_essay(&gateway, topic, essay_file).await,
        Command::Library { query } => app::run_library(&gateway, query).await,
    };

    if let Err(e) = result {
        log_error(&format!("Command failed: {}", e));
        eprintln!("{}", format!("Erro: {}", e).red());
        return Err(e.into());
    }

    Ok(())
}
