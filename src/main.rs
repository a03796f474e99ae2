//! Knowledge Engine - a learning assistant backed by a tool-calling agent

use anyhow::Result;
use clap::{Parser, Subcommand};
use knowledge_engine::{config::EngineConfig, documents::Documents, gateway::GatewayBuilder};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "knowledge-engine")]
#[command(version)]
#[command(about = "Learning assistant with Wikipedia, a knowledge base and study tools")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "KNOWLEDGE_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding the JSON documents
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Print record counts for each document
    Stats,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("knowledge_engine={},tower_http=debug", log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        EngineConfig::from_file(config_path)?
    } else {
        EngineConfig::default()
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            run_server(config, host, port, data_dir).await?;
        }
        Commands::Stats => {
            show_stats(&config).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_server(
    config: EngineConfig,
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let mut builder = GatewayBuilder::new().config(config);
    if let Some(host) = host {
        builder = builder.host(host);
    }
    if let Some(port) = port {
        builder = builder.port(port);
    }
    if let Some(dir) = data_dir {
        builder = builder.data_dir(dir);
    }

    let gateway = builder.build()?;
    tracing::info!("Knowledge Engine is starting. Press Ctrl+C to stop.");
    gateway.serve().await?;

    Ok(())
}

async fn show_stats(config: &EngineConfig) -> Result<()> {
    let documents = Documents::new(config.storage.data_dir.clone());
    let stats = documents.stats().await?;

    println!("📊 Knowledge Engine ({})", documents.data_dir().display());
    println!();
    println!("  Knowledge entries: {}", stats.knowledge_entries);
    println!("  Flashcard decks:   {}", stats.flashcard_decks);
    println!("  Mind maps:         {}", stats.mindmaps);
    println!("  Ideas:             {}", stats.ideas);
    println!("  Vocabulary words:  {}", stats.vocabulary_words);

    Ok(())
}

fn show_config(config: Option<&EngineConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
