//! dentascan CLI
//!
//! Analyze a dental photo from the terminal, or serve the web UI.
//!
//! Copyright (c) 2025 Michael A Wright

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dental_core::request::sniff_mime_type;
use dental_core::{AnalysisState, SelectedImage, Session};
use dentascan_server::ServerConfig;
use llm_bridge::{Analyzer, Backend, BackendConfig};
use std::path::PathBuf;
use std::sync::LazyLock;

mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{}\ncommit: {}\nbuilt:  {}\ntarget: {} ({})\nrustc:  {}",
        build_info::PKG_VERSION,
        env!("DENTASCAN_COMMIT"),
        env!("DENTASCAN_BUILT_AT"),
        build_info::TARGET,
        build_info::PROFILE,
        build_info::RUSTC_VERSION,
    )
});

#[derive(Parser)]
#[command(name = "dentascan")]
#[command(version, long_version = LONG_VERSION.as_str())]
#[command(about = "Dental photo assessment via a vision model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one photo and print the formatted assessment
    Analyze {
        /// Photo of the teeth (JPEG, PNG, WebP, ...)
        #[arg(short, long)]
        image: PathBuf,

        /// Optional complaint, e.g. "gigi ngilu saat minum dingin"
        #[arg(short, long)]
        complaint: Option<String>,

        /// Backend: gemini or ollama (default from DENTASCAN_BACKEND)
        #[arg(short, long)]
        backend: Option<String>,

        /// Model name for the selected backend
        #[arg(short, long)]
        model: Option<String>,

        /// Print the structured result as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Serve the web UI and the analysis API
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "DENTASCAN_ADDR", default_value = "127.0.0.1:3000")]
        addr: String,

        /// Directory holding the built frontend
        #[arg(short, long, env = "DENTASCAN_STATIC_DIR", default_value = "dist")]
        static_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            image,
            complaint,
            backend,
            model,
            json,
        } => {
            let config = backend_config(backend.as_deref(), model)?;
            let analyzer = Analyzer::new(config.build().context("Failed to create vision model client")?);
            analyze(&analyzer, image, complaint, json).await
        }
        Commands::Serve { addr, static_dir } => {
            let config = BackendConfig::from_env().context("Invalid backend configuration")?;
            let analyzer = Analyzer::new(config.build().context("Failed to create vision model client")?);
            dentascan_server::serve(ServerConfig { addr, static_dir }, analyzer).await
        }
    }
}

fn backend_config(backend: Option<&str>, model: Option<String>) -> Result<BackendConfig> {
    let mut config = BackendConfig::from_env().context("Invalid backend configuration")?;
    if let Some(backend) = backend {
        config.backend = backend.parse()?;
    }
    if let Some(model) = model {
        match config.backend {
            Backend::Gemini => config.gemini_model = model,
            Backend::Ollama => config.ollama_model = model,
        }
    }
    Ok(config)
}

async fn analyze(analyzer: &Analyzer, path: PathBuf, complaint: Option<String>, json: bool) -> Result<()> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mime_type = sniff_mime_type(&bytes)
        .with_context(|| format!("{} is not a recognised image", path.display()))?;

    let mut session = Session::new();
    session.select_image(SelectedImage {
        name: path.display().to_string(),
        mime_type: mime_type.to_string(),
        bytes,
    });
    if let Some(complaint) = complaint {
        session.set_complaint(complaint);
    }

    match analyzer.run(&mut session).await? {
        AnalysisState::Done(result) if json => {
            println!("{}", serde_json::to_string_pretty(result)?);
            Ok(())
        }
        AnalysisState::Done(result) => {
            println!("{}", result.to_markdown());
            Ok(())
        }
        AnalysisState::Failed(message) => anyhow::bail!("{message}"),
        AnalysisState::Idle | AnalysisState::Analyzing => {
            anyhow::bail!("analysis did not complete")
        }
    }
}
