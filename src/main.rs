use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diagramgen::connector::api::controller::{DiagramController, GenerateDiagramRequest};
use diagramgen::connector::api::DEFAULT_PORT;
use diagramgen::{
    serve, Commands, Container, ContainerConfig, ValidationMode, PROMPT_TEMPLATE_VERSION,
    SYSTEM_INSTRUCTION,
};

#[derive(Parser)]
#[command(name = "diagramgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer every prompt with the built-in example instead of calling Gemini
    #[arg(long, global = true)]
    mock: bool,

    /// How to treat diagrams that break the structural contract (strict or lenient)
    #[arg(long, global = true, env = "DIAGRAM_VALIDATION")]
    validation: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ContainerConfig::from_env();
    config.mock_completion = cli.mock;
    if let Some(mode) = cli.validation.as_deref() {
        config.validation = ValidationMode::parse(mode);
    }

    let command = cli.command.unwrap_or_else(|| Commands::Serve {
        port: std::env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT),
        public: false,
    });

    match command {
        Commands::Serve { port, public } => {
            let container = Arc::new(Container::new(config));
            let ip = if public {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            };
            info!(
                "Starting diagramgen {} (model {}, validation {})",
                env!("CARGO_PKG_VERSION"),
                container.model_name(),
                container.validation_mode().as_str()
            );
            serve(container, SocketAddr::new(ip, port)).await?;
        }

        Commands::Generate { prompt, compact } => {
            let container = Container::new(config);
            if !container.credentials_present() {
                bail!("GEMINI_API_KEY is not set (use --mock to run offline)");
            }

            let request = GenerateDiagramRequest {
                user_prompt: Some(prompt),
            };
            let document = DiagramController::new(&container).generate(request).await?;

            let output = if compact {
                serde_json::to_string(&document)?
            } else {
                serde_json::to_string_pretty(&document)?
            };
            println!("{}", output);
        }

        Commands::Prompt => {
            println!("# prompt template v{}", PROMPT_TEMPLATE_VERSION);
            println!("{}", SYSTEM_INSTRUCTION.trim());
        }
    }

    Ok(())
}
