mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mpbot-cli")]
#[command(about = "Normalize marketplace listings into price lines and image sets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline and print the normalized listing as JSON
    Normalize {
        /// Raw listing JSON file
        #[arg(long)]
        input: PathBuf,
        /// Detail-page HTML fragment served as the listing's detail images
        #[arg(long)]
        detail_html: Option<PathBuf>,
        /// Drop detail images without an explicit size instead of probing them
        #[arg(long)]
        no_probe: bool,
    },
    /// Print only the price lines
    Prices {
        /// Raw listing JSON file
        #[arg(long)]
        input: PathBuf,
    },
    /// Print only the final image URLs
    Images {
        /// Raw listing JSON file
        #[arg(long)]
        input: PathBuf,
        /// Detail-page HTML fragment served as the listing's detail images
        #[arg(long)]
        detail_html: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = mpbot_core::load_engine_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Normalize {
            input,
            detail_html,
            no_probe,
        } => run::run_normalize(config, &input, detail_html, no_probe).await,
        Commands::Prices { input } => run::run_prices(&config, &input).await,
        Commands::Images { input, detail_html } => {
            run::run_images(&config, &input, detail_html).await
        }
    }
}
