//! Orderdesk CLI - serves the Product/Order HTTP API

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use orderdesk::config::{self, OrderdeskConfig, ServeSettings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "orderdesk")]
#[command(version)]
#[command(about = "Product and order CRUD backend over SQLite")]
#[command(long_about = r#"
Orderdesk exposes products and orders over a small JSON API:
  GET  /product/get, /product/get/{id}    POST /product/add
  GET  /order/get,   /order/get/{id}      POST /order/add
  PUT  /{product,order}/update/{id}       DELETE /{product,order}/delete/{id}

Example usage:
  orderdesk init
  orderdesk serve --port 5000
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Write a config file with the default settings
    Init {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { config: config_path, database, host, port, no_cors } => {
            let file_config = config::load_config(config_path.as_deref())?.unwrap_or_default();
            let cli_config = OrderdeskConfig {
                database: database.map(|p| p.to_string_lossy().to_string()),
                host,
                port,
                cors: no_cors.then_some(false),
            };

            let settings = ServeSettings::from(file_config.overlay(cli_config));
            tracing::info!("Using database {}", settings.database.display());
            orderdesk::server::start_server(settings).await?;
        }

        Commands::Init { config: config_path, force } => {
            let path = config_path.unwrap_or_else(config::default_config_path);
            config::write_config(&path, &OrderdeskConfig::with_defaults(), force)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
