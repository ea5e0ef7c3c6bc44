//! nested-router server binary.
//!
//! Loads a TOML route table and serves it, or prints the compiled table.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nested_router::config::{load_config, ServerConfig};
use nested_router::observability::logging;
use nested_router::routing::{Routable, Router};

#[derive(Parser)]
#[command(name = "nested-router")]
#[command(about = "HTTP server routing requests through nested route tables", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "NESTED_ROUTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the configured routes (default)
    Serve {
        /// Override listener.bind_address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print the compiled route table in precedence order
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.listener.bind_address = bind;
            }
            logging::init(&config.observability)?;
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                config = ?cli.config,
                "nested-router starting"
            );
            nested_router::lifecycle::run(config).await?;
        }
        Commands::Routes => {
            let router = config.routes.build()?;
            print_routes(&router, 0);
        }
    }

    Ok(())
}

fn print_routes(router: &Router, depth: usize) {
    for route in router.routes() {
        let names: Vec<_> = route.chain().iter().map(Routable::name).collect();
        println!(
            "{:indent$}{:?} -> {}",
            "",
            route.pattern().source(),
            names.join(", "),
            indent = depth * 2
        );
        for nested in route.chain().iter().filter_map(Routable::as_router) {
            print_routes(nested, depth + 1);
        }
    }
}
