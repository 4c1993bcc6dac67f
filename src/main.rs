//! Cherry CRUD entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;

use cherry_crud::api::{create_router, serve, ApiDoc, AppState};
use cherry_crud::config::Config;
use cherry_crud::error::AppError;
use cherry_crud::items::{InMemoryItemStore, ItemRepository};
use cherry_crud::metrics;
use cherry_crud::utils::shutdown_signal;

/// Cherry CRUD item board.
#[derive(Parser, Debug)]
#[command(name = "cherry-crud")]
#[command(about = "Item board with a REST API and an in-memory store")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the API and UI (default).
    Serve {
        /// Interface address to bind (overrides HOST).
        #[arg(long)]
        host: Option<String>,

        /// HTTP port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Start with an empty store.
        #[arg(long)]
        no_seed: bool,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print the OpenAPI document as JSON.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration is needed before logging to pick the format
    let config = Config::load().map_err(AppError::from);
    let log_json = config.as_ref().map(|c| c.log_json).unwrap_or(false);
    let verbose = args.verbose || config.as_ref().map(|c| c.verbose).unwrap_or(false);

    // Initialize logging
    let filter = if verbose {
        EnvFilter::new("cherry_crud=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(log_json.then(|| fmt::layer().json()))
        .with((!log_json).then(fmt::layer))
        .with(filter)
        .init();

    let config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Openapi) => cmd_openapi(),
        Some(Command::Serve {
            host,
            port,
            no_seed,
        }) => cmd_serve(config, host, port, no_seed).await,
        None => cmd_serve(config, None, None, false).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CHERRY CRUD - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Address: {}:{}", config.host, config.port);
    println!("  Seed Sample Items: {}", config.seed_sample_items);
    println!("  Swagger UI: {}", if config.swagger_ui { "Enabled" } else { "Disabled" });
    println!("  Log Filter: {}", config.rust_log);
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the OpenAPI document.
fn cmd_openapi() -> anyhow::Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    no_seed: bool,
) -> anyhow::Result<()> {
    // Override with CLI args if provided
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if no_seed {
        config.seed_sample_items = false;
    }

    // Validate configuration
    let config = config.checked().map_err(|e| {
        error!("{}", e);
        e
    })?;
    let addr = config.socket_addr()?;

    // Metrics recorder
    let prometheus = match metrics::install_prometheus() {
        Ok(handle) => {
            metrics::init_metrics();
            Some(handle)
        }
        Err(e) => {
            warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
            None
        }
    };

    // Item store
    let store = if config.seed_sample_items {
        InMemoryItemStore::seeded()
    } else {
        InMemoryItemStore::new()
    };
    info!(items = store.len(), "Item store ready");
    let items: Arc<dyn ItemRepository> = Arc::new(store);

    // Create app state
    let mut app_state = AppState::new(items);
    if let Some(handle) = prometheus {
        app_state = app_state.with_prometheus(handle);
    }

    let router = create_router(app_state.clone(), config.swagger_ui);

    // Start HTTP server
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);
    if config.swagger_ui {
        info!("API docs at /swagger-ui");
    }

    app_state.set_ready(true);
    serve(listener, router, shutdown_signal()).await?;

    app_state.set_ready(false);
    info!("Server stopped");
    Ok(())
}
