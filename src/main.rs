//! VaporBoy shell - development entry point
//!
//! Wires the store, the console engine stand-in, and the UI bindings
//! together and drops into a REPL that drives them the way the graphical
//! front-end would.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vaporboy_shell::cli::{run_repl, ReplContext};
use vaporboy_shell::components::{CanvasBinding, ComponentBinding, ControlPanelBinding};
use vaporboy_shell::config::load_config;
use vaporboy_shell::effects::TransformSet;
use vaporboy_shell::engine::{ConsoleEngine, Engine};
use vaporboy_shell::store::KeyedStore;

/// VaporBoy shell - reactive store and effect pipeline driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "shell.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    info!("Starting VaporBoy shell...");
    info!("Configuration file: {}", args.config);

    let config = load_config(&args.config).await?;

    let store = Arc::new(KeyedStore::new());
    config.seed_store(&store);

    let engine = Arc::new(ConsoleEngine::new("console"));
    let engine_dyn: Arc<dyn Engine> = engine.clone();

    let canvas = CanvasBinding::new(store.clone(), engine_dyn.clone(), TransformSet::passthrough());
    canvas.set_screenshot_source(Arc::new(|| "data:image/png;base64,".to_string()));
    let panel = ControlPanelBinding::new(store.clone(), engine_dyn);

    canvas.clone().activate();
    panel.clone().activate();
    info!("✅ Bindings activated");

    run_repl(ReplContext {
        store,
        engine,
        canvas: canvas.clone(),
        panel: panel.clone(),
    })
    .await?;

    panel.deactivate();
    canvas.deactivate();
    info!("VaporBoy shell shutdown complete");
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
