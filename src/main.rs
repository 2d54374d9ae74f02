use std::io;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_system::{config::Config, console, AppState};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cinema reservation console");

    let mut state = AppState::new(config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    console::run(&mut state, stdin.lock(), stdout.lock())?;

    info!("Shutting down");
    Ok(())
}
