use tokio::task;
use tommotica_sync::app_config::AppConfig;
use tommotica_sync::coordinator::Coordinator;
use tommotica_sync::presentation_listener::presentation_listener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let mut coordinator = Coordinator::new(&config)?;
    let lights = coordinator.start().await?;

    for light in lights {
        task::spawn(presentation_listener(light));
    }
    info!("✅  Initialized presentation listeners");

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down...");
    coordinator.shutdown().await;

    Ok(())
}
