use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use frontdesk_kiosk::screens::{FileScreenStore, MemoryScreenStore, ScreenStore};
use frontdesk_kiosk::{DeviceClass, HttpBackend, KioskConfig, NoCamera, ScreenController};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config_path = std::env::var("FRONTDESK_KIOSK_CONFIG")
        .unwrap_or_else(|_| "frontdesk-kiosk.json".to_string());
    let config = KioskConfig::load(&config_path)
        .with_context(|| format!("could not load kiosk config from {config_path}"))?;

    info!(
        "frontdesk kiosk starting (station {}, {:?})",
        config.station_id, config.device_class
    );

    let store: Arc<dyn ScreenStore> = match (&config.device_class, &config.screen_state_path) {
        (DeviceClass::Mobile, Some(path)) => Arc::new(FileScreenStore::new(path.into())?),
        _ => Arc::new(MemoryScreenStore::new()),
    };

    let backend = Arc::new(HttpBackend::new(&config)?);
    // Camera integration is platform-specific and injected; the reference
    // binary runs headless, so scanning screens surface "no camera" inline.
    let controller = ScreenController::new(&config, backend, Arc::new(NoCamera), store);

    let props = controller.start().await?;
    info!("entry screen ready: {}", serde_json::to_string(&props)?);

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    controller.shutdown().await;

    Ok(())
}
