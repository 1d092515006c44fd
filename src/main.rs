//! Rest Timer - A countdown between exercise sets
//!
//! This is the main entry point for the rest-timer service.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use rest_timer::{
    api::create_router,
    config::Config,
    services::{check_command_available, SystemdInhibitor},
    state::AppState,
    tasks::{Input, ScreenController},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("rest_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting rest-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, player={}, sound={}",
          config.host, config.port, config.player, config.sound_file.display());

    // Missing tools only degrade alerts and the sleep lock
    for (program, version_arg) in [("systemd-inhibit", "--version"), ("pactl", "--version"), (config.player.as_str(), "--version")] {
        if let Err(e) = check_command_available(program, version_arg).await {
            warn!("{}", e);
        }
    }

    let settings = config.settings_store()?;
    let (controller, handle) = ScreenController::new(
        Arc::clone(&settings),
        config.alerts(),
        SystemdInhibitor::new(),
    );
    let controller_task = tokio::spawn(controller.run());

    // The service is in the foreground for as long as it runs
    handle.send(Input::Resume)?;

    let state = Arc::new(AppState::new(handle.clone(), settings, config.port, config.host.clone()));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /tap       - Start or stop a rest");
    info!("  POST /camera    - Camera button: start a rest");
    info!("  PUT  /duration  - Edit the rest length field");
    info!("  POST /resume    - Screen resumed");
    info!("  POST /pause     - Screen paused");
    info!("  GET  /settings  - Read settings");
    info!("  PUT  /settings  - Save settings");
    info!("  GET  /status    - Countdown status");
    info!("  GET  /health    - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Release the sleep lock before exiting
    if let Err(e) = handle.dispatch(Input::Shutdown).await {
        warn!("Controller already stopped: {}", e);
    }
    if let Err(e) = controller_task.await {
        warn!("Controller task failed: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
