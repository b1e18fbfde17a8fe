//! NoteDesk console binary.

use std::path::PathBuf;

use anyhow::Context;
use notedesk_server::{AppState, Settings, auth, metrics, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // First argument, if any, is the settings file.
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings =
        Settings::load(settings_path.as_deref()).context("Failed to load settings")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting NoteDesk v{}",
        env!("CARGO_PKG_VERSION")
    );

    let addr = settings.listen_addr()?;
    let prometheus_handle = metrics::init_metrics().context("Failed to install metrics recorder")?;

    let state = AppState::from_settings(&settings).context("Failed to build platform client")?;
    if !auth::restore(&state).await {
        tracing::info!("No saved session, waiting for login");
    }

    tracing::info!(
        session_file = %settings.session.file.display(),
        upload_dir = %settings.upload.dir.display(),
        "Console ready"
    );

    run_server_with_state(
        addr,
        state,
        prometheus_handle,
        settings.upload.max_body_bytes,
    )
    .await?;

    Ok(())
}
