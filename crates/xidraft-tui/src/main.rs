// xidraft entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the player catalog (falling back to the other one if needed)
// 4. Create mpsc channels
// 5. Spawn the app loop
// 6. Run the TUI until the user quits

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use xidraft_core::app::{self, AppState};
use xidraft_core::config;
use xidraft_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("xidraft starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: offer size {}, scouting delay {}ms, default catalog {}",
        config.draft.offer_size,
        config.draft.scouting_delay_ms,
        config.draft.default_source.label()
    );

    let (source, players) =
        app::load_initial_catalog(&config).context("failed to load a player catalog")?;
    info!("Starting with {} ({} players)", source.label(), players.len());

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let state = AppState::new(config, source, players);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, state).await {
            error!("Application loop error: {}", e);
        }
    });

    // Blocks until the user quits.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("xidraft shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("xidraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xidraft=info,xidraft_core=info,xidraft_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
