use anyhow::Result;
use call_nope::config::Config;
use call_nope::engine::{Classifier, FilePatternSource, ReloadWatcher, RuleSet};
use call_nope::init::setup_logging;
use call_nope::server;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args().nth(1).unwrap_or("config.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting call-nope...");

    if !std::path::Path::new(&config_path).exists() {
        info!("Config file not found, using defaults.");
    }

    // 3. Initial Pattern Load
    // The first load happens before the server binds, so traffic never hits
    // an uninitialized classifier. A missing file only costs live reload.
    let source = Arc::new(FilePatternSource::new(&config.pattern_file));
    let classifier = Classifier::new(RuleSet::default());
    let watcher = ReloadWatcher::new(
        classifier.clone(),
        source,
        Duration::from_secs(config.reload.interval_seconds),
    );
    watcher.load_once().await;

    // 4. Spawn Reload Watcher
    let cancel = CancellationToken::new();
    let watcher_handle = tokio::spawn(watcher.run(cancel.clone()));

    // 5. Start HTTP Server
    let serve = server::start_http_server(classifier, &config.host, config.port, cancel.clone());

    // 6. Graceful Shutdown
    tokio::select! {
        result = serve => result?,
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received.");
        }
    }

    cancel.cancel();
    let _ = watcher_handle.await;

    Ok(())
}
