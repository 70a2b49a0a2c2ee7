//! Wiring & DI. Entry point: bootstrap the shortener adapter, inject into the service, run UI.
//! No business logic here.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tinycc_shorten::adapters::shorteners::{MockShortener, TinyCcShortener};
use tinycc_shorten::adapters::ui::tui::TuiInputPort;
use tinycc_shorten::ports::{InputPort, ShortenerPort};
use tinycc_shorten::shared::config::AppConfig;
use tinycc_shorten::usecases::ShortenService;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    tinycc_shorten::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        AppConfig::default()
    });

    let shortener: Arc<dyn ShortenerPort> = if cfg.is_tinycc_configured() {
        let timeout_secs = cfg.timeout_secs_or_default();
        let max_redirects = cfg.max_redirects_or_default();
        info!(
            url = %cfg.api_url_or_default(),
            timeout_secs,
            max_redirects,
            "tiny.cc shortener enabled"
        );
        Arc::new(
            TinyCcShortener::with_options(
                cfg.api_url_or_default(),
                cfg.api_key().unwrap_or_default(),
                Duration::from_secs(timeout_secs),
                max_redirects,
            )
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        )
    } else {
        warn!("TINYCC_API_KEY not set, using mock shortener");
        Arc::new(MockShortener::new())
    };

    let service = Arc::new(ShortenService::new(shortener));
    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(service));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
