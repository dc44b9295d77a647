pub mod api;
pub mod classifier;
pub mod config;
pub mod core_state;
pub mod models;
pub mod report;
pub mod risk;

use tracing_subscriber::EnvFilter;

/// Initialise logging, read configuration from the environment and serve
/// until Ctrl-C.
pub async fn run() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = config::AppConfig::from_env();
    tracing::info!(
        bind = %config.bind_addr,
        model = %config.model_path.display(),
        download = config.model_url.is_some(),
        "Configuration loaded"
    );

    api::serve(config).await
}
