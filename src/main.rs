use api_rest::{router, AppState};
use ruler_core::constants::{
    ENV_CONFIG_FILE, ENV_FHIR_VERSION, ENV_HELLO_WORLD_MESSAGE, ENV_REST_ADDR,
};
use ruler_core::{ConfigOverrides, RulerConfig};
use ruler_plugins::cr::UnavailableEvaluator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the ruler server
///
/// Loads configuration once at startup and serves the plugin operations over REST.
///
/// # Environment Variables
/// - `RULER_CONFIG_FILE`: optional YAML configuration file
/// - `HAPI_FHIR_FHIR_VERSION`: FHIR release to build resources for (default: "r4")
/// - `HELLO_WORLD_MESSAGE`: `$hello-world` greeting (default: "Bye")
/// - `RULER_REST_ADDR`: REST server address (default: "0.0.0.0:8080")
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = std::env::var(ENV_CONFIG_FILE).ok().map(PathBuf::from);
    let overrides = ConfigOverrides {
        fhir_version: std::env::var(ENV_FHIR_VERSION).ok(),
        hello_world_message: std::env::var(ENV_HELLO_WORLD_MESSAGE).ok(),
        rest_addr: std::env::var(ENV_REST_ADDR).ok(),
    };
    let cfg = Arc::new(RulerConfig::load(config_file.as_deref(), overrides)?);

    tracing::info!(
        "++ Starting ruler REST on {} (FHIR {})",
        cfg.rest_addr(),
        cfg.fhir_version()
    );

    let app = router(AppState::new(cfg.clone(), Arc::new(UnavailableEvaluator)));

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `RUST_LOG` plus INFO for the ruler crates, the REST handlers and request tracing.
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("ruler=info".parse()?)
        .add_directive("api_rest=info".parse()?)
        .add_directive("tower_http=info".parse()?))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("-- Shutting down ruler REST");
}
