use mimalloc::MiMalloc;
use rental_hub::config::Config;
use rental_hub::db::Stores;
use rental_hub::mailer::Mailer;
use rental_hub::server::{HubState, hub_router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let loglevel = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    // Validation logs its own warnings.
    let (cfg, _) = match Config::from_env() {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, "refusing to start");
            std::process::exit(1);
        }
    };

    info!(
        mode = cfg.app_env.as_str(),
        port = cfg.port,
        frontend_url = %cfg.frontend_url,
        smtp_host = %cfg.smtp_host.as_deref().unwrap_or("<none>"),
        "configuration loaded"
    );

    let stores = Arc::new(Stores::from_config(&cfg));
    stores.primary().await?;
    stores.media().await?;

    let mailer = Mailer::from_config(&cfg)?;

    let state = HubState::new(stores, mailer, cfg.app_env);
    let app = hub_router(state);

    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
