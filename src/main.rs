use anyhow::Context;
use tracing_subscriber::EnvFilter;

use carenet_api::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL, SUPABASE_KEY, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();

    let filter = EnvFilter::try_new(&config.api.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting CareNet API in {:?} mode", config.environment);

    let bind_addr = config.bind_addr();
    let state = AppState::from_config(config).context("invalid Supabase configuration")?;

    match &state.supabase {
        Some(client) => tracing::info!(
            url = %client.base_url(),
            service_role = client.service_role_enabled(),
            "Supabase client configured"
        ),
        None => tracing::warn!("SUPABASE_URL or SUPABASE_KEY not set; auth routes will return 500"),
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("CareNet API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
