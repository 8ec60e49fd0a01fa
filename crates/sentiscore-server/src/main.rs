mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sentiscore_sentiment::{EmbeddingFetcher, HttpEmbeddingProvider, ReferenceCache};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = sentiscore_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Provider SDK env defaults are injected once here, not in the fetch path.
    sentiscore_core::ensure_provider_env_defaults();

    let provider = HttpEmbeddingProvider::new(
        &config.provider_url,
        config.provider_api_key.as_deref(),
        config.provider_timeout_secs,
    )?;
    let state = AppState {
        fetcher: Arc::new(EmbeddingFetcher::new(Arc::new(provider))),
        cache: Arc::new(ReferenceCache::new()),
    };

    tracing::info!(env = %config.env, addr = %config.bind_addr, "starting sentiscore server");
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
