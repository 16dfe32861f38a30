use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::agent::TravelAgent;
use crate::api;
use crate::config::ServerConfig;

/// Full application: routes plus CORS, body limit and request tracing
pub fn app(agent: Arc<TravelAgent>, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Oversized bodies surface as a JSON rejection so they get a `detail` body too
    api::router(agent).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(DefaultBodyLimit::max(config.max_body_bytes)),
    )
}

pub async fn run(agent: Arc<TravelAgent>, config: &ServerConfig) -> Result<()> {
    let app = app(agent, config);
    let addr = format!("{}:{}", config.host, config.port);

    #[cfg(feature = "tls")]
    {
        if let Some((cert, key)) = config.tls_paths() {
            return tls::serve(app, &addr, cert, key).await;
        }
    }
    #[cfg(not(feature = "tls"))]
    {
        if config.tls_enabled() {
            tracing::warn!("TLS paths are configured but this build has no `tls` feature, serving plain HTTP");
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;
    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(feature = "tls")]
mod tls {
    use std::net::SocketAddr;
    use std::path::Path;
    use std::time::Duration;

    use anyhow::{Context, Result, anyhow};
    use axum::Router;
    use axum_server::Handle;
    use axum_server::tls_rustls::RustlsConfig;

    pub(super) async fn serve(app: Router, addr: &str, cert: &Path, key: &Path) -> Result<()> {
        // Both ring and aws-lc-rs end up in the tree, so pick one explicitly
        let _ = rustls::crypto::ring::default_provider().install_default();

        let tls_config = RustlsConfig::from_pem_file(cert, key)
            .await
            .with_context(|| format!("Failed to load TLS material from {} / {}", cert.display(), key.display()))?;
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| anyhow!("Invalid listen address {addr}: {e}"))?;

        let handle = Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            super::shutdown_signal().await;
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        tracing::info!("Web server running at https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("TLS web server failed")?;
        tracing::info!("Web server stopped");
        Ok(())
    }
}
