use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::{GriddyConfig, ServerConfig};
use crate::{GriddyError, Result};

/// Full application: `/api` routes, static frontend fallback, shared layers
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let server = &state.config.server;
    let static_dir = ServeDir::new(&server.static_dir);
    let body_limit = server.body_limit_kb as usize * 1024;

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(static_dir)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| GriddyError::config(format!("Invalid bind address {}: {}", server.host, e)))
}

pub async fn run(config: GriddyConfig) -> Result<()> {
    let server = config.server.clone();
    let addr = bind_addr(&server)?;
    let state = AppState::from_config(config);
    tracing::info!("Proxying ML requests to {}", state.ml.base_url());
    let app = app(state);

    match (&server.tls_cert_path, &server.tls_key_path) {
        (Some(cert), Some(key)) => serve_tls(app, addr, cert, key).await,
        _ => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!("Web server running at http://{}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            Ok(())
        }
    }
}

#[cfg(feature = "tls")]
async fn serve_tls(app: Router, addr: SocketAddr, cert: &str, key: &str) -> Result<()> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::time::Duration;

    let tls = RustlsConfig::from_pem_file(cert, key).await?;

    let handle = axum_server::Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(Duration::from_secs(10)));
    });

    tracing::info!("Web server running at https://{}", addr);
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(_app: Router, _addr: SocketAddr, _cert: &str, _key: &str) -> Result<()> {
    Err(GriddyError::config(
        "TLS certificate configured but griddy was built without the `tls` feature",
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(bind_addr(&server).unwrap().port(), 8080);

        let server = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(bind_addr(&server).is_err());
    }
}
