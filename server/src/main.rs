mod config;
mod embedded;

use axum::{routing::get, Router};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

fn build_router() -> Router {
    Router::new()
        .route("/", get(embedded::serve_index))
        .route("/static/{*path}", get(embedded::serve_public))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}

fn listen_addr(config: &config::ServerConfig, port: u16) -> SocketAddr {
    let ip_addr = config.host.parse::<std::net::IpAddr>().unwrap_or_else(|e| {
        tracing::warn!("Failed to parse host '{}': {}. Using 0.0.0.0", config.host, e);
        [0, 0, 0, 0].into()
    });
    SocketAddr::from((ip_addr, port))
}

async fn http_server(config: config::ServerConfig) -> std::io::Result<()> {
    let addr = listen_addr(&config, config.http_port);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .serve(build_router().into_make_service())
        .await
}

async fn https_server(config: config::ServerConfig) -> std::io::Result<()> {
    let cert_path = config.ssl_cert_path.as_deref().unwrap_or("server.crt");
    let key_path = config.ssl_key_path.as_deref().unwrap_or("server.key");

    let rustls_config = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| {
            tracing::error!(
                "Failed to load SSL certificates (cert: '{}', key: '{}'): {}",
                cert_path,
                key_path,
                e
            );
            e
        })?;

    let addr = listen_addr(&config, config.https_port);

    // Browsers only expose camera and screen capture to secure origins, so
    // this is the listener to use from anything but localhost.
    tracing::info!("HTTPS server listening on {}", addr);
    axum_server::bind_rustls(addr, rustls_config)
        .serve(build_router().into_make_service())
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        return Err("Failed to install default rustls crypto provider".into());
    }

    let config = config::Config::load_or_default();

    tracing_subscriber::fmt()
        .with_max_level(config.logging.max_level())
        .init();

    tracing::info!("Starting Snapcam Server");
    tracing::info!("Configuration loaded:");
    tracing::info!("  HTTP enabled: {}, port: {}", config.server.enable_http, config.server.http_port);
    tracing::info!("  HTTPS enabled: {}, port: {}", config.server.enable_https, config.server.https_port);
    tracing::info!("  Host: {}", config.server.host);
    tracing::info!("  Log level: {}", config.logging.level);

    let mut tasks = Vec::new();

    if config.server.enable_http {
        tasks.push(tokio::spawn(http_server(config.server.clone())));
    }

    if config.server.enable_https {
        tasks.push(tokio::spawn(https_server(config.server.clone())));
    }

    if tasks.is_empty() {
        tracing::error!("Both HTTP and HTTPS are disabled; nothing to serve");
        return Err("no listener enabled".into());
    }

    for task in tasks {
        if let Err(e) = task.await? {
            tracing::error!("Server stopped: {}", e);
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn get_path(path: &str) -> axum::response::Response {
        build_router()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get_path("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_index_served_as_html() {
        let response = get_path("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap().clone();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        for id in ["preview", "record-btn-cont", "capture-btn-cont", "gallery-list", "filter-palette"] {
            assert!(page.contains(&format!("id=\"{}\"", id)), "missing #{}", id);
        }
    }

    #[tokio::test]
    async fn test_stylesheet_served() {
        let response = get_path("/static/style.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");
    }

    #[tokio::test]
    async fn test_unknown_asset_is_404() {
        let response = get_path("/static/missing.js").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
