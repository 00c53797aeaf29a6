//! Embedded static files
//!
//! The page, its stylesheet and the wasm-pack output are compiled into the
//! binary, so the server ships as a single executable.

use axum::{
    body::Body,
    extract::Path,
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use rust_embed::Embed;

/// Embedded files from the `server/static` directory
#[derive(Embed)]
#[folder = "static"]
pub struct StaticAssets;

/// Serve an asset from the public directory
pub async fn serve_public(Path(path): Path<String>) -> impl IntoResponse {
    serve_embedded_file(&format!("public/{}", path))
}

/// Serve the capture page
pub async fn serve_index() -> impl IntoResponse {
    serve_embedded_file("public/index.html")
}

fn serve_embedded_file(path: &str) -> Response<Body> {
    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            tracing::debug!("Serving embedded {} as {}", path, mime);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => {
            tracing::debug!("Embedded file not found: {}", path);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
