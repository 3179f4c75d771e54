//! Static frontend.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Page shells for the two views, with every other path resolved under `dir`.
pub(crate) fn routes(dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .route_service("/customerView", ServeFile::new(dir.join("customers.html")))
        .fallback_service(ServeDir::new(dir))
}
