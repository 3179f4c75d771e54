//! HTTP API for the order tracker.
//!
//! This crate contains:
//! - JSON routes for jobs and customers
//! - The mapping from domain errors to HTTP responses
//! - Static frontend serving
//! - Startup wiring that spawns the stores and imports legacy data

mod assets;
mod customers;
mod error;
mod init;
mod jobs;

use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorBody};
pub use init::{AppState, InitError, import_legacy_jobs, init_tracker};
pub use jobs::{DeleteResponse, JobsQuery};

// Re-export core types for convenience
pub use tracker_core::{Customer, CustomerId, Job, JobId, JobRow, JobStatus, Urgency};

/// Options for the router that do not live in the stores.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Directory holding `index.html`, `customers.html` and compiled assets.
    pub assets_dir: PathBuf,
    /// Upper bound on the time spent handling one request.
    pub request_timeout: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("./frontend"),
            request_timeout: Duration::from_secs(3),
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState, options: &RouterOptions) -> Router {
    Router::new()
        .merge(jobs::routes())
        .merge(customers::routes())
        .with_state(state)
        .merge(assets::routes(&options.assets_dir))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
