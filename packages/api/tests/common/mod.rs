#![allow(dead_code)]

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use api::{AppState, RouterOptions, init_tracker, router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use storage::{Storage, StorageConfig};
use tower::ServiceExt;

pub async fn memory_storage() -> Result<Storage, Box<dyn Error>> {
    Ok(Storage::new(StorageConfig::memory()).await?)
}

/// A router over fresh in-memory stores, serving assets from `assets_dir`.
pub async fn app(assets_dir: &Path) -> Result<(Router, AppState), Box<dyn Error>> {
    let state = init_tracker(memory_storage().await?, None).await?;
    let options = RouterOptions {
        assets_dir: assets_dir.to_path_buf(),
        request_timeout: Duration::from_secs(3),
    };
    Ok((router(state.clone(), &options), state))
}

/// Send one request and decode the JSON response body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> Result<(StatusCode, Value), Box<dyn Error>> {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))?,
        None => request.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

/// Send a GET and return the raw body text.
pub async fn get_text(app: &Router, uri: &str) -> Result<(StatusCode, String), Box<dyn Error>> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(bytes.to_vec())?))
}
