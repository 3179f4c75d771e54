//! Job routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracker_core::{CustomerFilter, JobId, JobPatch, JobRow, JobStatus, NewJob};

use crate::error::ApiError;
use crate::init::AppState;

/// Query string accepted by `GET /jobs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsQuery {
    /// A customer ID, `unknown` for unassigned jobs, or empty for all.
    #[serde(rename = "customerID", default)]
    pub customer_id: Option<String>,
}

/// Response to a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether the record existed before the request.
    pub deleted: bool,
}

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/statuses", get(list_statuses))
        .route(
            "/jobs/:id",
            get(get_job).post(update_job).delete(delete_job),
        )
}

/// Urgency is graded against the server's local calendar day.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<Vec<JobRow>>, ApiError> {
    let filter = CustomerFilter::parse(query.customer_id.as_deref())?;
    let today = today();

    let rows = state
        .jobs
        .list_for_customer(filter)
        .await?
        .into_iter()
        .map(|job| JobRow::new(job, today))
        .collect();
    Ok(Json(rows))
}

async fn list_statuses() -> Json<Vec<&'static str>> {
    Json(JobStatus::ALL.iter().map(|s| s.label()).collect())
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRow>, ApiError> {
    let job = state.jobs.get(JobId::parse(&id)?).await?;
    Ok(Json(JobRow::new(job, today())))
}

async fn create_job(
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<JobRow>), ApiError> {
    let Json(draft) = payload?;
    let job = state.jobs.add(draft).await?;
    tracing::info!("Created job {}", job.id);
    Ok((StatusCode::CREATED, Json(JobRow::new(job, today()))))
}

async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<JobPatch>, JsonRejection>,
) -> Result<Json<JobRow>, ApiError> {
    let id = JobId::parse(&id)?;
    let Json(patch) = payload?;
    let job = state.jobs.update(id, patch).await?;
    Ok(Json(JobRow::new(job, today())))
}

async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.jobs.delete(JobId::parse(&id)?).await?;
    if deleted {
        tracing::info!("Deleted job {}", id);
    }
    Ok(Json(DeleteResponse { deleted }))
}
