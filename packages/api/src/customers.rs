//! Customer routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracker_core::{Customer, CustomerId, CustomerPatch, NewCustomer};

use crate::error::ApiError;
use crate::init::AppState;
use crate::jobs::DeleteResponse;

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    name: String,
}

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/search", get(search_customer))
        .route(
            "/customers/:id",
            get(get_customer)
                .post(update_customer)
                .delete(delete_customer),
        )
}

async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.customers.list().await?))
}

async fn search_customer(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Customer>, ApiError> {
    Ok(Json(state.customers.search(&query.name).await?))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    Ok(Json(state.customers.get(CustomerId::parse(&id)?).await?))
}

async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let Json(draft) = payload?;
    let customer = state.customers.add(draft).await?;
    tracing::info!("Created customer {} ({})", customer.id, customer.name);
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerPatch>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    let id = CustomerId::parse(&id)?;
    let Json(patch) = payload?;
    Ok(Json(state.customers.update(id, patch).await?))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.customers.delete(CustomerId::parse(&id)?).await?;
    if deleted {
        tracing::info!("Deleted customer {}", id);
    }
    Ok(Json(DeleteResponse { deleted }))
}
