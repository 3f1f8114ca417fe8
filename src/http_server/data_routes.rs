//! Record JSON Routes
//!
//! `/api/data` CRUD, search and bulk delete by name.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::record::{Fields, Record};
use crate::store::NameFilter;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub nama: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

// ==================
// Routes
// ==================

pub fn data_routes(state: AppState) -> Router {
    Router::new()
        .route("/data", get(list_handler).post(create_handler))
        .route("/data/search", get(search_handler))
        .route("/data/by-name/:nama", delete(delete_by_name_handler))
        .route(
            "/data/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

fn into_fields(body: Value) -> ApiResult<Fields> {
    match body {
        Value::Object(fields) => Ok(fields),
        other => Err(ApiError::InvalidBody(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ==================
// Handlers
// ==================

async fn list_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Record>>> {
    let records = state.run(|store| store.list_all()).await?;
    Ok(Json(records))
}

async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Record>> {
    let record = state.run(move |store| store.get_by_id(id)).await?;
    Ok(Json(record))
}

async fn create_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let fields = into_fields(body)?;
    let record = state.run(move |store| store.create(fields)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<MessageResponse>> {
    let fields = into_fields(body)?;
    state.run(move |store| store.update(id, fields)).await?;
    Ok(Json(MessageResponse {
        message: format!("record {} updated", id),
    }))
}

async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<MessageResponse>> {
    state.run(move |store| store.delete(id)).await?;
    Ok(Json(MessageResponse {
        message: format!("record {} deleted", id),
    }))
}

async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let filter = NameFilter::containing(&query.nama);
    let hits = state.run(move |store| store.search(|r| filter.matches(r))).await?;
    Ok(Json(hits))
}

async fn delete_by_name_handler(
    State(state): State<AppState>,
    Path(nama): Path<String>,
) -> ApiResult<Json<RemovedResponse>> {
    let filter = NameFilter::exact(&nama);
    let removed = state
        .run(move |store| store.delete_where(|r| filter.matches(r)))
        .await?;
    Ok(Json(RemovedResponse { removed }))
}
