//! HTML Form Routes
//!
//! Browser-facing pages that post urlencoded forms and call the same store
//! operations as the JSON API.

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::errors::ApiError;
use super::html::{self, SearchMode};
use super::state::AppState;
use crate::record::{Fields, ADDRESS_FIELD, NAME_FIELD};
use crate::store::NameFilter;

#[derive(Debug, Deserialize)]
pub struct PersonForm {
    pub nama: String,
    pub alamat: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub id: u64,
    pub nama: String,
    pub alamat: String,
}

#[derive(Debug, Deserialize)]
pub struct NameForm {
    pub nama: String,
}

impl PersonForm {
    fn into_fields(self) -> Fields {
        let mut fields = Map::new();
        fields.insert(NAME_FIELD.to_string(), Value::String(self.nama));
        fields.insert(ADDRESS_FIELD.to_string(), Value::String(self.alamat));
        fields
    }
}

pub fn form_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/input", get(input_form_handler).post(input_submit_handler))
        .route("/display_all", get(display_all_handler))
        .route(
            "/search_update",
            get(search_update_form_handler).post(search_update_handler),
        )
        .route("/update", post(update_handler))
        .route("/delete", get(delete_form_handler).post(delete_search_handler))
        .route("/delete_by_name", post(delete_by_name_handler))
        .with_state(state)
}

/// Renders a failure as an HTML page with the matching status
fn error_response(err: ApiError) -> Response {
    if !matches!(err, ApiError::NotFound(_)) {
        warn!(error = %err, "form request failed");
    }
    (err.status_code(), Html(html::error_page(&err.to_string()))).into_response()
}

async fn index_handler() -> Html<String> {
    Html(html::index_page())
}

async fn input_form_handler() -> Html<String> {
    Html(html::create_form_page())
}

async fn input_submit_handler(
    State(state): State<AppState>,
    Form(form): Form<PersonForm>,
) -> Response {
    let fields = form.into_fields();
    match state.run(move |store| store.create(fields)).await {
        Ok(record) => (StatusCode::CREATED, Html(html::confirmation_page(&record))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn display_all_handler(State(state): State<AppState>) -> Response {
    match state.run(|store| store.list_all()).await {
        Ok(records) => Html(html::display_all_page(&records)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn search_update_form_handler() -> Html<String> {
    Html(html::search_page(SearchMode::Edit, None, &[]))
}

async fn search(state: &AppState, mode: SearchMode, query: String) -> Response {
    let filter = NameFilter::containing(&query);
    match state.run(move |store| store.search(|r| filter.matches(r))).await {
        Ok(hits) => Html(html::search_page(mode, Some(query.as_str()), &hits)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn search_update_handler(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> Response {
    search(&state, SearchMode::Edit, form.nama).await
}

async fn update_handler(State(state): State<AppState>, Form(form): Form<UpdateForm>) -> Response {
    let id = form.id;
    let fields = PersonForm {
        nama: form.nama,
        alamat: form.alamat,
    }
    .into_fields();

    match state.run(move |store| store.update(id, fields)).await {
        Ok(_) => Redirect::to("/display_all").into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_form_handler() -> Html<String> {
    Html(html::search_page(SearchMode::Delete, None, &[]))
}

async fn delete_search_handler(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> Response {
    search(&state, SearchMode::Delete, form.nama).await
}

async fn delete_by_name_handler(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> Response {
    let filter = NameFilter::exact(&form.nama);
    match state
        .run(move |store| store.delete_where(|r| filter.matches(r)))
        .await
    {
        Ok(_) => Redirect::to("/delete").into_response(),
        Err(err) => error_response(err),
    }
}
