use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use gloss_format::{EntryFormatter, split_gloss};
use gloss_types::{DictionaryEntry, FormattedEntry};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Shared handler state. The formatter is built once at startup and handed
/// in here; handlers never construct or reconfigure one.
#[derive(Clone)]
pub struct AppState {
    pub formatter: Arc<EntryFormatter>,
    pub max_batch_size: usize,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct FormatQuery {
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub meaning: String,
}

#[derive(Deserialize)]
pub struct TagsQuery {
    #[serde(default)]
    pub pos: String,
}

#[derive(Deserialize)]
pub struct GlossQuery {
    #[serde(default)]
    pub meaning: String,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub entries: Vec<DictionaryEntry>,
}

#[derive(Serialize)]
pub struct BatchResponse {
    count: usize,
    items: Vec<FormattedEntry>,
}

#[derive(Serialize)]
pub struct FormattedText {
    formatted: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/format", get(format_entry).post(format_batch))
        .route("/v1/tags", get(format_tags))
        .route("/v1/meaning-by-tags", get(meaning_by_tags))
        .route("/v1/gloss-parts", get(gloss_parts))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn format_entry(
    State(state): State<AppState>,
    Query(params): Query<FormatQuery>,
) -> Response {
    let formatted = state.formatter.format_entry(&params.pos, &params.meaning);
    cacheable(&state, Json(formatted))
}

async fn format_tags(State(state): State<AppState>, Query(params): Query<TagsQuery>) -> Response {
    let formatted = state.formatter.format_tag_list(&params.pos);
    cacheable(&state, Json(FormattedText { formatted }))
}

async fn meaning_by_tags(
    State(state): State<AppState>,
    Query(params): Query<FormatQuery>,
) -> Response {
    let formatted = state
        .formatter
        .format_meaning_by_tags(&params.meaning, &params.pos);
    cacheable(&state, Json(FormattedText { formatted }))
}

async fn gloss_parts(State(state): State<AppState>, Query(params): Query<GlossQuery>) -> Response {
    cacheable(&state, Json(split_gloss(&params.meaning)))
}

async fn format_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if request.entries.is_empty() {
        return Err(ApiError::bad_request("entries must not be empty"));
    }
    if request.entries.len() > state.max_batch_size {
        return Err(ApiError::bad_request(format!(
            "entries must be at most {}",
            state.max_batch_size
        )));
    }

    debug!("formatting batch of {} entries", request.entries.len());
    let formatter = Arc::clone(&state.formatter);
    let items = tokio::task::spawn_blocking(move || formatter.format_batch(&request.entries))
        .await
        .map_err(|err| {
            error!("batch formatting task failed: {err}");
            ApiError::Internal
        })?;

    Ok(Json(BatchResponse {
        count: items.len(),
        items,
    }))
}

fn cacheable(state: &AppState, body: impl IntoResponse) -> Response {
    if state.disable_cache {
        return body.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        body,
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
