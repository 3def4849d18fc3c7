//! HTTP surface for the catalog.
//!
//! | Method | Path              | Handler          |
//! |--------|-------------------|------------------|
//! | GET    | `/records`        | [`list_records`] |
//! | PUT    | `/records/:name`  | [`update_record`]|
//! | GET    | `/lookup?q=term`  | [`lookup_record`]|
//!
//! Anything else falls through to the static directory when one is configured.

use std::collections::BTreeMap;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use log::{error, warn};
use mob_data::{MobName, MobRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::mob_search::SearchError;
use crate::service::{CatalogError, CatalogService};
use crate::store::MobStore;

pub const UPDATE_MESSAGE: &str = "Mob updated successfully";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(store: Arc<dyn MobStore>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(store)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    pub record: MobRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    pub name: MobName,
    pub record: MobRecord,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    q: Option<String>,
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::NotFound(_) | CatalogError::Search(SearchError::NoMatchingName(_)) => StatusCode::NOT_FOUND,
            CatalogError::Patch(_) | CatalogError::Search(SearchError::EmptyTerm) => StatusCode::BAD_REQUEST,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        } else {
            warn!("request rejected ({status}): {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the router. `static_dir`, when given, serves every path the API doesn't claim.
pub fn router(state: AppState, static_dir: Option<&FsPath>) -> Router {
    let mut app: Router<AppState> = Router::new()
        .route("/records", get(list_records))
        .route("/records/:name", put(update_record))
        .route("/lookup", get(lookup_record));
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// All records, sorted by canonical name.
pub async fn list_records(State(state): State<AppState>) -> Result<Json<BTreeMap<MobName, MobRecord>>, CatalogError> {
    let catalog = Arc::clone(&state.catalog);
    let records = run_blocking(move || catalog.list_sorted()).await?;
    Ok(Json(records))
}

/// Apply a partial update to one record.
pub async fn update_record(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResponse>, CatalogError> {
    let body = match body {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            warn!("unreadable body for '{name}': {}", rejection.body_text());
            None
        },
    };
    let catalog = Arc::clone(&state.catalog);
    let record = run_blocking(move || catalog.update(&name, body.as_ref())).await?;
    Ok(Json(UpdateResponse {
        message: UPDATE_MESSAGE.to_string(),
        record,
    }))
}

/// Resolve `?q=` against names and synonyms.
pub async fn lookup_record(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, CatalogError> {
    let term = query.q.unwrap_or_default();
    let catalog = Arc::clone(&state.catalog);
    let (name, record) = run_blocking(move || catalog.lookup(&term)).await?;
    Ok(Json(LookupResponse { name, record }))
}

/// Run store-touching work on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, CatalogError>
where
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CatalogError::Store(anyhow::anyhow!("catalog task failed: {e}")))?
}
