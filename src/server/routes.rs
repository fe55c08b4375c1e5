//! HTTP handlers
//!
//! Every handler opens its own storage connection and drops it before
//! responding; mutation endpoints echo the submitted JSON payload back
//! rather than re-reading the stored row.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::namespace::{Namespace, NewNamespace};
use crate::server::AppState;
use crate::snippet::{NewSnippet, Snippet, SnippetUpdate};
use crate::storage::SnippetStore;
use crate::Error;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map crate errors onto the HTTP taxonomy: not-found is 404, client
/// misuse is 400, everything else collapses into a 500 carrying the
/// underlying error's message.
fn error_response(err: Error) -> ApiError {
    let status = match &err {
        Error::SnippetNotFound(_) | Error::NamespaceNotFound(_) => StatusCode::NOT_FOUND,
        Error::DefaultNamespaceProtected => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: err.to_string() }))
}

fn open_store(state: &AppState) -> Result<SnippetStore, ApiError> {
    SnippetStore::open(&state.database_path).map_err(error_response)
}

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn list_snippets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Snippet>>, ApiError> {
    let store = open_store(&state)?;
    let snippets = store.list_snippets().map_err(error_response)?;
    Ok(Json(snippets))
}

pub async fn get_snippet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Snippet>, ApiError> {
    let store = open_store(&state)?;
    match store.get_snippet(&id).map_err(error_response)? {
        Some(snippet) => Ok(Json(snippet)),
        None => Err(error_response(Error::SnippetNotFound(id))),
    }
}

pub async fn create_snippet(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let snippet: NewSnippet =
        serde_json::from_value(payload.clone()).map_err(|e| error_response(e.into()))?;

    let store = open_store(&state)?;
    store.insert_snippet(&snippet).map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn update_snippet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let update: SnippetUpdate =
        serde_json::from_value(payload.clone()).map_err(|e| error_response(e.into()))?;

    let store = open_store(&state)?;
    if store.update_snippet(&id, &update).map_err(error_response)? {
        Ok(Json(payload))
    } else {
        Err(error_response(Error::SnippetNotFound(id)))
    }
}

pub async fn delete_snippet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let store = open_store(&state)?;
    if store.delete_snippet(&id).map_err(error_response)? {
        Ok(Json(serde_json::json!({ "success": true })))
    } else {
        Err(error_response(Error::SnippetNotFound(id)))
    }
}

pub async fn list_namespaces(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Namespace>>, ApiError> {
    let store = open_store(&state)?;
    let namespaces = store.list_namespaces().map_err(error_response)?;
    Ok(Json(namespaces))
}

pub async fn create_namespace(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let namespace: NewNamespace =
        serde_json::from_value(payload.clone()).map_err(|e| error_response(e.into()))?;

    let store = open_store(&state)?;
    store.insert_namespace(&namespace).map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(payload)))
}

pub async fn delete_namespace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut store = open_store(&state)?;
    store.delete_namespace(&id).map_err(error_response)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn wipe(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let mut store = open_store(&state)?;
    store.wipe().map_err(error_response)?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Database wiped and recreated",
    })))
}
