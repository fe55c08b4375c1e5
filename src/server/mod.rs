//! HTTP server - axum router and CORS wiring

use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{CorsOrigins, Settings};
use crate::storage::SnippetStore;

pub mod routes;

/// Server state. Handlers open a fresh connection against this path per
/// request; nothing else is shared.
pub struct AppState {
    pub database_path: PathBuf,
}

/// Build the application router
pub fn build_router(state: Arc<AppState>, cors: &CorsOrigins) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/snippets",
            get(routes::list_snippets).post(routes::create_snippet),
        )
        .route(
            "/api/snippets/{id}",
            get(routes::get_snippet)
                .put(routes::update_snippet)
                .delete(routes::delete_snippet),
        )
        .route(
            "/api/namespaces",
            get(routes::list_namespaces).post(routes::create_namespace),
        )
        .route("/api/namespaces/{id}", delete(routes::delete_namespace))
        .route("/api/wipe", post(routes::wipe))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Translate the configured origin list into a CORS layer.
///
/// `*` grants any origin without credentials; an explicit list grants
/// exactly those origins with credentials.
fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::CONTENT_TYPE, header::AUTHORIZATION];

    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers),
        CorsOrigins::List(list) => {
            let parsed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(methods)
                .allow_headers(headers)
                .allow_credentials(true)
        }
    }
}

pub async fn start_server(settings: Settings) -> anyhow::Result<()> {
    // Initialize (and migrate) the schema before accepting requests;
    // a storage failure here aborts startup.
    SnippetStore::open(&settings.database)?;

    let state = Arc::new(AppState {
        database_path: settings.database.clone(),
    });
    let app = build_router(state, &settings.cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router(dir: &tempfile::TempDir) -> Router {
        let state = Arc::new(AppState {
            database_path: dir.path().join("snippets.db"),
        });
        build_router(state, &CorsOrigins::Any)
    }

    async fn send(
        router: &Router,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(value) => Request::builder()
                .method(method)
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let (status, body) = send(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_snippet_crud_over_http() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let payload = json!({
            "id": "s1",
            "title": "greeting",
            "code": "print('hi')",
            "language": "python",
            "createdAt": 1000,
            "updatedAt": 2000,
        });
        let (status, body) = send(&router, "POST", "/api/snippets", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        // Echo of the submitted payload, not a re-read
        assert_eq!(body, payload);

        let (status, body) = send(&router, "GET", "/api/snippets/s1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "greeting");
        assert_eq!(body["category"], "general");
        assert_eq!(body["hasPreview"], false);

        let update = json!({
            "title": "greeting v2",
            "code": "print('hello')",
            "language": "python",
            "updatedAt": 3000,
        });
        let (status, body) = send(&router, "PUT", "/api/snippets/s1", Some(update.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, update);

        let (status, body) = send(&router, "GET", "/api/snippets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "greeting v2");
        assert_eq!(body[0]["updatedAt"], 3000);

        let (status, body) = send(&router, "DELETE", "/api/snippets/s1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, _) = send(&router, "GET", "/api/snippets/s1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_missing_required_field_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let payload = json!({"title": "no id", "code": "c", "language": "py"});
        let (status, body) = send(&router, "POST", "/api/snippets", Some(payload)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("id"));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_snippet_are_404() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let update = json!({"title": "t", "code": "c", "language": "py"});
        let (status, _) = send(&router, "PUT", "/api/snippets/ghost", Some(update)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, "DELETE", "/api/snippets/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_input_parameters_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let params = json!({"props": {"label": "Run"}, "sizes": [1, 2, 3]});
        let payload = json!({
            "id": "s1",
            "title": "widget",
            "code": "<Widget />",
            "language": "jsx",
            "hasPreview": true,
            "functionName": "Widget",
            "inputParameters": params,
        });
        let (status, _) = send(&router, "POST", "/api/snippets", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&router, "GET", "/api/snippets/s1", None).await;
        assert_eq!(body["inputParameters"], params);
        assert_eq!(body["hasPreview"], true);
    }

    #[tokio::test]
    async fn test_namespace_delete_reassigns_snippets() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let (status, _) = send(
            &router,
            "POST",
            "/api/namespaces",
            Some(json!({"id": "ns1", "name": "Work"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &router,
            "POST",
            "/api/snippets",
            Some(json!({
                "id": "s1",
                "namespaceId": "ns1",
                "title": "t",
                "code": "c",
                "language": "py",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&router, "DELETE", "/api/namespaces/ns1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, body) = send(&router, "GET", "/api/snippets/s1", None).await;
        assert_eq!(body["namespaceId"], "default");

        let (_, body) = send(&router, "GET", "/api/namespaces", None).await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|ns| ns["id"].as_str().unwrap())
            .collect();
        assert!(!ids.contains(&"ns1"));
    }

    #[tokio::test]
    async fn test_delete_default_namespace_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let (status, body) = send(&router, "DELETE", "/api/namespaces/default", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("default"));
    }

    #[tokio::test]
    async fn test_delete_missing_namespace_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let (status, _) = send(&router, "DELETE", "/api/namespaces/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_namespaces_listed_default_first() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        send(&router, "POST", "/api/namespaces", Some(json!({"id": "b", "name": "Beta"}))).await;
        send(&router, "POST", "/api/namespaces", Some(json!({"id": "a", "name": "Alpha"}))).await;

        let (status, body) = send(&router, "GET", "/api/namespaces", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|ns| ns["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Default", "Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn test_wipe_resets_everything() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        send(&router, "POST", "/api/namespaces", Some(json!({"id": "ns1", "name": "Work"}))).await;
        send(
            &router,
            "POST",
            "/api/snippets",
            Some(json!({"id": "s1", "title": "t", "code": "c", "language": "py"})),
        )
        .await;

        let (status, body) = send(&router, "POST", "/api/wipe", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, body) = send(&router, "GET", "/api/snippets", None).await;
        assert_eq!(body.as_array().unwrap().len(), 0);

        let (_, body) = send(&router, "GET", "/api/namespaces", None).await;
        let namespaces = body.as_array().unwrap();
        assert_eq!(namespaces.len(), 1);
        assert_eq!(namespaces[0]["isDefault"], true);
    }
}
