use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::{book, person};

/// Build the application router around an injected store handle.
pub fn app(store: Store) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(person_routes())
        .merge(book_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

fn person_routes() -> Router<Store> {
    use axum::routing::{delete, post};

    Router::new()
        .route("/people", get(person::list))
        .route("/person/:id", get(person::get))
        .route("/create/person", post(person::create))
        .route("/delete/person/:id", delete(person::delete))
}

fn book_routes() -> Router<Store> {
    use axum::routing::{delete, post};

    Router::new()
        .route("/books", get(book::list))
        .route("/book/:id", get(book::get))
        .route("/create/book", post(book::create))
        .route("/delete/book/:id", delete(book::delete))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Shelf API",
        "version": version,
        "description": "Small lending-shelf registry over people and their books",
        "endpoints": {
            "people": "GET /people, GET /person/:id",
            "books": "GET /books, GET /book/:id",
            "create": "POST /create/person, POST /create/book",
            "delete": "DELETE /delete/person/:id, DELETE /delete/book/:id",
            "health": "GET /health",
        }
    }))
}

async fn health(State(store): State<Store>) -> Result<Json<Value>, ApiError> {
    let now = chrono::Utc::now();

    store.ping().await.map_err(|err| {
        tracing::error!("health check failed: {}", err);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(Json(json!({
        "status": "ok",
        "database": "ok",
        "timestamp": now,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    /// Router over a lazy pool: nothing here touches the database, so the
    /// connection is never actually opened.
    fn test_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/shelf")
            .expect("lazy pool");
        app(Store::new(pool))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn root_describes_the_service() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Shelf API");
        assert!(body["endpoints"].is_object());
    }

    #[tokio::test]
    async fn unknown_routes_fall_through_to_404() {
        let response = test_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_ids_are_rejected_before_storage() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/person/forty-two")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn malformed_json_bodies_are_rejected() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/create/person")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn create_routes_only_accept_post() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/create/book")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
