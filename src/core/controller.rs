use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::catalog::controller::{add_book, find_book_by_id, find_books, remove_book};
use crate::checkout::controller::{checkout_book, find_loans, return_book};
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::patrons::controller::{add_patron, find_patron_by_id, find_patrons, remove_patron};
use crate::stats::controller::get_statistics;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Configuration,
    pub(crate) store: RepositoryStore,
}

impl AppState {
    pub fn new(config: Configuration, store: RepositoryStore) -> AppState {
        AppState {
            config,
            store,
        }
    }
}

pub(crate) type ServerError = (StatusCode, String);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Conflict { .. } => StatusCode::CONFLICT,
            CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommandError::Serialization { .. } | CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
            CommandError::Database { .. } | CommandError::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, err.message().to_string())
    }
}

pub(crate) fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/books", get(find_books).post(add_book))
        .route("/books/:id", get(find_book_by_id).delete(remove_book))
        .route("/users", get(find_patrons).post(add_patron))
        .route("/users/:id", get(find_patron_by_id).delete(remove_patron))
        .route("/loans", get(find_loans).post(checkout_book))
        .route("/loans/:id/return", post(return_book))
        .route("/statistics", get(get_statistics))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use crate::core::command::CommandError;
    use crate::core::controller::{AppState, build_router, ServerError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    fn build_app() -> Router {
        build_router(AppState::new(Configuration::new("test"), RepositoryStore::in_memory()))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let req = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => req.header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }.expect("should build request");
        let res = app.clone().oneshot(req).await.expect("should respond");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("should read body");
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
        (status, value)
    }

    #[tokio::test]
    async fn test_should_map_command_errors() {
        let not_found: ServerError = CommandError::NotFound { message: "gone".to_string() }.into();
        assert_eq!((StatusCode::NOT_FOUND, "gone".to_string()), not_found);
        let conflict: ServerError = CommandError::Conflict { message: "busy".to_string(), reason_code: None }.into();
        assert_eq!(StatusCode::CONFLICT, conflict.0);
        let invalid: ServerError = CommandError::Validation { message: "blank".to_string(), reason_code: None }.into();
        assert_eq!(StatusCode::BAD_REQUEST, invalid.0);
        let db: ServerError = CommandError::Database { message: "down".to_string(), reason_code: None, retryable: true }.into();
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, db.0);
    }

    #[tokio::test]
    async fn test_should_run_lending_scenario() {
        let app = build_app();

        let (status, body) = call(&app, "POST", "/api/books",
                                  Some(json!({"title": "Dune", "author": "Herbert", "category": "Fiction"}))).await;
        assert_eq!(StatusCode::OK, status);
        let book_id = body["book"]["id"].as_str().expect("book id").to_string();

        let (status, body) = call(&app, "POST", "/api/users",
                                  Some(json!({"name": "Ada", "email": "ada@example.com"}))).await;
        assert_eq!(StatusCode::OK, status);
        let ada_id = body["user"]["id"].as_str().expect("user id").to_string();
        let (_, body) = call(&app, "POST", "/api/users",
                             Some(json!({"name": "Grace", "email": "grace@example.com"}))).await;
        let grace_id = body["user"]["id"].as_str().expect("user id").to_string();

        let (status, body) = call(&app, "POST", "/api/loans",
                                  Some(json!({"bookId": book_id, "userId": ada_id}))).await;
        assert_eq!(StatusCode::OK, status);
        assert!(body["loan"]["returnDate"].is_null());
        assert_eq!("Active", body["loan"]["status"]);
        let loan_id = body["loan"]["id"].as_str().expect("loan id").to_string();

        let (status, _) = call(&app, "POST", "/api/loans",
                               Some(json!({"bookId": book_id, "userId": grace_id}))).await;
        assert_eq!(StatusCode::CONFLICT, status);

        let (status, _) = call(&app, "DELETE", format!("/api/books/{}", book_id).as_str(), None).await;
        assert_eq!(StatusCode::CONFLICT, status);

        let (_, body) = call(&app, "GET", format!("/api/users/{}", ada_id).as_str(), None).await;
        assert_eq!(json!(["Dune"]), body["user"]["borrowedBooks"]);

        let (status, body) = call(&app, "POST", format!("/api/loans/{}/return", loan_id).as_str(), None).await;
        assert_eq!(StatusCode::OK, status);
        assert!(body["loan"]["returnDate"].is_string());

        let (status, _) = call(&app, "POST", format!("/api/loans/{}/return", loan_id).as_str(), None).await;
        assert_eq!(StatusCode::CONFLICT, status);

        let (_, body) = call(&app, "GET", "/api/statistics", None).await;
        assert_eq!(1, body["statistics"]["totalLoans"]);
        assert_eq!(0, body["statistics"]["activeLoans"]);
        assert_eq!("Fiction", body["statistics"]["popularCategories"][0]["name"]);

        let (status, body) = call(&app, "DELETE", format!("/api/books/{}", book_id).as_str(), None).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(book_id.as_str(), body["removed"]);
        let (status, _) = call(&app, "GET", format!("/api/books/{}", book_id).as_str(), None).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
    }

    #[tokio::test]
    async fn test_should_reject_bad_requests() {
        let app = build_app();

        let (status, _) = call(&app, "POST", "/api/books",
                               Some(json!({"title": " ", "author": "Herbert", "category": "Fiction"}))).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        let (status, _) = call(&app, "POST", "/api/books", Some(json!({"title": "Dune"}))).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        let (status, _) = call(&app, "POST", "/api/users",
                               Some(json!({"name": "Ada", "email": "nope"}))).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        let (status, _) = call(&app, "POST", "/api/loans",
                               Some(json!({"bookId": "missing", "userId": "missing"}))).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        let (status, _) = call(&app, "POST", "/api/loans/missing/return", None).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
    }

    #[tokio::test]
    async fn test_should_filter_listings() {
        let app = build_app();

        for (title, category) in [("Dune", "Fiction"), ("SPQR", "History")] {
            let (status, _) = call(&app, "POST", "/api/books",
                                   Some(json!({"title": title, "author": "someone", "category": category}))).await;
            assert_eq!(StatusCode::OK, status);
        }
        let (_, body) = call(&app, "GET", "/api/books", None).await;
        assert_eq!(2, body["books"].as_array().expect("books").len());
        let (_, body) = call(&app, "GET", "/api/books?search=hist", None).await;
        assert_eq!("SPQR", body["books"][0]["title"]);
        assert_eq!(1, body["books"].as_array().expect("books").len());

        let (_, body) = call(&app, "GET", "/api/loans?active=true", None).await;
        assert!(body["loans"].as_array().expect("loans").is_empty());
        let (_, body) = call(&app, "GET", "/api/users?search=", None).await;
        assert!(body["users"].as_array().expect("users").is_empty());
    }
}
