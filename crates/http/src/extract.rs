//! Request extractors whose rejections render as [`AppError`] envelopes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// JSON request body. Well-formed JSON of the wrong shape is a validation error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Typed path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Typed query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => AppError::validation(
                vec![serde_json::json!({"field": "body", "error": err.body_text()})],
                "request body does not match the expected shape",
            ),
            other => AppError::bad_request(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Shelf {
        #[allow(dead_code)]
        name: String,
    }

    #[derive(Deserialize)]
    struct Paging {
        #[allow(dead_code)]
        page: Option<usize>,
    }

    fn router() -> Router {
        Router::new()
            .route("/shelves", post(|Json(_): Json<Shelf>| async { "created" }))
            .route("/shelves/{id}", get(|Path(id): Path<i64>| async move { id.to_string() }))
            .route("/search", get(|Query(_): Query<Paging>| async { "found" }))
    }

    async fn error_code(request: Request<Body>) -> (StatusCode, String) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body["error"]["code"].as_str().unwrap().to_string())
    }

    fn json_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/shelves")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (status, code) = error_code(json_post("{\"name\":")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "bad_request");
    }

    #[tokio::test]
    async fn wrong_json_shape_is_a_validation_error() {
        let (status, code) = error_code(json_post("{\"name\": 5}")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "validation_error");
    }

    #[tokio::test]
    async fn unparsable_path_and_query_are_bad_requests() {
        let path = Request::builder()
            .uri("/shelves/abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            error_code(path).await,
            (StatusCode::BAD_REQUEST, "bad_request".to_string())
        );

        let query = Request::builder()
            .uri("/search?page=-1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            error_code(query).await,
            (StatusCode::BAD_REQUEST, "bad_request".to_string())
        );
    }
}
