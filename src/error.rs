//! Resource-service errors and their HTTP mapping.

use std::fmt::Display;

use bookshop_db::StoreError;
use bookshop_http::AppError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{resource} '{key}' not found")]
    NotFound { resource: &'static str, key: String },

    #[error("invalid author reference: {reason}")]
    InvalidAuthorReference { reason: String },

    #[error("embedded author does not match stored author {id}")]
    AuthorMismatch { id: i64, fields: Vec<&'static str> },

    #[error("invalid page request: {0}")]
    InvalidPageRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(resource: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            resource,
            key: key.to_string(),
        }
    }

    pub fn invalid_author(reason: impl Into<String>) -> Self {
        Self::InvalidAuthorReference {
            reason: reason.into(),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::NotFound { .. } => AppError::not_found(message),
            CatalogError::InvalidAuthorReference { reason } => AppError::validation(
                vec![json!({"field": "author.id", "error": reason})],
                message,
            ),
            CatalogError::AuthorMismatch { id, fields } => AppError::conflict(
                fields
                    .into_iter()
                    .map(|field| json!({"field": format!("author.{field}"), "author_id": id}))
                    .collect(),
                message,
            ),
            CatalogError::InvalidPageRequest(_) => AppError::bad_request(message),
            CatalogError::Store(StoreError::UnsortableProperty { .. }) => {
                AppError::bad_request(message)
            }
            CatalogError::Store(store) => AppError::Internal(anyhow::Error::new(store)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn not_found_maps_to_404() {
        let err: AppError = CatalogError::not_found("author", 7).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("author '7' not found"));
    }

    #[test]
    fn reference_errors_map_to_client_errors() {
        let invalid: AppError = CatalogError::invalid_author("author.id is required").into();
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let mismatch: AppError = CatalogError::AuthorMismatch {
            id: 1,
            fields: vec!["name"],
        }
        .into();
        assert_eq!(mismatch.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn store_failures_are_server_errors() {
        let unavailable: AppError =
            CatalogError::from(StoreError::Backend("connection refused".into())).into();
        assert_eq!(unavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let unsortable: AppError = CatalogError::from(StoreError::UnsortableProperty {
            entity: "book",
            property: "price".into(),
        })
        .into();
        assert_eq!(unsortable.status(), StatusCode::BAD_REQUEST);
    }
}
