use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use bookshop_http::{
    extract::{Json, Path},
    AppError,
};

use super::models::AuthorDto;
use super::service::AuthorService;

type ApiResult<T> = Result<T, AppError>;

pub fn router(service: Arc<AuthorService>) -> Router {
    Router::new()
        .route("/", post(create_author).get(list_authors))
        .route(
            "/{id}",
            get(get_author)
                .put(replace_author)
                .patch(patch_author)
                .delete(delete_author),
        )
        .with_state(service)
}

/// 201 with the stored author, including its generated id
async fn create_author(
    State(service): State<Arc<AuthorService>>,
    Json(payload): Json<AuthorDto>,
) -> ApiResult<(StatusCode, Json<AuthorDto>)> {
    let created = service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn list_authors(State(service): State<Arc<AuthorService>>) -> ApiResult<Json<Vec<AuthorDto>>> {
    let authors = service.list().await?;
    Ok(Json(authors.into_iter().map(AuthorDto::from).collect()))
}

async fn get_author(
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AuthorDto>> {
    Ok(Json(service.get(id).await?.into()))
}

/// Full update of an existing author; 404 rather than create
async fn replace_author(
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<i64>,
    Json(payload): Json<AuthorDto>,
) -> ApiResult<Json<AuthorDto>> {
    Ok(Json(service.replace(id, payload.into()).await?.into()))
}

async fn patch_author(
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<i64>,
    Json(payload): Json<AuthorDto>,
) -> ApiResult<Json<AuthorDto>> {
    Ok(Json(service.patch(id, payload.into()).await?.into()))
}

/// Always 204, whether or not the author existed
async fn delete_author(
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
