use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};
use bookshop_db::Page;
use bookshop_http::{
    extract::{Json, Path, Query},
    AppError,
};
use bookshop_kernel::settings::PaginationSettings;

use super::models::BookDto;
use super::service::BookService;
use crate::utils::PageQuery;

type ApiResult<T> = Result<T, AppError>;

#[derive(Clone)]
struct BooksState {
    service: Arc<BookService>,
    pagination: PaginationSettings,
}

pub fn router(service: Arc<BookService>, pagination: PaginationSettings) -> Router {
    Router::new()
        .route("/", get(list_books))
        .route(
            "/{isbn}",
            get(get_book)
                .put(upsert_book)
                .patch(patch_book)
                .delete(delete_book),
        )
        .with_state(BooksState {
            service,
            pagination,
        })
}

/// 201 when the ISBN was new, 200 when an existing book was replaced
async fn upsert_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
    Json(payload): Json<BookDto>,
) -> ApiResult<(StatusCode, Json<BookDto>)> {
    let (record, created) = state.service.upsert(&isbn, payload.into()).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(record.into())))
}

async fn list_books(
    State(state): State<BooksState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Page<BookDto>>> {
    let request = query.into_page_request(&state.pagination)?;
    let page = state.service.list_paged(&request).await?;
    Ok(Json(page.map(BookDto::from)))
}

async fn get_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
) -> ApiResult<Json<BookDto>> {
    Ok(Json(state.service.get(&isbn).await?.into()))
}

async fn patch_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
    Json(payload): Json<BookDto>,
) -> ApiResult<Json<BookDto>> {
    Ok(Json(state.service.patch(&isbn, payload.into()).await?.into()))
}

/// Always 204, whether or not the book existed
async fn delete_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
) -> ApiResult<StatusCode> {
    state.service.delete(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}
