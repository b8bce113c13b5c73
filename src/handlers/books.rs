// src/handlers/books.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::books::{
        Book, BookDetail, BookPage, BooksQuery, CreateBookPayload, CreateReviewPayload, Review,
        UpdateBookPayload,
    },
};

// GET /api/books
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "Books",
    params(BooksQuery),
    responses(
        (status = 200, description = "Página do catálogo", body = BookPage)
    )
)]
pub async fn list_books(
    State(app_state): State<AppState>,
    Query(query): Query<BooksQuery>,
) -> Result<Json<BookPage>, AppError> {
    let page = app_state.book_service.list_books(&query).await?;
    Ok(Json(page))
}

// GET /api/books/top
#[utoipa::path(
    get,
    path = "/api/books/top",
    tag = "Books",
    responses(
        (status = 200, description = "Livros mais bem avaliados", body = Vec<Book>)
    )
)]
pub async fn top_books(State(app_state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = app_state.book_service.top_books().await?;
    Ok(Json(books))
}

// GET /api/books/{id}
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "Books",
    params(("id" = Uuid, Path, description = "ID do livro")),
    responses(
        (status = 200, description = "Livro com avaliações", body = BookDetail),
        (status = 404, description = "Livro não encontrado")
    )
)]
pub async fn get_book(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookDetail>, AppError> {
    let book = app_state.book_service.get_book(id).await?;
    Ok(Json(book))
}

// POST /api/books
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "Books",
    request_body = CreateBookPayload,
    responses(
        (status = 201, description = "Livro cadastrado", body = Book),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_book(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateBookPayload>,
) -> Result<impl IntoResponse, AppError> {
    let book = app_state.book_service.create_book(payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

// PUT /api/books/{id}
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "Books",
    params(("id" = Uuid, Path, description = "ID do livro")),
    request_body = UpdateBookPayload,
    responses(
        (status = 200, description = "Livro atualizado", body = Book),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Restrito a administradores"),
        (status = 404, description = "Livro não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_book(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookPayload>,
) -> Result<Json<Book>, AppError> {
    let book = app_state.book_service.update_book(id, payload).await?;
    Ok(Json(book))
}

// DELETE /api/books/{id}
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "Books",
    params(("id" = Uuid, Path, description = "ID do livro")),
    responses(
        (status = 204, description = "Livro removido"),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Restrito a administradores"),
        (status = 404, description = "Livro não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_book(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.book_service.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/books/{id}/reviews
#[utoipa::path(
    post,
    path = "/api/books/{id}/reviews",
    tag = "Books",
    params(("id" = Uuid, Path, description = "ID do livro")),
    request_body = CreateReviewPayload,
    responses(
        (status = 201, description = "Avaliação registrada", body = Review),
        (status = 400, description = "Dados inválidos ou livro já avaliado"),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Livro não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_review(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateReviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    let review = app_state.book_service.add_review(id, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
