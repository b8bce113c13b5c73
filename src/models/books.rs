// src/models/books.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::dashboard::positive_or;

// Livros por página na listagem pública
pub const BOOKS_PAGE_SIZE: i64 = 12;
// Quantos livros aparecem no "top" por nota
pub const TOP_BOOKS_LIMIT: i64 = 3;

// Livro do catálogo
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub count_in_stock: i32,
    pub rating: Decimal,
    pub num_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Avaliação deixada por um usuário
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

// Livro com suas avaliações (GET /api/books/{id})
#[derive(Debug, Serialize, ToSchema)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub reviews: Vec<Review>,
}

// Uma página da listagem
#[derive(Debug, Serialize, ToSchema)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub page: i64,
    pub pages: i64,
}

impl BookPage {
    pub fn new(books: Vec<Book>, page: i64, total: i64) -> Self {
        // Divisão arredondada para cima
        let pages = (total + BOOKS_PAGE_SIZE - 1) / BOOKS_PAGE_SIZE;
        Self { books, page, pages }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BooksQuery {
    /// Busca por trecho do título ou do autor.
    pub keyword: Option<String>,
    /// Página, a partir de 1.
    pub page: Option<String>,
}

impl BooksQuery {
    pub fn keyword(&self) -> &str {
        self.keyword.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn page(&self) -> i64 {
        positive_or(self.page.as_deref(), 1)
    }
}

// ---
// Validação Customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O preço não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_update_price(payload: &UpdateBookPayload) -> Result<(), ValidationError> {
    match &payload.price {
        Some(price) => validate_not_negative(price),
        None => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    #[validate(length(min = 1, message = "O autor é obrigatório."))]
    pub author: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)]
    pub count_in_stock: i32,
}

// Só os campos enviados são alterados
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_price"))]
pub struct UpdateBookPayload {
    #[validate(length(min = 1, message = "O título não pode ser vazio."))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "O autor não pode ser vazio."))]
    pub author: Option<String>,

    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub count_in_stock: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewPayload {
    #[validate(range(min = 1, max = 5, message = "A nota deve ser de 1 a 5."))]
    pub rating: i16,

    #[validate(length(min = 1, message = "O comentário é obrigatório."))]
    pub comment: String,
}
