// src/db/book_repo.rs

use sqlx::PgPool;
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::books::{Book, CreateBookPayload, Review, UpdateBookPayload},
};

// Colunas da tabela books, na ordem da struct Book
pub(crate) const BOOK_COLUMNS: &str = "id, title, author, description, category, price, \
    count_in_stock, rating, num_reviews, created_at, updated_at";

#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list(&self, keyword: &str, limit: i64, offset: i64) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE title ILIKE '%' || $1 || '%' OR author ILIKE '%' || $1 || '%'
            ORDER BY title ASC
            LIMIT $2 OFFSET $3
            "#
        ))
            .bind(keyword)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    pub async fn count(&self, keyword: &str) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM books
            WHERE title ILIKE '%' || $1 || '%' OR author ILIKE '%' || $1 || '%'
            "#,
        )
            .bind(keyword)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    pub async fn find_reviews(&self, book_id: Uuid) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, book_id, user_id, name, rating, comment, created_at
            FROM book_reviews
            WHERE book_id = $1
            ORDER BY created_at DESC
            "#,
        )
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(reviews)
    }

    // Melhores notas primeiro
    pub async fn top_rated(&self, limit: i64) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY rating DESC, num_reviews DESC LIMIT $1"
        ))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    // ---
    // Escrita
    // ---

    pub async fn create(&self, payload: &CreateBookPayload) -> Result<Book, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, description, category, price, count_in_stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
            .bind(&payload.title)
            .bind(&payload.author)
            .bind(&payload.description)
            .bind(&payload.category)
            .bind(payload.price)
            .bind(payload.count_in_stock)
            .fetch_one(&self.pool)
            .await?;
        Ok(book)
    }

    // Campos ausentes (NULL) mantêm o valor atual
    pub async fn update(&self, id: Uuid, payload: &UpdateBookPayload) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                price = COALESCE($6, price),
                count_in_stock = COALESCE($7, count_in_stock),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOK_COLUMNS}
            "#
        ))
            .bind(id)
            .bind(payload.title.as_deref())
            .bind(payload.author.as_deref())
            .bind(payload.description.as_deref())
            .bind(payload.category.as_deref())
            .bind(payload.price)
            .bind(payload.count_in_stock)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    // true se algum livro foi removido
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Grava a avaliação e recalcula nota média e total numa única transação
    pub async fn add_review(
        &self,
        book_id: Uuid,
        user_id: Uuid,
        user_name: &str,
        rating: i16,
        comment: &str,
    ) -> Result<Review, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha do livro enquanto a média é recalculada
        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::BookNotFound);
        }

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO book_reviews (book_id, user_id, name, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, book_id, user_id, name, rating, comment, created_at
            "#,
        )
            .bind(book_id)
            .bind(user_id)
            .bind(user_name)
            .bind(rating)
            .bind(comment)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::BookAlreadyReviewed;
                    }
                }
                AppError::DatabaseError(e)
            })?;

        sqlx::query(
            r#"
            UPDATE books SET
                rating = (SELECT COALESCE(AVG(rating), 0)::NUMERIC(3, 2) FROM book_reviews WHERE book_id = $1),
                num_reviews = (SELECT COUNT(*) FROM book_reviews WHERE book_id = $1),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(review)
    }
}
