// src/db/dashboard_repo.rs

use sqlx::PgPool;
use rust_decimal::Decimal;
use crate::{
    common::error::AppError,
    db::book_repo::BOOK_COLUMNS,
    models::{
        books::Book,
        dashboard::{RecentOrder, RecentOrderRow},
    },
};

// Totais lidos num único snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardTotals {
    pub book_count: i64,
    pub user_count: i64,
    pub order_count: i64,
    pub paid_revenue: Decimal,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Contagens e faturamento total
    pub async fn get_totals(&self) -> Result<DashboardTotals, AppError> {
        // Transação só de leitura: todos os números vêm do mesmo snapshot
        let mut tx = self.pool.begin().await?;

        let book_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(&mut *tx)
            .await?;

        let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;

        let order_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(&mut *tx)
            .await?;

        let paid_revenue = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_price), 0) FROM orders WHERE is_paid = TRUE",
        )
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DashboardTotals {
            book_count,
            user_count,
            order_count,
            paid_revenue,
        })
    }

    // 2. Últimos pedidos criados, com o nome do comprador
    pub async fn get_recent_orders(&self, limit: i64) -> Result<Vec<RecentOrder>, AppError> {
        let rows = sqlx::query_as::<_, RecentOrderRow>(
            r#"
            SELECT
                o.id,
                o.total_price,
                o.is_paid,
                o.paid_at,
                o.created_at,
                u.id AS user_id,
                u.name AS user_name
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            LIMIT $1
            "#,
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(RecentOrder::from).collect())
    }

    // 3. Livros com estoque abaixo do limite, do menor para o maior
    pub async fn get_low_stock_books(
        &self,
        threshold: i32,
        limit: i64,
    ) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE count_in_stock < $1
            ORDER BY count_in_stock ASC, title ASC
            LIMIT $2
            "#
        ))
            .bind(threshold)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }
}
