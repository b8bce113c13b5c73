// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use crate::{
    common::error::AppError,
    models::orders::Order,
    services::revenue::OrderStore,
};

// Repositório de pedidos: a "Order Store" lida pelo agregador de faturamento.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Pedidos pagos com paid_at dentro de [start, end], inclusive nas duas pontas
    pub async fn find_paid_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, total_price, is_paid, paid_at, created_at
            FROM orders
            WHERE is_paid = TRUE
              AND paid_at >= $1
              AND paid_at <= $2
            ORDER BY paid_at ASC
            "#,
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }
}

impl OrderStore for OrderRepository {
    async fn find_paid_orders_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError> {
        self.find_paid_in_range(start, end).await
    }
}
