// src/services/dashboard_service.rs

use chrono::{DateTime, TimeZone};
use crate::{
    common::error::AppError,
    db::{DashboardRepository, OrderRepository},
    models::{
        books::Book,
        dashboard::{
            CountCard, DashboardStats, RecentOrder, RevenueBucket, RevenueCard,
            BOOK_GROWTH, ORDER_GROWTH, REVENUE_GROWTH, USER_GROWTH,
        },
    },
    services::revenue::{Granularity, OrderStore, RevenueAggregator},
};

#[derive(Clone)]
pub struct DashboardService<S = OrderRepository> {
    repo: DashboardRepository,
    revenue: RevenueAggregator<S>,
}

impl<S: OrderStore> DashboardService<S> {
    pub fn new(repo: DashboardRepository, order_store: S) -> Self {
        Self {
            repo,
            revenue: RevenueAggregator::new(order_store),
        }
    }

    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        let totals = self.repo.get_totals().await?;

        Ok(DashboardStats {
            books: CountCard { count: totals.book_count, change: BOOK_GROWTH.to_string() },
            users: CountCard { count: totals.user_count, change: USER_GROWTH.to_string() },
            orders: CountCard { count: totals.order_count, change: ORDER_GROWTH.to_string() },
            revenue: RevenueCard { total: totals.paid_revenue, change: REVENUE_GROWTH.to_string() },
        })
    }

    pub async fn get_recent_orders(&self, limit: i64) -> Result<Vec<RecentOrder>, AppError> {
        self.repo.get_recent_orders(limit).await
    }

    pub async fn get_low_stock_books(&self, threshold: i32, limit: i64) -> Result<Vec<Book>, AppError> {
        self.repo.get_low_stock_books(threshold, limit).await
    }

    // Período desconhecido devolve série vazia em vez de erro
    pub async fn get_revenue_stats<Tz>(
        &self,
        period: &str,
        now: DateTime<Tz>,
    ) -> Result<Vec<RevenueBucket>, AppError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send + Sync,
    {
        match Granularity::parse(period) {
            Some(granularity) => self.revenue.series(granularity, now).await,
            None => {
                tracing::warn!("Período de faturamento não suportado: {:?}", period);
                Ok(Vec::new())
            }
        }
    }
}
