// src/services/revenue.rs

//! Série de faturamento do painel: soma os pedidos pagos em janelas de
//! calendário (mês ou semana) e devolve os 6 períodos mais recentes, do mais
//! antigo para o mais novo.

use std::future::Future;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::{
    common::{
        calendar::{month_interval, week_interval, Interval},
        error::AppError,
    },
    models::{dashboard::RevenueBucket, orders::Order},
};

/// Quantos períodos a série sempre tem.
pub const BUCKET_COUNT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Monthly,
    Weekly,
}

impl Granularity {
    /// `None` para qualquer valor fora de `monthly` / `weekly`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(Granularity::Monthly),
            "weekly" => Some(Granularity::Weekly),
            _ => None,
        }
    }
}

/// Consulta de pedidos pagos por intervalo de `paid_at`, inclusiva nas duas pontas.
pub trait OrderStore: Send + Sync {
    fn find_paid_orders_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Order>, AppError>> + Send;
}

#[derive(Clone)]
pub struct RevenueAggregator<S> {
    store: S,
}

impl<S: OrderStore> RevenueAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Uma consulta por período, em sequência. Qualquer falha da consulta
    /// aborta a série inteira.
    pub async fn series<Tz>(
        &self,
        granularity: Granularity,
        now: DateTime<Tz>,
    ) -> Result<Vec<RevenueBucket>, AppError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send + Sync,
    {
        let mut buckets = Vec::with_capacity(BUCKET_COUNT as usize);

        // Do período atual (back = 0) para trás
        for back in 0..BUCKET_COUNT {
            let (interval, period) = match granularity {
                Granularity::Monthly => {
                    let interval = month_interval(&now, back)?;
                    let label = interval.start.date_naive().format("%b %Y").to_string();
                    (interval, label)
                }
                Granularity::Weekly => (week_interval(&now, back)?, format!("Week {}", back + 1)),
            };

            let revenue = self.paid_total(interval).await?;
            tracing::debug!(%period, %revenue, "período de faturamento calculado");

            buckets.push(RevenueBucket { period, revenue });
        }

        // Ordem cronológica: mais antigo primeiro
        buckets.reverse();
        Ok(buckets)
    }

    async fn paid_total<Tz: TimeZone>(&self, interval: Interval<Tz>) -> Result<Decimal, AppError> {
        let orders = self
            .store
            .find_paid_orders_in_range(interval.start.with_timezone(&Utc), interval.end.with_timezone(&Utc))
            .await?;

        Ok(orders
            .iter()
            .filter(|order| order.is_paid)
            .map(|order| order.total_price)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[derive(Default)]
    struct MemoryStore {
        orders: Vec<Order>,
        queries: AtomicUsize,
    }

    impl MemoryStore {
        fn with(orders: Vec<Order>) -> Self {
            Self { orders, queries: AtomicUsize::new(0) }
        }
    }

    impl OrderStore for MemoryStore {
        async fn find_paid_orders_in_range(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Order>, AppError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .orders
                .iter()
                .filter(|o| o.is_paid)
                .filter(|o| o.paid_at.is_some_and(|at| at >= start && at <= end))
                .cloned()
                .collect())
        }
    }

    struct BrokenStore;

    impl OrderStore for BrokenStore {
        async fn find_paid_orders_in_range(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<Order>, AppError> {
            Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut))
        }
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn order(paid_at: Option<&str>, is_paid: bool, cents: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            user_id: None,
            total_price: Decimal::new(cents, 2),
            is_paid,
            paid_at: paid_at.map(utc),
            created_at: utc("2020-01-01T00:00:00Z"),
        }
    }

    fn paid(at: &str, cents: i64) -> Order {
        order(Some(at), true, cents)
    }

    fn labels(series: &[RevenueBucket]) -> Vec<&str> {
        series.iter().map(|b| b.period.as_str()).collect()
    }

    fn revenue_of(series: &[RevenueBucket], period: &str) -> Decimal {
        series.iter().find(|b| b.period == period).map(|b| b.revenue).unwrap()
    }

    #[test]
    fn granularity_only_accepts_the_two_known_values() {
        assert_eq!(Granularity::parse("monthly"), Some(Granularity::Monthly));
        assert_eq!(Granularity::parse("weekly"), Some(Granularity::Weekly));
        assert_eq!(Granularity::parse("daily"), None);
        assert_eq!(Granularity::parse("Monthly"), None);
    }

    #[tokio::test]
    async fn monthly_series_sums_paid_orders_per_calendar_month() {
        let store = MemoryStore::with(vec![
            paid("2024-03-10T12:00:00Z", 5000),
            paid("2024-02-05T09:30:00Z", 3000),
            paid("2023-03-01T00:00:00Z", 99900),
        ]);
        let aggregator = RevenueAggregator::new(store);

        let series = aggregator
            .series(Granularity::Monthly, utc("2024-03-15T10:00:00Z"))
            .await
            .unwrap();

        assert_eq!(
            labels(&series),
            ["Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024", "Mar 2024"]
        );
        assert_eq!(revenue_of(&series, "Mar 2024"), Decimal::new(5000, 2));
        assert_eq!(revenue_of(&series, "Feb 2024"), Decimal::new(3000, 2));

        let total: Decimal = series.iter().map(|b| b.revenue).sum();
        assert_eq!(total, Decimal::new(8000, 2));
    }

    #[tokio::test]
    async fn monthly_series_in_january_reaches_back_into_previous_year() {
        let aggregator = RevenueAggregator::new(MemoryStore::with(vec![
            paid("2023-12-31T23:59:59.999Z", 1250),
        ]));

        let series = aggregator
            .series(Granularity::Monthly, utc("2024-01-10T00:00:00Z"))
            .await
            .unwrap();

        assert_eq!(series.len(), 6);
        assert_eq!(series[4].period, "Dec 2023");
        assert_eq!(series[4].revenue, Decimal::new(1250, 2));
        assert_eq!(series[5].period, "Jan 2024");
        assert_eq!(series[0].period, "Aug 2023");
    }

    #[tokio::test]
    async fn unpaid_orders_never_count() {
        let aggregator = RevenueAggregator::new(MemoryStore::with(vec![
            order(None, false, 10000),
            // Dado inconsistente: paid_at preenchido sem is_paid
            order(Some("2024-03-02T10:00:00Z"), false, 20000),
            paid("2024-03-02T10:00:00Z", 700),
        ]));

        let series = aggregator
            .series(Granularity::Monthly, utc("2024-03-15T10:00:00Z"))
            .await
            .unwrap();

        let total: Decimal = series.iter().map(|b| b.revenue).sum();
        assert_eq!(total, Decimal::new(700, 2));
    }

    #[tokio::test]
    async fn boundary_orders_land_in_exactly_one_month() {
        let orders = vec![
            paid("2024-02-01T00:00:00Z", 100),
            paid("2024-01-31T23:59:59.999Z", 200),
            paid("2023-10-01T00:00:00Z", 400),
            // Fora da janela, um milissegundo antes
            paid("2023-09-30T23:59:59.999Z", 800),
            paid("2024-03-31T23:59:59.999Z", 1600),
        ];
        let aggregator = RevenueAggregator::new(MemoryStore::with(orders));

        let series = aggregator
            .series(Granularity::Monthly, utc("2024-03-15T10:00:00Z"))
            .await
            .unwrap();

        assert_eq!(revenue_of(&series, "Feb 2024"), Decimal::new(100, 2));
        assert_eq!(revenue_of(&series, "Jan 2024"), Decimal::new(200, 2));
        assert_eq!(revenue_of(&series, "Oct 2023"), Decimal::new(400, 2));
        assert_eq!(revenue_of(&series, "Mar 2024"), Decimal::new(1600, 2));

        let total: Decimal = series.iter().map(|b| b.revenue).sum();
        assert_eq!(total, Decimal::new(2300, 2));
    }

    #[tokio::test]
    async fn weekly_series_is_labelled_from_the_current_week_backwards() {
        // Sexta-feira: a semana atual começa no domingo 2024-03-10
        let now = utc("2024-03-15T18:00:00Z");
        let aggregator = RevenueAggregator::new(MemoryStore::with(vec![
            paid("2024-03-10T00:00:00Z", 1000),
            paid("2024-03-09T23:59:59.999Z", 300),
            paid("2024-02-04T00:00:00Z", 50),
            // Anterior à sexta semana
            paid("2024-02-03T23:59:59.999Z", 99999),
        ]));

        let series = aggregator.series(Granularity::Weekly, now).await.unwrap();

        assert_eq!(
            labels(&series),
            ["Week 6", "Week 5", "Week 4", "Week 3", "Week 2", "Week 1"]
        );
        assert_eq!(revenue_of(&series, "Week 1"), Decimal::new(1000, 2));
        assert_eq!(revenue_of(&series, "Week 2"), Decimal::new(300, 2));
        assert_eq!(revenue_of(&series, "Week 6"), Decimal::new(50, 2));

        let total: Decimal = series.iter().map(|b| b.revenue).sum();
        assert_eq!(total, Decimal::new(1350, 2));
    }

    #[tokio::test]
    async fn buckets_follow_the_time_zone_of_now() {
        // 2024-03-01T01:00Z ainda é fevereiro em UTC-3
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let now = utc("2024-03-15T12:00:00Z").with_timezone(&tz);
        let aggregator = RevenueAggregator::new(MemoryStore::with(vec![
            paid("2024-03-01T01:00:00Z", 4200),
        ]));

        let series = aggregator.series(Granularity::Monthly, now).await.unwrap();

        assert_eq!(revenue_of(&series, "Feb 2024"), Decimal::new(4200, 2));
        assert_eq!(revenue_of(&series, "Mar 2024"), Decimal::ZERO);
    }

    #[tokio::test]
    async fn one_query_per_bucket() {
        let aggregator = RevenueAggregator::new(MemoryStore::default());

        aggregator
            .series(Granularity::Weekly, utc("2024-03-15T10:00:00Z"))
            .await
            .unwrap();

        assert_eq!(aggregator.store.queries.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn same_now_and_data_give_identical_output() {
        let aggregator = RevenueAggregator::new(MemoryStore::with(vec![
            paid("2024-03-10T12:00:00Z", 5000),
            paid("2024-01-20T12:00:00Z", 1999),
        ]));
        let now = utc("2024-03-15T10:00:00Z");

        let first = aggregator.series(Granularity::Monthly, now).await.unwrap();
        let second = aggregator.series(Granularity::Monthly, now).await.unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn store_failures_propagate_without_partial_results() {
        let aggregator = RevenueAggregator::new(BrokenStore);

        let result = aggregator
            .series(Granularity::Monthly, utc("2024-03-15T10:00:00Z"))
            .await;

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }
}
