// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Percentuais fixos exibidos nos cards. Ainda não são calculados.
pub const BOOK_GROWTH: &str = "+2% from last month";
pub const USER_GROWTH: &str = "+5% from last month";
pub const ORDER_GROWTH: &str = "+12% from last month";
pub const REVENUE_GROWTH: &str = "+8% from last month";

pub const DEFAULT_RECENT_ORDERS_LIMIT: i64 = 5;
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;
pub const DEFAULT_LOW_STOCK_LIMIT: i64 = 5;

// 1. Cards do topo do painel
#[derive(Debug, Serialize, ToSchema)]
pub struct CountCard {
    pub count: i64,
    pub change: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueCard {
    pub total: Decimal,
    pub change: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub books: CountCard,
    pub users: CountCard,
    pub orders: CountCard,
    pub revenue: RevenueCard,
}

// 2. Pedidos recentes, com o nome de quem comprou
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderUser {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: Uuid,
    pub user: Option<OrderUser>,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Linha "achatada" do LEFT JOIN entre orders e users
#[derive(Debug, FromRow)]
pub struct RecentOrderRow {
    pub id: Uuid,
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
}

impl From<RecentOrderRow> for RecentOrder {
    fn from(row: RecentOrderRow) -> Self {
        let user = match (row.user_id, row.user_name) {
            (Some(id), Some(name)) => Some(OrderUser { id, name }),
            _ => None,
        };

        Self {
            id: row.id,
            user,
            total_price: row.total_price,
            is_paid: row.is_paid,
            paid_at: row.paid_at,
            created_at: row.created_at,
        }
    }
}

// 3. Série de faturamento (gráfico)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RevenueBucket {
    /// "Jan 2024" no modo mensal, "Week 1".."Week 6" no semanal.
    pub period: String,
    pub revenue: Decimal,
}

// ---
// Query strings
// ---
// Os parâmetros chegam como texto: valores ausentes, inválidos, zero ou
// negativos caem no padrão. Propositalmente mais estrito que um
// `Number(x) || padrão`: frações ("3.5") também caem no padrão e um limit
// negativo não vira o valor absoluto. Só inteiros positivos valem.

pub(crate) fn positive_or<T>(raw: Option<&str>, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.and_then(|value| value.trim().parse::<T>().ok())
        .filter(|value| *value > T::default())
        .unwrap_or(default)
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RevenueQuery {
    /// `monthly` (padrão) ou `weekly`.
    pub period: Option<String>,
}

impl RevenueQuery {
    pub fn period(&self) -> &str {
        self.period.as_deref().unwrap_or("monthly")
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentOrdersQuery {
    /// Quantidade de pedidos (padrão 5).
    pub limit: Option<String>,
}

impl RecentOrdersQuery {
    pub fn limit(&self) -> i64 {
        positive_or(self.limit.as_deref(), DEFAULT_RECENT_ORDERS_LIMIT)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    /// Estoque abaixo deste valor é considerado baixo (padrão 10).
    pub threshold: Option<String>,
    /// Quantidade de livros (padrão 5).
    pub limit: Option<String>,
}

impl LowStockQuery {
    pub fn threshold(&self) -> i32 {
        positive_or(self.threshold.as_deref(), DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn limit(&self) -> i64 {
        positive_or(self.limit.as_deref(), DEFAULT_LOW_STOCK_LIMIT)
    }
}
