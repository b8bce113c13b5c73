// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;

use crate::{
    common::error::AppError,
    config::AppState,
    // Importamos os models para referenciar no Swagger
    models::{
        books::Book,
        dashboard::{
            DashboardStats, LowStockQuery, RecentOrder, RecentOrdersQuery, RevenueBucket, RevenueQuery,
        },
    },
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Totais de livros, usuários, pedidos e faturamento", body = DashboardStats),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.dashboard_service.get_stats().await?;

    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/dashboard/recent-orders
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-orders",
    tag = "Dashboard",
    params(RecentOrdersQuery),
    responses(
        (status = 200, description = "Pedidos mais recentes", body = Vec<RecentOrder>),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_recent_orders(
    State(app_state): State<AppState>,
    Query(query): Query<RecentOrdersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.dashboard_service
        .get_recent_orders(query.limit())
        .await?;

    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/dashboard/low-stock
#[utoipa::path(
    get,
    path = "/api/dashboard/low-stock",
    tag = "Dashboard",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Livros com estoque baixo", body = Vec<Book>),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_low_stock(
    State(app_state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> Result<impl IntoResponse, AppError> {
    let books = app_state.dashboard_service
        .get_low_stock_books(query.threshold(), query.limit())
        .await?;

    Ok((StatusCode::OK, Json(books)))
}

// GET /api/dashboard/revenue
#[utoipa::path(
    get,
    path = "/api/dashboard/revenue",
    tag = "Dashboard",
    params(RevenueQuery),
    responses(
        (status = 200, description = "Faturamento dos últimos 6 meses ou 6 semanas, do mais antigo ao mais recente", body = Vec<RevenueBucket>),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_revenue(
    State(app_state): State<AppState>,
    Query(query): Query<RevenueQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Os períodos seguem o calendário do fuso local do servidor
    let series = app_state.dashboard_service
        .get_revenue_stats(query.period(), Local::now())
        .await?;

    Ok((StatusCode::OK, Json(series)))
}
