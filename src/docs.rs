// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_profile,
        handlers::users::update_profile,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Books ---
        handlers::books::list_books,
        handlers::books::top_books,
        handlers::books::get_book,
        handlers::books::create_book,
        handlers::books::update_book,
        handlers::books::delete_book,
        handlers::books::create_review,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::get_recent_orders,
        handlers::dashboard::get_low_stock,
        handlers::dashboard::get_revenue,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::UpdateProfilePayload,
            models::auth::AdminUpdateUserPayload,

            // --- Catálogo / Pedidos ---
            models::books::Book,
            models::books::Review,
            models::books::BookDetail,
            models::books::BookPage,
            models::books::CreateBookPayload,
            models::books::UpdateBookPayload,
            models::books::CreateReviewPayload,
            models::orders::Order,

            // --- Dashboard ---
            models::dashboard::CountCard,
            models::dashboard::RevenueCard,
            models::dashboard::DashboardStats,
            models::dashboard::OrderUser,
            models::dashboard::RecentOrder,
            models::dashboard::RevenueBucket,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Books", description = "Catálogo de Livros e Avaliações"),
        (name = "Dashboard", description = "Indicadores e Gráficos do Painel Administrativo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
