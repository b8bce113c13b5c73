pub mod auth;
pub mod books;
pub use books::BookService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod revenue;
pub mod users;
pub use users::UserService;
