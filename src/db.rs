pub mod user_repo;
pub use user_repo::UserRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod book_repo;
pub use book_repo::BookRepository;
