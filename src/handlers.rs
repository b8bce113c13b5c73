pub mod auth;
pub mod books;
pub mod dashboard;
pub mod users;
