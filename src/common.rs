pub mod calendar;
pub mod error;
