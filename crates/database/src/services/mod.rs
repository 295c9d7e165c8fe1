pub mod cart;
pub mod course;
pub mod error;
pub mod schedule;
pub mod user;
