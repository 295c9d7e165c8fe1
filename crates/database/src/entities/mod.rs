pub mod course;
pub mod schedule;
pub mod shopping_cart;
pub mod user;
