pub mod auth;
pub mod cart;
pub mod course;
pub mod health;
pub mod root;
pub mod schedule;
pub mod user;
