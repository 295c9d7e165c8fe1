pub mod clock;
pub mod db;
pub mod entities;
pub mod services;
pub mod store;
