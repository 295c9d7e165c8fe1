//! Domain vocabulary shared by the database and server crates.

pub mod course_status;
pub mod role;
pub mod term;

#[cfg(feature = "database")]
mod value;
