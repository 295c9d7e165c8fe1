pub mod cart;
pub mod course;
pub mod schedule;
pub mod user;

use serde::Serialize;
use utoipa::ToSchema;

/// Acknowledgement with a human readable message
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
