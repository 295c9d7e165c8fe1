use super::course::CourseResponse;
use chrono::{DateTime, Utc};
use database::entities::{course, shopping_cart};
use sea_orm::prelude::Uuid;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub course_id: Uuid,
    /// `null` when the course has since left the catalog
    pub course: Option<CourseResponse>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItemResponse>,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartResponse {
    pub fn populated(cart: shopping_cart::Model, courses: &HashMap<Uuid, course::Model>) -> Self {
        let items: Vec<_> = cart
            .items
            .iter()
            .map(|item| CartItemResponse {
                course_id: item.course_id,
                course: courses.get(&item.course_id).cloned().map(Into::into),
                added_at: item.added_at,
            })
            .collect();

        Self {
            id: cart.id,
            user_id: cart.user_id,
            item_count: items.len(),
            items,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartAddResponse {
    pub message: String,
    pub added: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartRemoveResponse {
    pub message: String,
    pub removed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InCartResponse {
    pub in_cart: bool,
}
