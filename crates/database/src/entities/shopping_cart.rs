use chrono::{DateTime, Utc};
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A course staged in a student's cart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub course_id: Uuid,
    pub added_at: DateTime<Utc>,
}

/// The items of a cart, stored as a single JSON column
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CartItems(pub Vec<CartItem>);

impl CartItems {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.0.iter()
    }

    /// Course ids in the order they were added, with repeats removed
    pub fn unique_course_ids(&self) -> Vec<Uuid> {
        let mut seen = HashSet::new();

        self.0
            .iter()
            .map(|item| item.course_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shopping_carts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// One cart per student
    #[sea_orm(unique)]
    pub user_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: CartItems,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Creates an empty cart owned by `user_id`
    pub fn empty(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            items: CartItems::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_course(&self, course_id: Uuid) -> bool {
        self.items.iter().any(|item| item.course_id == course_id)
    }

    /// Adds a course unless it is already present. Returns whether it was added.
    pub fn add_course(&mut self, course_id: Uuid, now: DateTime<Utc>) -> bool {
        if self.has_course(course_id) {
            return false;
        }

        self.items.0.push(CartItem {
            course_id,
            added_at: now,
        });
        self.updated_at = now;
        true
    }

    /// Removes a course. Returns whether anything was removed.
    pub fn remove_course(&mut self, course_id: Uuid, now: DateTime<Utc>) -> bool {
        let before = self.items.len();
        self.items.0.retain(|item| item.course_id != course_id);

        if self.items.len() == before {
            return false;
        }

        self.updated_at = now;
        true
    }

    pub fn clear(&mut self, now: DateTime<Utc>) {
        self.items.0.clear();
        self.updated_at = now;
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
