//! Persistence capability used by the services.
//!
//! Every service talks to storage through [`Store`], which is implemented by
//! [`SeaOrmStore`] for Postgres and [`MemoryStore`] for tests and
//! database-less runs. Writes replace whole documents, so concurrent
//! read-modify-write sequences on the same cart or schedule are last writer
//! wins.

mod memory;
mod sea_orm_store;

pub use memory::MemoryStore;
pub use sea_orm_store::SeaOrmStore;

use crate::entities::{course, schedule, shopping_cart, user};
use async_trait::async_trait;
use models::term::Term;
use sea_orm::{DbErr, prelude::Uuid};

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<user::Model>, DbErr>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, DbErr>;

    async fn insert_user(&self, user: user::Model) -> Result<user::Model, DbErr>;

    async fn find_courses(&self) -> Result<Vec<course::Model>, DbErr>;

    async fn find_course(&self, id: Uuid) -> Result<Option<course::Model>, DbErr>;

    /// Courses among `ids`, in no particular order. Unknown ids are skipped.
    async fn find_courses_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<course::Model>, DbErr>;

    async fn insert_course(&self, course: course::Model) -> Result<course::Model, DbErr>;

    /// Replaces a course. Returns `None` when no course has that id.
    async fn update_course(&self, course: course::Model) -> Result<Option<course::Model>, DbErr>;

    /// Returns whether a course was deleted
    async fn delete_course(&self, id: Uuid) -> Result<bool, DbErr>;

    /// Increments the click counter in place and returns the updated course
    async fn record_course_view(&self, id: Uuid) -> Result<Option<course::Model>, DbErr>;

    /// Most viewed courses first
    async fn trending_courses(&self, limit: u64) -> Result<Vec<course::Model>, DbErr>;

    async fn find_cart(&self, user_id: Uuid) -> Result<Option<shopping_cart::Model>, DbErr>;

    async fn insert_cart(&self, cart: shopping_cart::Model)
    -> Result<shopping_cart::Model, DbErr>;

    async fn save_cart(&self, cart: shopping_cart::Model) -> Result<shopping_cart::Model, DbErr>;

    /// Finds a schedule only if it belongs to `user_id`
    async fn find_schedule(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<schedule::Model>, DbErr>;

    async fn find_schedule_for_term(
        &self,
        user_id: Uuid,
        term: Term,
        year: i32,
    ) -> Result<Option<schedule::Model>, DbErr>;

    async fn find_schedules(
        &self,
        user_id: Uuid,
        year: i32,
        term: Option<Term>,
    ) -> Result<Vec<schedule::Model>, DbErr>;

    async fn insert_schedule(&self, schedule: schedule::Model) -> Result<schedule::Model, DbErr>;

    async fn save_schedule(&self, schedule: schedule::Model) -> Result<schedule::Model, DbErr>;
}
