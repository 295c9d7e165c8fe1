use super::Store;
use crate::entities::{course, schedule, shopping_cart, user};
use async_trait::async_trait;
use models::term::Term;
use sea_orm::{DbErr, prelude::Uuid};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, user::Model>,
    courses: HashMap<Uuid, course::Model>,
    carts: HashMap<Uuid, shopping_cart::Model>,
    schedules: HashMap<Uuid, schedule::Model>,
}

/// [`Store`] that keeps every document in process memory.
///
/// Enforces the same unique constraints as the migrated schema.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_courses(courses: &mut [course::Model]) {
    courses.sort_by(|a, b| (&a.prefix, &a.number).cmp(&(&b.prefix, &b.number)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<user::Model>, DbErr> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, DbErr> {
        let tables = self.tables.read().await;

        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn insert_user(&self, user: user::Model) -> Result<user::Model, DbErr> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DbErr::Custom(format!(
                "duplicate username {}",
                user.username
            )));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_courses(&self) -> Result<Vec<course::Model>, DbErr> {
        let mut courses: Vec<_> = self.tables.read().await.courses.values().cloned().collect();
        sort_courses(&mut courses);
        Ok(courses)
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<course::Model>, DbErr> {
        Ok(self.tables.read().await.courses.get(&id).cloned())
    }

    async fn find_courses_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<course::Model>, DbErr> {
        let tables = self.tables.read().await;

        Ok(ids
            .iter()
            .filter_map(|id| tables.courses.get(id).cloned())
            .collect())
    }

    async fn insert_course(&self, course: course::Model) -> Result<course::Model, DbErr> {
        let mut tables = self.tables.write().await;
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn update_course(&self, course: course::Model) -> Result<Option<course::Model>, DbErr> {
        let mut tables = self.tables.write().await;

        match tables.courses.get_mut(&course.id) {
            Some(existing) => {
                *existing = course.clone();
                Ok(Some(course))
            }
            None => Ok(None),
        }
    }

    async fn delete_course(&self, id: Uuid) -> Result<bool, DbErr> {
        Ok(self.tables.write().await.courses.remove(&id).is_some())
    }

    async fn record_course_view(&self, id: Uuid) -> Result<Option<course::Model>, DbErr> {
        let mut tables = self.tables.write().await;

        Ok(tables.courses.get_mut(&id).map(|course| {
            course.click_count += 1;
            course.clone()
        }))
    }

    async fn trending_courses(&self, limit: u64) -> Result<Vec<course::Model>, DbErr> {
        let mut courses = self.find_courses().await?;

        // Stable sort keeps catalog order among equally viewed courses
        courses.sort_by(|a, b| b.click_count.cmp(&a.click_count));
        courses.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(courses)
    }

    async fn find_cart(&self, user_id: Uuid) -> Result<Option<shopping_cart::Model>, DbErr> {
        let tables = self.tables.read().await;

        Ok(tables
            .carts
            .values()
            .find(|cart| cart.user_id == user_id)
            .cloned())
    }

    async fn insert_cart(
        &self,
        cart: shopping_cart::Model,
    ) -> Result<shopping_cart::Model, DbErr> {
        let mut tables = self.tables.write().await;

        if tables.carts.values().any(|c| c.user_id == cart.user_id) {
            return Err(DbErr::Custom(format!(
                "user {} already has a cart",
                cart.user_id
            )));
        }

        tables.carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn save_cart(&self, cart: shopping_cart::Model) -> Result<shopping_cart::Model, DbErr> {
        let mut tables = self.tables.write().await;

        match tables.carts.get_mut(&cart.id) {
            Some(existing) => {
                *existing = cart.clone();
                Ok(cart)
            }
            None => Err(DbErr::RecordNotUpdated),
        }
    }

    async fn find_schedule(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<schedule::Model>, DbErr> {
        let tables = self.tables.read().await;

        Ok(tables
            .schedules
            .get(&id)
            .filter(|schedule| schedule.user_id == user_id)
            .cloned())
    }

    async fn find_schedule_for_term(
        &self,
        user_id: Uuid,
        term: Term,
        year: i32,
    ) -> Result<Option<schedule::Model>, DbErr> {
        let tables = self.tables.read().await;

        Ok(tables
            .schedules
            .values()
            .find(|s| s.user_id == user_id && s.term == term && s.year == year)
            .cloned())
    }

    async fn find_schedules(
        &self,
        user_id: Uuid,
        year: i32,
        term: Option<Term>,
    ) -> Result<Vec<schedule::Model>, DbErr> {
        let tables = self.tables.read().await;

        let mut schedules: Vec<_> = tables
            .schedules
            .values()
            .filter(|s| s.user_id == user_id && s.year == year)
            .filter(|s| term.is_none_or(|term| s.term == term))
            .cloned()
            .collect();
        schedules.sort_by_key(|s| s.created_at);

        Ok(schedules)
    }

    async fn insert_schedule(&self, schedule: schedule::Model) -> Result<schedule::Model, DbErr> {
        let mut tables = self.tables.write().await;
        tables.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn save_schedule(&self, schedule: schedule::Model) -> Result<schedule::Model, DbErr> {
        let mut tables = self.tables.write().await;

        match tables.schedules.get_mut(&schedule.id) {
            Some(existing) => {
                *existing = schedule.clone();
                Ok(schedule)
            }
            None => Err(DbErr::RecordNotUpdated),
        }
    }
}
