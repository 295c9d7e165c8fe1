use super::Store;
use crate::entities::{course, schedule, shopping_cart, user};
use async_trait::async_trait;
use models::term::Term;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
    prelude::{Expr, Uuid},
};

/// [`Store`] backed by a sea-orm connection
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl Store for SeaOrmStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find_by_id(id).one(&self.db).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    async fn insert_user(&self, user: user::Model) -> Result<user::Model, DbErr> {
        user.into_active_model().reset_all().insert(&self.db).await
    }

    async fn find_courses(&self) -> Result<Vec<course::Model>, DbErr> {
        course::Entity::find()
            .order_by_asc(course::Column::Prefix)
            .order_by_asc(course::Column::Number)
            .all(&self.db)
            .await
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<course::Model>, DbErr> {
        course::Entity::find_by_id(id).one(&self.db).await
    }

    async fn find_courses_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<course::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        course::Entity::find()
            .filter(course::Column::Id.is_in(ids))
            .all(&self.db)
            .await
    }

    async fn insert_course(&self, course: course::Model) -> Result<course::Model, DbErr> {
        course.into_active_model().reset_all().insert(&self.db).await
    }

    async fn update_course(&self, course: course::Model) -> Result<Option<course::Model>, DbErr> {
        match course.into_active_model().reset_all().update(&self.db).await {
            Ok(updated) => Ok(Some(updated)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn delete_course(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = course::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn record_course_view(&self, id: Uuid) -> Result<Option<course::Model>, DbErr> {
        // Single UPDATE, so concurrent views all count
        let result = course::Entity::update_many()
            .col_expr(
                course::Column::ClickCount,
                Expr::col(course::Column::ClickCount).add(1),
            )
            .filter(course::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        course::Entity::find_by_id(id).one(&self.db).await
    }

    async fn trending_courses(&self, limit: u64) -> Result<Vec<course::Model>, DbErr> {
        course::Entity::find()
            .order_by_desc(course::Column::ClickCount)
            .order_by_asc(course::Column::Prefix)
            .order_by_asc(course::Column::Number)
            .limit(limit)
            .all(&self.db)
            .await
    }

    async fn find_cart(&self, user_id: Uuid) -> Result<Option<shopping_cart::Model>, DbErr> {
        shopping_cart::Entity::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    async fn insert_cart(
        &self,
        cart: shopping_cart::Model,
    ) -> Result<shopping_cart::Model, DbErr> {
        cart.into_active_model().reset_all().insert(&self.db).await
    }

    async fn save_cart(&self, cart: shopping_cart::Model) -> Result<shopping_cart::Model, DbErr> {
        cart.into_active_model().reset_all().update(&self.db).await
    }

    async fn find_schedule(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<schedule::Model>, DbErr> {
        schedule::Entity::find()
            .filter(
                Condition::all()
                    .add(schedule::Column::Id.eq(id))
                    .add(schedule::Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
    }

    async fn find_schedule_for_term(
        &self,
        user_id: Uuid,
        term: Term,
        year: i32,
    ) -> Result<Option<schedule::Model>, DbErr> {
        schedule::Entity::find()
            .filter(
                Condition::all()
                    .add(schedule::Column::UserId.eq(user_id))
                    .add(schedule::Column::Term.eq(term))
                    .add(schedule::Column::Year.eq(year)),
            )
            .one(&self.db)
            .await
    }

    async fn find_schedules(
        &self,
        user_id: Uuid,
        year: i32,
        term: Option<Term>,
    ) -> Result<Vec<schedule::Model>, DbErr> {
        let mut condition = Condition::all()
            .add(schedule::Column::UserId.eq(user_id))
            .add(schedule::Column::Year.eq(year));

        if let Some(term) = term {
            condition = condition.add(schedule::Column::Term.eq(term));
        }

        schedule::Entity::find()
            .filter(condition)
            .order_by_asc(schedule::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    async fn insert_schedule(&self, schedule: schedule::Model) -> Result<schedule::Model, DbErr> {
        schedule.into_active_model().reset_all().insert(&self.db).await
    }

    async fn save_schedule(&self, schedule: schedule::Model) -> Result<schedule::Model, DbErr> {
        schedule.into_active_model().reset_all().update(&self.db).await
    }
}
