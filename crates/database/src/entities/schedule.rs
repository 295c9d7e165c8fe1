use chrono::{DateTime, Utc};
use models::{course_status::CourseStatus, term::Term};
use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// A course's place in a schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCourse {
    pub course: Uuid,
    #[serde(default)]
    pub status: CourseStatus,
    pub added_at: DateTime<Utc>,
}

impl ScheduleCourse {
    /// A freshly enrolled course
    pub fn enrolled(course: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            course,
            status: CourseStatus::Enrolled,
            added_at: now,
        }
    }
}

/// Ordered course entries of a schedule, stored as a single JSON column
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ScheduleCourses(pub Vec<ScheduleCourse>);

impl ScheduleCourses {
    pub fn iter(&self) -> impl Iterator<Item = &ScheduleCourse> {
        self.0.iter()
    }

    pub fn find(&self, course: Uuid) -> Option<&ScheduleCourse> {
        self.0.iter().find(|item| item.course == course)
    }

    pub fn find_mut(&mut self, course: Uuid) -> Option<&mut ScheduleCourse> {
        self.0.iter_mut().find(|item| item.course == course)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub term: Term,
    pub year: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub courses: ScheduleCourses,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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
