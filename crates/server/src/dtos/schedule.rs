use super::course::CourseResponse;
use chrono::{DateTime, Utc};
use database::entities::{course, schedule};
use models::{course_status::CourseStatus, term::Term};
use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleQuery {
    /// Spring, Summer or Fall
    pub term: Option<String>,
    /// Defaults to the current year when missing or not a number
    #[param(value_type = Option<i32>)]
    pub year: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScheduleRequest {
    #[schema(example = "Spring")]
    pub term: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DropCourseRequest {
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCourseResponse {
    pub course_id: Uuid,
    /// `null` when the course has since left the catalog
    pub course: Option<CourseResponse>,
    #[schema(value_type = String, example = "enrolled")]
    pub status: CourseStatus,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(value_type = String, example = "Fall")]
    pub term: Term,
    pub year: i32,
    pub courses: Vec<ScheduleCourseResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleResponse {
    pub fn populated(schedule: schedule::Model, courses: &HashMap<Uuid, course::Model>) -> Self {
        Self {
            id: schedule.id,
            user_id: schedule.user_id,
            term: schedule.term,
            year: schedule.year,
            courses: schedule
                .courses
                .iter()
                .map(|item| ScheduleCourseResponse {
                    course_id: item.course,
                    course: courses.get(&item.course).cloned().map(Into::into),
                    status: item.status,
                    added_at: item.added_at,
                })
                .collect(),
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}

/// A schedule together with what happened to it
#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleEnvelope {
    pub message: String,
    pub schedule: ScheduleResponse,
}
