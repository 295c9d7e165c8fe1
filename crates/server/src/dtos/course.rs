use chrono::{DateTime, Utc};
use database::{
    entities::course,
    services::course::{CourseDraft, CoursePatch},
};
use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub prefix: String,
    pub number: String,
    pub name: String,
    pub program: Option<String>,
    pub description: Option<String>,
    pub prerequisites: Vec<String>,
    pub credit_hours_min: f64,
    pub credit_hours_max: Option<f64>,
    pub lecture_hours_min: Option<f64>,
    pub date_of_last_revision: DateTime<Utc>,
    pub learning_objectives: Vec<String>,
    pub topics: Vec<String>,
    pub click_count: i64,
}

impl From<course::Model> for CourseResponse {
    fn from(course: course::Model) -> Self {
        Self {
            id: course.id,
            prefix: course.prefix,
            number: course.number,
            name: course.name,
            program: course.program,
            description: course.description,
            prerequisites: course.prerequisites,
            credit_hours_min: course.credit_hours_min,
            credit_hours_max: course.credit_hours_max,
            lecture_hours_min: course.lecture_hours_min,
            date_of_last_revision: course.date_of_last_revision,
            learning_objectives: course.learning_objectives,
            topics: course.topics,
            click_count: course.click_count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub name: String,
    pub program: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub credit_hours_min: Option<f64>,
    pub credit_hours_max: Option<f64>,
    pub lecture_hours_min: Option<f64>,
    pub date_of_last_revision: Option<DateTime<Utc>>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl CreateCourseRequest {
    /// `None` when the required credit hours are missing
    pub fn into_draft(self) -> Option<CourseDraft> {
        Some(CourseDraft {
            prefix: self.prefix,
            number: self.number,
            name: self.name,
            program: self.program,
            description: self.description,
            prerequisites: self.prerequisites,
            credit_hours_min: self.credit_hours_min?,
            credit_hours_max: self.credit_hours_max,
            lecture_hours_min: self.lecture_hours_min,
            date_of_last_revision: self.date_of_last_revision,
            learning_objectives: self.learning_objectives,
            topics: self.topics,
        })
    }
}

/// Fields to change on a course. The view counter is not editable.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub prefix: Option<String>,
    pub number: Option<String>,
    pub name: Option<String>,
    pub program: Option<String>,
    pub description: Option<String>,
    pub prerequisites: Option<Vec<String>>,
    pub credit_hours_min: Option<f64>,
    pub credit_hours_max: Option<f64>,
    pub lecture_hours_min: Option<f64>,
    pub date_of_last_revision: Option<DateTime<Utc>>,
    pub learning_objectives: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
}

impl From<UpdateCourseRequest> for CoursePatch {
    fn from(request: UpdateCourseRequest) -> Self {
        Self {
            prefix: request.prefix,
            number: request.number,
            name: request.name,
            program: request.program,
            description: request.description,
            prerequisites: request.prerequisites,
            credit_hours_min: request.credit_hours_min,
            credit_hours_max: request.credit_hours_max,
            lecture_hours_min: request.lecture_hours_min,
            date_of_last_revision: request.date_of_last_revision,
            learning_objectives: request.learning_objectives,
            topics: request.topics,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendingQuery {
    /// Number of courses to return, at most 50
    #[serde(default = "default_trending_limit")]
    pub limit: u64,
}

fn default_trending_limit() -> u64 {
    5
}
