use super::error::ServiceError;
use crate::{clock::Clock, entities::course, store::Store};
use chrono::{DateTime, Utc};
use log::info;
use sea_orm::prelude::Uuid;
use std::collections::HashMap;

/// Everything needed to add a course to the catalog
#[derive(Debug, Clone, Default)]
pub struct CourseDraft {
    pub prefix: String,
    pub number: String,
    pub name: String,
    pub program: Option<String>,
    pub description: Option<String>,
    pub prerequisites: Vec<String>,
    pub credit_hours_min: f64,
    pub credit_hours_max: Option<f64>,
    pub lecture_hours_min: Option<f64>,
    pub date_of_last_revision: Option<DateTime<Utc>>,
    pub learning_objectives: Vec<String>,
    pub topics: Vec<String>,
}

/// Partial update of a course. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
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

impl CoursePatch {
    fn apply(self, course: &mut course::Model) {
        if let Some(prefix) = self.prefix {
            course.prefix = prefix;
        }
        if let Some(number) = self.number {
            course.number = number;
        }
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(program) = self.program {
            course.program = Some(program);
        }
        if let Some(description) = self.description {
            course.description = Some(description);
        }
        if let Some(prerequisites) = self.prerequisites {
            course.prerequisites = prerequisites;
        }
        if let Some(min) = self.credit_hours_min {
            course.credit_hours_min = min;
        }
        if let Some(max) = self.credit_hours_max {
            course.credit_hours_max = Some(max);
        }
        if let Some(lecture) = self.lecture_hours_min {
            course.lecture_hours_min = Some(lecture);
        }
        if let Some(date) = self.date_of_last_revision {
            course.date_of_last_revision = date;
        }
        if let Some(objectives) = self.learning_objectives {
            course.learning_objectives = objectives;
        }
        if let Some(topics) = self.topics {
            course.topics = topics;
        }
    }
}

pub struct CourseService;

impl CourseService {
    /// Upper bound on the trending list
    pub const MAX_TRENDING: u64 = 50;

    pub async fn list(store: &dyn Store) -> Result<Vec<course::Model>, ServiceError> {
        Ok(store.find_courses().await?)
    }

    pub async fn trending(
        store: &dyn Store,
        limit: u64,
    ) -> Result<Vec<course::Model>, ServiceError> {
        let limit = limit.clamp(1, Self::MAX_TRENDING);
        Ok(store.trending_courses(limit).await?)
    }

    /// Looks up the given courses by id, skipping ids no longer in the catalog
    pub async fn find_many(
        store: &dyn Store,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, course::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let courses = store.find_courses_by_ids(ids).await?;
        Ok(courses.into_iter().map(|c| (c.id, c)).collect())
    }

    /// Returns a course for display, counting the view
    pub async fn view(store: &dyn Store, id: Uuid) -> Result<course::Model, ServiceError> {
        store
            .record_course_view(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course not found"))
    }

    pub async fn create(
        store: &dyn Store,
        clock: &dyn Clock,
        draft: CourseDraft,
    ) -> Result<course::Model, ServiceError> {
        let course = course::Model {
            id: Uuid::new_v4(),
            prefix: draft.prefix,
            number: draft.number,
            name: draft.name,
            program: draft.program,
            description: draft.description,
            prerequisites: draft.prerequisites,
            credit_hours_min: draft.credit_hours_min,
            credit_hours_max: draft.credit_hours_max,
            lecture_hours_min: draft.lecture_hours_min,
            date_of_last_revision: draft.date_of_last_revision.unwrap_or_else(|| clock.now()),
            learning_objectives: draft.learning_objectives,
            topics: draft.topics,
            click_count: 0,
        };
        Self::validate(&course)?;

        let course = store.insert_course(course).await?;
        info!(
            "Created course {}-{} ({})",
            course.prefix, course.number, course.id
        );

        Ok(course)
    }

    pub async fn update(
        store: &dyn Store,
        id: Uuid,
        patch: CoursePatch,
    ) -> Result<course::Model, ServiceError> {
        let mut course = store
            .find_course(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course not found"))?;

        patch.apply(&mut course);
        Self::validate(&course)?;

        store
            .update_course(course)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course not found"))
    }

    pub async fn delete(store: &dyn Store, id: Uuid) -> Result<(), ServiceError> {
        if !store.delete_course(id).await? {
            return Err(ServiceError::not_found("Course not found"));
        }

        info!("Deleted course {id}");
        Ok(())
    }

    fn validate(course: &course::Model) -> Result<(), ServiceError> {
        for (field, value) in [
            ("prefix", &course.prefix),
            ("number", &course.number),
            ("name", &course.name),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::validation(format!("{field} is required")));
            }
        }

        let non_negative = |hours: f64| hours.is_finite() && hours >= 0.0;

        if !non_negative(course.credit_hours_min) {
            return Err(ServiceError::validation(
                "creditHoursMin must be a non-negative number",
            ));
        }

        if let Some(max) = course.credit_hours_max
            && (!non_negative(max) || max < course.credit_hours_min)
        {
            return Err(ServiceError::validation(
                "creditHoursMax must not be less than creditHoursMin",
            ));
        }

        if let Some(lecture) = course.lecture_hours_min
            && !non_negative(lecture)
        {
            return Err(ServiceError::validation(
                "lectureHoursMin must be a non-negative number",
            ));
        }

        Ok(())
    }
}
