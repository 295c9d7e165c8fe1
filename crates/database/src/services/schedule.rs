//! Schedule lifecycle: creation from the cart, adding cart courses to an
//! existing schedule, and dropping courses, each gated by the term calendar.
//!
//! None of the multi-step operations run in a transaction. A failure while
//! clearing the cart after a schedule was created leaves both the schedule
//! and the cart contents in place, and two concurrent requests for the same
//! student can both pass the existence and cart checks.

use super::error::ServiceError;
use crate::{
    clock::Clock,
    entities::{
        schedule::{self, ScheduleCourse, ScheduleCourses},
        shopping_cart,
    },
    store::Store,
};
use chrono::{DateTime, Utc};
use log::{info, warn};
use models::{course_status::CourseStatus, term::Term};
use sea_orm::prelude::Uuid;

pub struct ScheduleService;

impl ScheduleService {
    pub async fn list(
        store: &dyn Store,
        user_id: Uuid,
        year: i32,
        term: Option<Term>,
    ) -> Result<Vec<schedule::Model>, ServiceError> {
        Ok(store.find_schedules(user_id, year, term).await?)
    }

    /// Loads a schedule owned by `user_id`.
    ///
    /// Someone else's schedule is reported exactly like a missing one.
    pub async fn find_owned(
        store: &dyn Store,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<schedule::Model, ServiceError> {
        store
            .find_schedule(schedule_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Schedule not found."))
    }

    /// Turns the student's cart into a schedule for `term`/`year` and empties the cart
    pub async fn create(
        store: &dyn Store,
        clock: &dyn Clock,
        user_id: Uuid,
        term: Term,
        year: i32,
    ) -> Result<schedule::Model, ServiceError> {
        if store
            .find_schedule_for_term(user_id, term, year)
            .await?
            .is_some()
        {
            return Err(ServiceError::conflict(
                "Schedule for this term already exists.",
            ));
        }

        let dates = term.dates(year)?;
        let now = clock.now();

        if dates.has_started(now) {
            return Err(ServiceError::validation(
                "Cannot create schedule after the term has started.",
            ));
        }

        if dates.has_ended(now) {
            return Err(ServiceError::validation(
                "Cannot create schedule after the term has ended.",
            ));
        }

        let mut cart = Self::non_empty_cart(store, user_id).await?;

        let courses = cart
            .items
            .unique_course_ids()
            .into_iter()
            .map(|course| ScheduleCourse::enrolled(course, now))
            .collect();

        let schedule = store
            .insert_schedule(schedule::Model {
                id: Uuid::new_v4(),
                user_id,
                term,
                year,
                courses: ScheduleCourses(courses),
                created_at: now,
                updated_at: now,
            })
            .await?;

        cart.clear(now);
        if let Err(e) = store.save_cart(cart).await {
            warn!(
                "Schedule {} created but clearing the cart of user {user_id} failed: {e}",
                schedule.id
            );
            return Err(e.into());
        }

        info!(
            "Created {term} {year} schedule {} with {} courses",
            schedule.id,
            schedule.courses.0.len()
        );
        Ok(schedule)
    }

    /// Enrolls every course in the student's cart into an existing schedule.
    ///
    /// Dropped courses are enrolled again. The cart is left as it is.
    pub async fn add_cart_courses(
        store: &dyn Store,
        clock: &dyn Clock,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<schedule::Model, ServiceError> {
        let mut schedule = Self::find_owned(store, schedule_id, user_id).await?;
        let dates = schedule.term.dates(schedule.year)?;
        let now = clock.now();

        if dates.has_started(now) {
            return Err(ServiceError::validation(
                "Cannot add courses after the term has started.",
            ));
        }

        let cart = Self::non_empty_cart(store, user_id).await?;

        enroll_courses(&mut schedule.courses, &cart.items.unique_course_ids(), now)?;
        schedule.updated_at = now;

        Ok(store.save_schedule(schedule).await?)
    }

    /// Marks an enrolled course as dropped, keeping it in the schedule's history
    pub async fn drop_course(
        store: &dyn Store,
        clock: &dyn Clock,
        schedule_id: Uuid,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<schedule::Model, ServiceError> {
        let mut schedule = Self::find_owned(store, schedule_id, user_id).await?;
        let dates = schedule.term.dates(schedule.year)?;
        let now = clock.now();

        if now > dates.end {
            return Err(ServiceError::validation(
                "Cannot drop courses after the term has ended.",
            ));
        }

        let item = schedule
            .courses
            .0
            .iter_mut()
            .find(|item| item.course == course_id && item.status == CourseStatus::Enrolled)
            .ok_or_else(|| {
                ServiceError::not_found("Course not currently enrolled or already dropped.")
            })?;

        item.status = CourseStatus::Dropped;
        schedule.updated_at = now;

        Ok(store.save_schedule(schedule).await?)
    }

    async fn non_empty_cart(
        store: &dyn Store,
        user_id: Uuid,
    ) -> Result<shopping_cart::Model, ServiceError> {
        match store.find_cart(user_id).await? {
            Some(cart) if !cart.items.is_empty() => Ok(cart),
            _ => Err(ServiceError::validation("Your shopping cart is empty.")),
        }
    }
}

/// Merges `course_ids` into a schedule's courses.
///
/// Stops at the first course that is already enrolled or waitlisted. Entries
/// handled before that point stay modified, so callers must discard
/// `courses` on error instead of persisting it.
pub fn enroll_courses(
    courses: &mut ScheduleCourses,
    course_ids: &[Uuid],
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    for &course_id in course_ids {
        match courses.find_mut(course_id) {
            Some(existing) if existing.status == CourseStatus::Dropped => {
                existing.status = CourseStatus::Enrolled;
                existing.added_at = now;
            }
            Some(_) => {
                return Err(ServiceError::conflict("Course already added to schedule."));
            }
            None => courses.0.push(ScheduleCourse::enrolled(course_id, now)),
        }
    }

    Ok(())
}
