use crate::{
    auth::Identity,
    dtos::{
        ErrorResponse,
        schedule::{
            CreateScheduleRequest, DropCourseRequest, ScheduleEnvelope, ScheduleQuery,
            ScheduleResponse,
        },
    },
    error::{AppError, AppJson, AppPath, AppQuery},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Datelike;
use database::{
    entities::schedule,
    services::{course::CourseService, schedule::ScheduleService},
    store::Store,
};
use models::term::Term;
use sea_orm::prelude::Uuid;

const FEATURE: &str = "Course schedule";

/// Attaches course documents to the given schedules
async fn populate(
    store: &dyn Store,
    schedules: Vec<schedule::Model>,
) -> Result<Vec<ScheduleResponse>, AppError> {
    let mut ids: Vec<Uuid> = schedules
        .iter()
        .flat_map(|schedule| schedule.courses.iter().map(|item| item.course))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let courses = CourseService::find_many(store, ids).await?;

    Ok(schedules
        .into_iter()
        .map(|schedule| ScheduleResponse::populated(schedule, &courses))
        .collect())
}

async fn envelope(
    store: &dyn Store,
    message: &str,
    schedule: schedule::Model,
) -> Result<Json<ScheduleEnvelope>, AppError> {
    let schedule = populate(store, vec![schedule])
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("populated schedule went missing"))?;

    Ok(Json(ScheduleEnvelope {
        message: message.to_string(),
        schedule,
    }))
}

/// Lists the caller's schedules for a year, optionally for a single term
#[utoipa::path(
    get,
    path = "/api/schedules",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Schedules of the caller", body = [ScheduleResponse]),
        (status = 400, description = "Term is invalid", body = ErrorResponse),
        (status = 403, description = "Not a student", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Schedules"
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    identity: Identity,
    AppQuery(query): AppQuery<ScheduleQuery>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    identity.require_student(FEATURE)?;

    let term = query
        .term
        .filter(|term| !term.is_empty())
        .map(|term| Term::parse(&term))
        .transpose()
        .map_err(|_| AppError::validation("Term is invalid"))?;
    let year = query
        .year
        .and_then(|year| year.trim().parse::<i32>().ok())
        .filter(|&year| year != 0)
        .unwrap_or_else(|| state.clock.now().year());

    let store = state.store.as_ref();
    let schedules = ScheduleService::list(store, identity.id(), year, term).await?;

    Ok(Json(populate(store, schedules).await?))
}

/// Turns the caller's cart into a schedule for an upcoming term
#[utoipa::path(
    post,
    path = "/api/schedules",
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Schedule created and cart emptied", body = ScheduleEnvelope),
        (status = 400, description = "Invalid term, term already started, or empty cart", body = ErrorResponse),
        (status = 409, description = "Schedule for this term already exists", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Schedules"
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(body): AppJson<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleEnvelope>), AppError> {
    identity.require_student(FEATURE)?;

    let (Some(term), Some(year)) = (body.term.filter(|t| !t.is_empty()), body.year) else {
        return Err(AppError::validation("Term and year are required."));
    };
    let term = Term::parse(&term).map_err(|_| AppError::validation("Invalid term provided."))?;

    let store = state.store.as_ref();
    let schedule =
        ScheduleService::create(store, state.clock.as_ref(), identity.id(), term, year).await?;

    let body = envelope(store, "Schedule created successfully.", schedule).await?;
    Ok((StatusCode::CREATED, body))
}

#[utoipa::path(
    get,
    path = "/api/schedules/{schedule_id}",
    params(
        ("schedule_id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Schedule found", body = ScheduleResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Schedules"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    identity: Identity,
    AppPath(schedule_id): AppPath<Uuid>,
) -> Result<Json<ScheduleResponse>, AppError> {
    identity.require_student(FEATURE)?;

    let store = state.store.as_ref();
    let schedule = ScheduleService::find_owned(store, schedule_id, identity.id()).await?;

    let schedule = populate(store, vec![schedule])
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("populated schedule went missing"))?;
    Ok(Json(schedule))
}

/// Enrolls the caller's cart courses into an existing schedule. The cart is kept.
#[utoipa::path(
    post,
    path = "/api/schedules/{schedule_id}/add",
    params(
        ("schedule_id" = Uuid, Path, description = "Schedule ID")
    ),
    responses(
        (status = 200, description = "Courses added", body = ScheduleEnvelope),
        (status = 400, description = "Term already started or empty cart", body = ErrorResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse),
        (status = 409, description = "Course already added to schedule", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Schedules"
)]
pub async fn add_to_schedule(
    State(state): State<AppState>,
    identity: Identity,
    AppPath(schedule_id): AppPath<Uuid>,
) -> Result<Json<ScheduleEnvelope>, AppError> {
    identity.require_student(FEATURE)?;

    let store = state.store.as_ref();
    let schedule =
        ScheduleService::add_cart_courses(store, state.clock.as_ref(), schedule_id, identity.id())
            .await?;

    envelope(store, "Course added successfully.", schedule).await
}

/// Marks an enrolled course as dropped
#[utoipa::path(
    post,
    path = "/api/schedules/{schedule_id}/drop",
    params(
        ("schedule_id" = Uuid, Path, description = "Schedule ID")
    ),
    request_body = DropCourseRequest,
    responses(
        (status = 200, description = "Course dropped", body = ScheduleEnvelope),
        (status = 400, description = "Missing course ID or term already ended", body = ErrorResponse),
        (status = 404, description = "Schedule not found or course not enrolled", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Schedules"
)]
pub async fn drop_from_schedule(
    State(state): State<AppState>,
    identity: Identity,
    AppPath(schedule_id): AppPath<Uuid>,
    AppJson(body): AppJson<DropCourseRequest>,
) -> Result<Json<ScheduleEnvelope>, AppError> {
    identity.require_student(FEATURE)?;

    let course_id = body
        .course_id
        .ok_or_else(|| AppError::validation("Course ID is required."))?;

    let store = state.store.as_ref();
    let schedule = ScheduleService::drop_course(
        store,
        state.clock.as_ref(),
        schedule_id,
        identity.id(),
        course_id,
    )
    .await?;

    envelope(store, "Course dropped.", schedule).await
}
