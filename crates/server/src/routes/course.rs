use crate::{
    auth::Identity,
    dtos::{
        ErrorResponse, MessageResponse,
        course::{CourseResponse, CreateCourseRequest, TrendingQuery, UpdateCourseRequest},
    },
    error::{AppError, AppJson, AppPath, AppQuery},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::course::CourseService;
use sea_orm::prelude::Uuid;

/// Lists the whole catalog
#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "All courses", body = [CourseResponse])
    ),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = CourseService::list(state.store.as_ref()).await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Most viewed courses first
#[utoipa::path(
    get,
    path = "/api/courses/trending",
    params(TrendingQuery),
    responses(
        (status = 200, description = "Courses ordered by views", body = [CourseResponse]),
        (status = 400, description = "Invalid limit", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn trending_courses(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TrendingQuery>,
) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = CourseService::trending(state.store.as_ref(), query.limit).await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Returns a course and counts the view
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CourseResponse>, AppError> {
    let course = CourseService::view(state.store.as_ref(), id).await?;
    Ok(Json(course.into()))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid course", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role cannot manage courses", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    identity: Identity,
    AppJson(body): AppJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), AppError> {
    identity.require_course_manager()?;

    let draft = body
        .into_draft()
        .ok_or_else(|| AppError::validation("creditHoursMin is required"))?;

    let course = CourseService::create(state.store.as_ref(), state.clock.as_ref(), draft).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCourseRequest,
    responses(
        (status = 204, description = "Course updated"),
        (status = 400, description = "Invalid course", body = ErrorResponse),
        (status = 403, description = "Role cannot manage courses", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    identity: Identity,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<UpdateCourseRequest>,
) -> Result<StatusCode, AppError> {
    identity.require_course_manager()?;

    CourseService::update(state.store.as_ref(), id, body.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 403, description = "Role cannot delete courses", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Courses"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    identity: Identity,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    identity.require_course_admin()?;

    CourseService::delete(state.store.as_ref(), id).await?;
    Ok(Json(MessageResponse::new("Course deleted")))
}
