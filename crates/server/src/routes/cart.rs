use crate::{
    auth::Identity,
    dtos::{
        ErrorResponse, MessageResponse,
        cart::{CartAddResponse, CartRemoveResponse, CartResponse, InCartResponse},
    },
    error::{AppError, AppPath},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::{cart::CartService, course::CourseService, error::ServiceError};
use sea_orm::prelude::Uuid;

const FEATURE: &str = "Shopping cart";

/// Returns the caller's cart with course details, creating it if needed
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Shopping cart", body = CartResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not a student", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Shopping Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<CartResponse>, AppError> {
    identity.require_student(FEATURE)?;

    let store = state.store.as_ref();
    let cart = CartService::get_or_create(store, state.clock.as_ref(), identity.id()).await?;
    let courses = CourseService::find_many(store, cart.items.unique_course_ids()).await?;

    Ok(Json(CartResponse::populated(cart, &courses)))
}

#[utoipa::path(
    post,
    path = "/api/cart/add/{course_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course to add")
    ),
    responses(
        (status = 200, description = "Course added", body = CartAddResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Course is already in cart", body = CartAddResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Shopping Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    identity: Identity,
    AppPath(course_id): AppPath<Uuid>,
) -> Result<(StatusCode, Json<CartAddResponse>), AppError> {
    identity.require_student(FEATURE)?;

    let result = CartService::add_course(
        state.store.as_ref(),
        state.clock.as_ref(),
        identity.id(),
        course_id,
    )
    .await;

    match result {
        Ok(_) => Ok((
            StatusCode::OK,
            Json(CartAddResponse {
                message: "Course added to cart successfully".to_string(),
                added: true,
            }),
        )),
        Err(ServiceError::Conflict(message)) => Ok((
            StatusCode::CONFLICT,
            Json(CartAddResponse {
                message,
                added: false,
            }),
        )),
        Err(err) => Err(err.into()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/cart/remove/{course_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course to remove")
    ),
    responses(
        (status = 200, description = "Course removed", body = CartRemoveResponse),
        (status = 400, description = "Course is not in cart", body = CartRemoveResponse),
        (status = 404, description = "Shopping cart not found", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Shopping Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    identity: Identity,
    AppPath(course_id): AppPath<Uuid>,
) -> Result<(StatusCode, Json<CartRemoveResponse>), AppError> {
    identity.require_student(FEATURE)?;

    let removed = CartService::remove_course(
        state.store.as_ref(),
        state.clock.as_ref(),
        identity.id(),
        course_id,
    )
    .await?;

    let (status, message) = if removed {
        (StatusCode::OK, "Course removed from cart successfully")
    } else {
        (StatusCode::BAD_REQUEST, "Course is not in cart")
    };

    Ok((
        status,
        Json(CartRemoveResponse {
            message: message.to_string(),
            removed,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart/clear",
    responses(
        (status = 200, description = "Cart emptied", body = MessageResponse),
        (status = 404, description = "Shopping cart not found", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Shopping Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<MessageResponse>, AppError> {
    identity.require_student(FEATURE)?;

    CartService::clear(state.store.as_ref(), state.clock.as_ref(), identity.id()).await?;
    Ok(Json(MessageResponse::new("Shopping cart cleared successfully")))
}

#[utoipa::path(
    get,
    path = "/api/cart/check/{course_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course to look for")
    ),
    responses(
        (status = 200, description = "Whether the course is in the cart", body = InCartResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Shopping Cart"
)]
pub async fn check_cart(
    State(state): State<AppState>,
    identity: Identity,
    AppPath(course_id): AppPath<Uuid>,
) -> Result<Json<InCartResponse>, AppError> {
    identity.require_student(FEATURE)?;

    let in_cart = CartService::has_course(state.store.as_ref(), identity.id(), course_id).await?;
    Ok(Json(InCartResponse { in_cart }))
}
