use crate::{
    auth::{AuthFailure, Authenticator, authenticate},
    dtos::{
        ErrorResponse,
        user::{LoginRequest, TokenResponse},
    },
    error::{AppError, AppJson},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use database::services::user::UserService;
use log::info;

/// Exchanges a username and password for a token
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Unknown user or wrong password", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let (Some(username), Some(password)) = (
        body.username.filter(|u| !u.is_empty()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("Missing username or password"));
    };

    let rejected = || AppError::unauthorized("Failed to authenticate.");

    let user = UserService::find_by_username(state.store.as_ref(), &username)
        .await?
        .ok_or_else(rejected)?;

    if !Authenticator::verify_password(password, user.password.clone()).await? {
        return Err(rejected());
    }

    let token = state.auth.create_token(user.id, state.clock.now())?;
    info!("User {} logged in", user.username);

    Ok(Json(TokenResponse {
        user_id: user.id,
        token,
    }))
}

/// Checks whether the token in the `x-auth` header is still usable
#[utoipa::path(
    get,
    path = "/api/auth/status",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 400, description = "Missing x-auth header", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Authentication"
)]
pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    match authenticate(&state, &headers).await {
        Ok(_) => Ok(StatusCode::OK),
        Err(AuthFailure::MissingToken) => Err(AppError::validation("Missing x-auth header")),
        Err(AuthFailure::InvalidToken) => Err(AppError::unauthorized("Invalid or expired token")),
        Err(AuthFailure::Internal(err)) => Err(err),
    }
}
