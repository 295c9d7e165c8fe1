use crate::{
    auth::{Authenticator, Identity},
    dtos::{
        ErrorResponse,
        user::{RegisterRequest, TokenResponse, UserResponse},
    },
    error::{AppError, AppJson},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::user::{NewUser, UserService};

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Creates an account and signs it in
#[utoipa::path(
    post,
    path = "/api/user",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Missing fields or a role that cannot be self-assigned", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let (Some(username), Some(password), Some(first_name), Some(last_name), Some(email)) = (
        required(body.username),
        required(body.password),
        required(body.first_name),
        required(body.last_name),
        required(body.email),
    ) else {
        return Err(AppError::validation("Invalid request"));
    };

    let role = UserService::registration_role(body.role.as_deref().filter(|r| !r.is_empty()))?;

    let store = state.store.as_ref();
    UserService::ensure_username_available(store, &username).await?;

    let password_hash = Authenticator::hash_password(password).await?;

    let user = UserService::create_user(
        store,
        state.clock.as_ref(),
        NewUser {
            username,
            first_name,
            last_name,
            email,
            password_hash,
            status: body.status,
            role,
        },
    )
    .await?;

    let token = state.auth.create_token(user.id, state.clock.now())?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            user_id: user.id,
            token,
        }),
    ))
}

/// Returns the profile of the calling user
#[utoipa::path(
    get,
    path = "/api/user/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("x-auth" = [])
    ),
    tag = "Users"
)]
pub async fn me(identity: Identity) -> Json<UserResponse> {
    Json(identity.user.into())
}
