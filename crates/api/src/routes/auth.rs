//! Authentication routes: registration, login, token refresh, logout and password reset.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};
use spendwise_core::auth::{
    hash_password, normalize_display_name, normalize_email, validate_password, verify_password,
};
use spendwise_db::{
    PasswordResetRepository, ProfileRepository, SessionRepository, UserRecord, UserRepository,
};
use spendwise_shared::{
    AppError, TokenKind,
    auth::{
        LoginRequest, LoginResponse, LogoutRequest, MessageResponse, PasswordResetConfirm,
        PasswordResetRequest, RefreshRequest, RefreshResponse, RegisterRequest, UserInfo,
    },
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/password-reset", post(request_password_reset))
        .route("/auth/password-reset/confirm", post(confirm_password_reset))
}

/// Public view of a stored user.
pub(crate) fn user_info(user: &UserRecord) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        display_name: user.display_name.clone(),
    }
}

/// Issues an access/refresh pair and records the refresh session.
fn start_session(state: &AppState, user: &UserRecord) -> ApiResult<LoginResponse> {
    let access = state.jwt_service.generate_access_token(user.id)?;
    let refresh = state.jwt_service.generate_refresh_token(user.id)?;

    SessionRepository::new(state.store.clone()).create(
        user.id,
        &refresh.token,
        refresh.expires_at(),
    )?;

    Ok(LoginResponse {
        user: user_info(user),
        access_token: access.token,
        refresh_token: refresh.token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

/// POST /auth/register - Create an account and sign in.
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;

    let email = normalize_email(&payload.email)
        .ok_or_else(|| ApiError::validation("Invalid email address"))?;
    let display_name = normalize_display_name(&payload.display_name)
        .ok_or_else(|| ApiError::validation("Display name must be 1 to 100 characters"))?;
    validate_password(&payload.password)?;

    let user_repo = UserRepository::new(state.store.clone());
    if user_repo.email_exists(&email) {
        return Err(ApiError(AppError::Conflict(
            "An account with this email already exists".to_string(),
        )));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = user_repo.create(&email, &password_hash, &display_name)?;
    ProfileRepository::new(state.store.clone()).get_or_create(user.id)?;

    info!(user_id = %user.id, "New user registered");

    let response = start_session(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - Authenticate and return tokens.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) = payload?;

    let user_repo = UserRepository::new(state.store.clone());
    let Some(user) = user_repo.find_by_email(&payload.email)? else {
        info!("Login attempt for non-existent user");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let response = start_session(&state, &user)?;
    info!(user_id = %user.id, "User logged in successfully");
    Ok(Json(response))
}

/// POST /auth/refresh - Exchange a live refresh token for a new access token.
async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<RefreshResponse>> {
    let Json(payload) = payload?;

    let claims = state
        .jwt_service
        .validate_kind(&payload.refresh_token, TokenKind::Refresh)?;

    let sessions = SessionRepository::new(state.store.clone());
    if sessions
        .find_active_by_token(&payload.refresh_token)?
        .is_none()
    {
        return Err(ApiError::unauthorized("Session has been revoked"));
    }

    let access = state.jwt_service.generate_access_token(claims.user_id())?;
    Ok(Json(RefreshResponse {
        access_token: access.token,
        expires_in: state.jwt_service.access_token_expires_in(),
    }))
}

/// POST /auth/logout - Revoke a refresh session. Unknown tokens are not an error.
async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<LogoutRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;

    let revoked = SessionRepository::new(state.store.clone()).revoke_by_token(&payload.refresh_token)?;
    if revoked {
        info!("Session revoked on logout");
    }
    Ok(Json(MessageResponse::new("Logged out")))
}

/// POST /auth/password-reset - Email a reset link if the account exists.
///
/// Always answers 202 so the response does not reveal which emails are registered.
async fn request_password_reset(
    State(state): State<AppState>,
    payload: Result<Json<PasswordResetRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let accepted = (
        StatusCode::ACCEPTED,
        Json(MessageResponse::new(
            "If an account exists for this email, a reset link has been sent",
        )),
    );

    let user = match UserRepository::new(state.store.clone()).find_by_email(&payload.email) {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(accepted),
        Err(e) => {
            warn!(error = %e, "User lookup failed during password reset");
            return Ok(accepted);
        }
    };

    let token = PasswordResetRepository::new(state.store.clone()).create_token(user.id);
    if let Err(e) = state
        .email_service
        .send_password_reset_email(&user.email, &user.display_name, &token)
        .await
    {
        warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
    }

    Ok(accepted)
}

/// POST /auth/password-reset/confirm - Set a new password with a reset token.
async fn confirm_password_reset(
    State(state): State<AppState>,
    payload: Result<Json<PasswordResetConfirm>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    validate_password(&payload.new_password)?;

    let Some(user_id) =
        PasswordResetRepository::new(state.store.clone()).consume_token(&payload.token)?
    else {
        return Err(ApiError::validation("Invalid or expired reset token"));
    };

    let password_hash = hash_password(&payload.new_password)?;
    UserRepository::new(state.store.clone()).update_password(user_id, &password_hash)?;
    let revoked = SessionRepository::new(state.store.clone()).revoke_all_for_user(user_id);

    info!(user_id = %user_id, revoked, "Password reset completed");
    Ok(Json(MessageResponse::new("Password has been reset")))
}
