//! Current-user routes: profile, settings and password change.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, put},
};
use serde::Serialize;
use tracing::info;

use super::auth::user_info;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use spendwise_core::auth::{hash_password, normalize_display_name, validate_password, verify_password};
use spendwise_core::profile::{SettingsUpdate, UserSettings};
use spendwise_db::{ProfileRepository, SessionRepository, UserRecord, UserRepository};
use spendwise_shared::auth::{ChangePasswordRequest, MessageResponse, UpdateProfileRequest, UserInfo};

/// Creates the current-user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/profile", put(update_profile))
        .route("/me/settings", put(update_settings))
        .route("/me/password", put(change_password))
}

/// The signed-in user with their settings.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Account details.
    pub user: UserInfo,
    /// Preferences.
    pub settings: UserSettings,
}

fn current_user(state: &AppState, auth: &AuthUser) -> ApiResult<UserRecord> {
    UserRepository::new(state.store.clone())
        .find_by_id(auth.user_id())?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))
}

/// GET /me
async fn get_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<MeResponse>> {
    let user = current_user(&state, &auth)?;
    let settings = ProfileRepository::new(state.store.clone()).get_or_create(user.id)?;

    Ok(Json(MeResponse {
        user: user_info(&user),
        settings,
    }))
}

/// PUT /me/profile - Change the display name.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<UserInfo>> {
    let Json(payload) = payload?;
    let display_name = normalize_display_name(&payload.display_name)
        .ok_or_else(|| ApiError::validation("Display name must be 1 to 100 characters"))?;

    let user = current_user(&state, &auth)?;
    let updated = UserRepository::new(state.store.clone()).update_display_name(user.id, &display_name)?;

    info!(user_id = %user.id, "Display name updated");
    Ok(Json(user_info(&updated)))
}

/// PUT /me/settings - Partial settings update.
async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> ApiResult<Json<UserSettings>> {
    let Json(update) = payload?;
    let settings = ProfileRepository::new(state.store.clone()).update_settings(auth.user_id(), &update)?;
    Ok(Json(settings))
}

/// PUT /me/password - Change password, given the current one.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    let user = current_user(&state, &auth)?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }
    validate_password(&payload.new_password)?;

    let password_hash = hash_password(&payload.new_password)?;
    UserRepository::new(state.store.clone()).update_password(user.id, &password_hash)?;
    let revoked = SessionRepository::new(state.store.clone()).revoke_all_for_user(user.id);

    info!(user_id = %user.id, revoked, "Password changed");
    Ok(Json(MessageResponse::new("Password updated")))
}
