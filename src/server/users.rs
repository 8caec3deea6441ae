//! Account endpoints: registration, login, and the authenticated profile.

use axum::extract::State;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::HeaderMap;
use axum::{Form, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::identity::Identity;
use crate::security;
use crate::store::{ProfilePatch, UserRecord};

use super::{AppState, require_identity};

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    email: String,
    password: String,
}

/// Form-encoded login body. The field is called `username` but carries the
/// account email, matching the usual password-grant form shape.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    access_token: String,
    token_type: &'static str,
}

/// Public view of an account; the credential hash never leaves the store
/// layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    email: String,
    created_at: DateTime<Utc>,
    first_name: Option<String>,
    last_name: Option<String>,
    age: Option<u32>,
    phone: Option<String>,
    profile_photo: Option<String>,
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self {
            email: u.email,
            created_at: u.created_at,
            first_name: u.first_name,
            last_name: u.last_name,
            age: u.age,
            phone: u.phone,
            profile_photo: u.profile_photo,
        }
    }
}

// Just enough shape checking to catch obvious typos; real verification
// would need a confirmation mail anyway.
fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(payload) = payload?;
    if !looks_like_email(&payload.email) {
        return Err(ApiError::Validation("invalid email address".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("password must not be empty".into()));
    }
    if state.users.find_by_email(&payload.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".into()));
    }
    let hash =
        security::hash_password(&payload.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    // insert_user re-checks uniqueness, covering a racing registration
    state
        .users
        .insert_user(UserRecord::new(payload.email.clone(), hash))
        .await?;
    info!(target: "hostbook::auth", "registered account {}", payload.email);
    Ok(Json(json!({"message": "User registered successfully"})))
}

pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Form(form) = form?;
    // unknown account and wrong password are indistinguishable on the wire
    let user = state
        .users
        .find_by_email(&form.username)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    if !security::verify_password(&user.password_hash, &form.password) {
        return Err(ApiError::Unauthorized);
    }
    let session = state
        .sessions
        .issue(Identity::new(user.email))
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(TokenResponse { access_token: session.token, token_type: "bearer" }))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<UserResponse>> {
    let identity = require_identity(&state, &headers)?;
    let user = state
        .users
        .find_by_email(&identity.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProfilePatch>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let identity = require_identity(&state, &headers)?;
    let Json(patch) = payload?;
    if !patch.is_empty() && state.users.update_profile(&identity.email, &patch).await? == 0 {
        return Err(ApiError::NotFound("User not found".into()));
    }
    let user = state
        .users
        .find_by_email(&identity.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}
