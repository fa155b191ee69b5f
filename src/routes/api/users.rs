use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::session::SESSION_COOKIE,
    error::AppError,
    middleware::UserGuard,
    response::{ApiResult, JsonApiResponse},
    services::{RegisterInput, ServiceContext, UserProfile},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    #[serde(default)]
    pub captcha_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<FixedOffset>,
    pub user: UserProfile,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/confirm-email", post(confirm_email))
        .route("/reset-password", post(reset_password))
        .route("/get", get(profile))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<RegisteredResponse> {
    let user = ServiceContext::from_state(state.as_ref())
        .accounts()
        .register(RegisterInput {
            email: body.email,
            password: body.password,
            name: body.name,
            captcha_token: body.captcha_token,
        })
        .await?;
    JsonApiResponse::with_status(
        StatusCode::CREATED,
        "Confirmation link sent to your email",
        RegisteredResponse {
            id: user.id,
            email: user.email,
        },
    )
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, JsonApiResponse<LoginResponse>), AppError> {
    let outcome = ServiceContext::from_state(state.as_ref())
        .accounts()
        .login(&body.email, &body.password)
        .await?;

    let expires = OffsetDateTime::from_unix_timestamp(outcome.session.expires_at.timestamp())
        .map_err(|err| AppError::internal(format!("Invalid session expiry: {err}")))?;
    let cookie = Cookie::build((SESSION_COOKIE, outcome.session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .expires(expires);

    let response = JsonApiResponse::message(
        "Logged in",
        LoginResponse {
            token: outcome.session.token,
            expires_at: outcome.session.expires_at,
            user: UserProfile::from(&outcome.user),
        },
    )?;
    Ok((jar.add(cookie), response))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    guard: UserGuard,
    jar: CookieJar,
) -> Result<(CookieJar, JsonApiResponse<()>), AppError> {
    ServiceContext::from_state(state.as_ref())
        .accounts()
        .logout(&guard.caller)
        .await?;
    let response = JsonApiResponse::message("Logged out", ())?;
    Ok((jar.remove(Cookie::build(SESSION_COOKIE).path("/")), response))
}

async fn confirm_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ConfirmRequest>,
) -> ApiResult<()> {
    ServiceContext::from_state(state.as_ref())
        .accounts()
        .confirm_email(&body.email, &body.token)
        .await?;
    JsonApiResponse::message("Email confirmed", ())
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<()> {
    ServiceContext::from_state(state.as_ref())
        .accounts()
        .reset_password(&body.email, &body.token, &body.password)
        .await?;
    JsonApiResponse::message("Password updated", ())
}

async fn profile(
    State(state): State<Arc<AppState>>,
    guard: UserGuard,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<UserProfile> {
    let profile = ServiceContext::from_state(state.as_ref())
        .accounts()
        .profile(&guard.caller, query.id)
        .await?;
    JsonApiResponse::ok(profile)
}
