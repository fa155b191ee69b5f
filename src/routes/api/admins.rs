use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::Role,
    middleware::AdminGuard,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, StaffPage, UserProfile},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AddAdminRequest {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct StaffPageQuery {
    pub limit: u64,
    pub page: u64,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SetGroupRequest {
    pub user_id: Uuid,
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/add", post(add_admin))
        .route("/get", get(list_admins))
        .route("/delete", delete(delete_admin))
        .route("/ban", patch(ban))
        .route("/unban", patch(unban))
        .route("/set-group", patch(set_group))
        .with_state(state)
}

async fn add_admin(
    State(state): State<Arc<AppState>>,
    guard: AdminGuard,
    Json(body): Json<AddAdminRequest>,
) -> ApiResult<UserResponse> {
    let user = ServiceContext::from_state(state.as_ref())
        .admin()
        .grant_role(&guard.caller, &body.email, body.role)
        .await?;
    JsonApiResponse::message(
        format!("Role {} granted, password reset link sent", body.role),
        UserResponse {
            user: UserProfile::from(&user),
        },
    )
}

async fn list_admins(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Query(query): Query<StaffPageQuery>,
) -> ApiResult<StaffPage> {
    let page = ServiceContext::from_state(state.as_ref())
        .admin()
        .list_staff(query.limit, query.page)
        .await?;
    JsonApiResponse::ok(page)
}

async fn delete_admin(
    State(state): State<Arc<AppState>>,
    guard: AdminGuard,
    Query(query): Query<IdQuery>,
) -> ApiResult<()> {
    ServiceContext::from_state(state.as_ref())
        .admin()
        .delete_staff(&guard.caller, query.id)
        .await?;
    JsonApiResponse::message("Admin deleted", ())
}

async fn ban(
    State(state): State<Arc<AppState>>,
    guard: AdminGuard,
    Json(body): Json<TargetRequest>,
) -> ApiResult<UserResponse> {
    let user = ServiceContext::from_state(state.as_ref())
        .admin()
        .ban(&guard.caller, body.id)
        .await?;
    JsonApiResponse::message(
        "User banned",
        UserResponse {
            user: UserProfile::from(&user),
        },
    )
}

async fn unban(
    State(state): State<Arc<AppState>>,
    guard: AdminGuard,
    Json(body): Json<TargetRequest>,
) -> ApiResult<UserResponse> {
    let user = ServiceContext::from_state(state.as_ref())
        .admin()
        .unban(&guard.caller, body.id)
        .await?;
    JsonApiResponse::message(
        "User unbanned, password reset link sent",
        UserResponse {
            user: UserProfile::from(&user),
        },
    )
}

async fn set_group(
    State(state): State<Arc<AppState>>,
    _guard: AdminGuard,
    Json(body): Json<SetGroupRequest>,
) -> ApiResult<UserResponse> {
    let user = ServiceContext::from_state(state.as_ref())
        .admin()
        .set_group(body.user_id, body.group_id)
        .await?;
    JsonApiResponse::ok(UserResponse {
        user: UserProfile::from(&user),
    })
}
