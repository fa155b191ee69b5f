use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::{group, group::Place, speciality},
    error::AppError,
    middleware::OrgAdminGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateSpecialityRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub place: Place,
    pub speciality_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SpecialityView {
    pub id: Uuid,
    pub name: String,
}

impl From<speciality::Model> for SpecialityView {
    fn from(speciality: speciality::Model) -> Self {
        Self {
            id: speciality.id,
            name: speciality.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub id: Uuid,
    pub place: Place,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speciality_id: Option<Uuid>,
}

impl TryFrom<group::Model> for GroupView {
    type Error = AppError;

    fn try_from(group: group::Model) -> Result<Self, Self::Error> {
        let place = Place::try_from(group.place.as_str())
            .map_err(|_| AppError::internal(format!("Unknown stored place {}", group.place)))?;
        Ok(Self {
            id: group.id,
            place,
            speciality_id: group.speciality_id,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SpecialityList {
    pub specialities: Vec<SpecialityView>,
}

#[derive(Debug, Serialize)]
pub struct GroupList {
    pub groups: Vec<GroupView>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/specialities/get-all", get(list_specialities))
        .route("/specialities/create", post(create_speciality))
        .route("/groups/get-all", get(list_groups))
        .route("/groups/create", post(create_group))
        .with_state(state)
}

async fn list_specialities(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
) -> ApiResult<SpecialityList> {
    let specialities = ServiceContext::from_state(state.as_ref())
        .catalog()
        .list_specialities()
        .await?;
    JsonApiResponse::ok(SpecialityList {
        specialities: specialities.into_iter().map(SpecialityView::from).collect(),
    })
}

async fn create_speciality(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
    Json(body): Json<CreateSpecialityRequest>,
) -> ApiResult<SpecialityView> {
    let speciality = ServiceContext::from_state(state.as_ref())
        .catalog()
        .create_speciality(&body.name)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Speciality created", speciality.into())
}

async fn list_groups(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
) -> ApiResult<GroupList> {
    let groups = ServiceContext::from_state(state.as_ref())
        .catalog()
        .list_groups()
        .await?
        .into_iter()
        .map(GroupView::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    JsonApiResponse::ok(GroupList { groups })
}

async fn create_group(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
    Json(body): Json<CreateGroupRequest>,
) -> ApiResult<GroupView> {
    let group = ServiceContext::from_state(state.as_ref())
        .catalog()
        .create_group(body.place, body.speciality_id)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Group created", group.try_into()?)
}
