use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{admins, catalog, public, quiz, users};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router())
        .nest("/users", users::router(state.clone()))
        .nest("/admins", admins::router(state.clone()))
        .nest("/tests", quiz::router(state.clone()))
        .merge(catalog::router(state))
}
