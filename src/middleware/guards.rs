use std::{marker::PhantomData, sync::Arc};

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::{AdminRole, DevRole, OrgAdminRole, RequiredRole, UserRole, session::SESSION_COOKIE},
    error::AppError,
    services::{AuthenticatedUser, ServiceContext},
    state::AppState,
};

/// Session tokens offered by the request: the `token` cookie first, then a
/// bearer header when it carries a different value.
pub fn session_tokens_from_parts(parts: &Parts) -> Vec<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    let cookie = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let mut tokens: Vec<String> = cookie.into_iter().collect();
    if let Some(bearer) = bearer.filter(|bearer| !tokens.contains(bearer)) {
        tokens.push(bearer);
    }
    tokens
}

// Authorization gate: resolves the session and enforces the minimum role.
pub struct AuthRoleGuard<R: RequiredRole> {
    pub caller: AuthenticatedUser,
    _marker: PhantomData<R>,
}

impl<R> FromRequestParts<Arc<AppState>> for AuthRoleGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let sessions = ServiceContext::from_state(state.as_ref()).sessions();
        let mut tokens = session_tokens_from_parts(parts).into_iter();

        // A stale cookie must not shadow a valid bearer token.
        let mut resolved = sessions
            .authenticate(tokens.next().as_deref(), R::required())
            .await;
        for token in tokens {
            if !matches!(resolved, Err(AppError::Unauthorized(_))) {
                break;
            }
            resolved = sessions.authenticate(Some(&token), R::required()).await;
        }
        let caller = resolved?;

        Ok(Self {
            caller,
            _marker: PhantomData,
        })
    }
}

pub type UserGuard = AuthRoleGuard<UserRole>;
pub type OrgAdminGuard = AuthRoleGuard<OrgAdminRole>;
pub type DevGuard = AuthRoleGuard<DevRole>;
pub type AdminGuard = AuthRoleGuard<AdminRole>;

#[cfg(test)]
mod tests {
    use axum::http::{Request, header};

    use super::session_tokens_from_parts;

    fn request_parts(builder: axum::http::request::Builder) -> axum::http::request::Parts {
        builder
            .body(())
            .expect("request should build")
            .into_parts()
            .0
    }

    #[test]
    fn cookie_comes_before_bearer_header() {
        let parts = request_parts(
            Request::builder()
                .header(header::COOKIE, "theme=dark; token=from-cookie")
                .header(header::AUTHORIZATION, "Bearer from-header"),
        );
        assert_eq!(
            session_tokens_from_parts(&parts),
            vec!["from-cookie".to_string(), "from-header".to_string()]
        );
    }

    #[test]
    fn same_token_in_both_places_is_offered_once() {
        let parts = request_parts(
            Request::builder()
                .header(header::COOKIE, "token=abc")
                .header(header::AUTHORIZATION, "Bearer abc"),
        );
        assert_eq!(session_tokens_from_parts(&parts), vec!["abc".to_string()]);
    }

    #[test]
    fn bearer_header_is_used_without_cookie() {
        let parts = request_parts(Request::builder().header(header::AUTHORIZATION, "Bearer abc"));
        assert_eq!(session_tokens_from_parts(&parts), vec!["abc".to_string()]);

        let parts = request_parts(Request::builder().header(header::AUTHORIZATION, "Basic abc"));
        assert!(session_tokens_from_parts(&parts).is_empty());
    }
}
