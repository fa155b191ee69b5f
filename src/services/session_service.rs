use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::{
        Role,
        session::{is_session_expired, session_expiry},
    },
    db::{
        dao::{DaoBase, DaoLayerError, SessionTokenDao, UserDao},
        entities::{session_token, user},
    },
    error::AppError,
};

pub const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const EXPIRED_TOKEN: &str = "Token expired";
pub const INSUFFICIENT_ROLE: &str = "Insufficient permissions for this action";

/// A caller that passed the authorization gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: user::Model,
    pub role: Role,
    pub token: String,
}

#[derive(Clone)]
pub struct SessionService {
    session_dao: SessionTokenDao,
    user_dao: UserDao,
}

impl SessionService {
    pub fn new(session_dao: SessionTokenDao, user_dao: UserDao) -> Self {
        Self {
            session_dao,
            user_dao,
        }
    }

    pub async fn issue(&self, user_id: Uuid) -> Result<session_token::Model, AppError> {
        let expires_at = session_expiry(Utc::now().fixed_offset());
        Ok(self.session_dao.issue(user_id, expires_at).await?)
    }

    /// Resolves a bearer token to its user and checks the role requirement.
    pub async fn authenticate(
        &self,
        token: Option<&str>,
        required: Role,
    ) -> Result<AuthenticatedUser, AppError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::unauthorized(MISSING_CREDENTIALS))?;

        let session = self
            .session_dao
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

        let now = Utc::now().fixed_offset();
        if is_session_expired(session.expires_at, now) {
            if let Err(err) = self.session_dao.delete_token(&session.token).await {
                tracing::warn!(error = %err, "failed to drop expired session");
            }
            return Err(AppError::unauthorized(EXPIRED_TOKEN));
        }

        let user = match self.user_dao.find_by_id(session.user_id).await {
            Ok(user) => user,
            Err(DaoLayerError::NotFound { .. }) => {
                return Err(AppError::unauthorized(INVALID_TOKEN));
            }
            Err(err) => return Err(err.into()),
        };

        if user.banned {
            return Err(AppError::forbidden("Account is banned"));
        }
        if !user.is_active {
            return Err(AppError::forbidden("Email not confirmed"));
        }

        let role = user
            .parsed_role()
            .ok_or_else(|| AppError::forbidden(INSUFFICIENT_ROLE))?;
        if !role.satisfies(required) {
            return Err(AppError::forbidden(INSUFFICIENT_ROLE));
        }

        self.user_dao.touch_last_active(user.id, now).await?;

        Ok(AuthenticatedUser {
            user,
            role,
            token: session.token,
        })
    }

    /// Ends one session. Unknown tokens are ignored.
    pub async fn end(&self, token: &str) -> Result<(), AppError> {
        self.session_dao.delete_token(token).await?;
        Ok(())
    }

    pub async fn revoke_all(&self, user_id: Uuid) -> Result<u64, AppError> {
        Ok(self.session_dao.revoke_all_for_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone, Utc};
    use sea_orm::{DatabaseBackend, IntoMockRow, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::{
        auth::Role,
        db::{
            dao::{DaoBase, SessionTokenDao, UserDao},
            entities::{session_token, user},
        },
    };

    use super::{
        EXPIRED_TOKEN, INSUFFICIENT_ROLE, INVALID_TOKEN, MISSING_CREDENTIALS, SessionService,
    };

    struct GateFixtureBuilder {
        mock: MockDatabase,
    }

    impl GateFixtureBuilder {
        fn new() -> Self {
            Self {
                mock: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }

        fn with_query_results<T, I, II>(mut self, sets: II) -> Self
        where
            T: IntoMockRow,
            I: IntoIterator<Item = T>,
            II: IntoIterator<Item = I>,
        {
            self.mock = self.mock.append_query_results(sets);
            self
        }

        fn with_exec_result(mut self, rows_affected: u64) -> Self {
            self.mock = self.mock.append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected,
            }]);
            self
        }

        fn build(self) -> SessionService {
            let db = self.mock.into_connection();
            SessionService::new(SessionTokenDao::new(&db), UserDao::new(&db))
        }
    }

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn session(user_id: Uuid, expires_at: chrono::DateTime<FixedOffset>) -> session_token::Model {
        session_token::Model {
            id: Uuid::new_v4(),
            token: "session-1".to_string(),
            user_id,
            expires_at,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn user_model(id: Uuid, role: Role) -> user::Model {
        user::Model {
            id,
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: None,
            role: role.as_str().to_string(),
            is_active: true,
            banned: false,
            last_active: ts(),
            scores: serde_json::json!({}),
            group_id: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn live() -> chrono::DateTime<FixedOffset> {
        Utc::now().fixed_offset() + Duration::days(1)
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let gate = GateFixtureBuilder::new().build();

        let err = gate
            .authenticate(None, Role::User)
            .await
            .expect_err("gate should reject");
        assert_eq!(err.message(), MISSING_CREDENTIALS);

        let err = gate
            .authenticate(Some("  "), Role::User)
            .await
            .expect_err("gate should reject");
        assert_eq!(err.message(), MISSING_CREDENTIALS);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let gate = GateFixtureBuilder::new()
            .with_query_results([Vec::<session_token::Model>::new()])
            .build();

        let err = gate
            .authenticate(Some("nope"), Role::User)
            .await
            .expect_err("gate should reject");
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_and_dropped() {
        let user_id = Uuid::new_v4();
        let gate = GateFixtureBuilder::new()
            .with_query_results([[session(user_id, Utc::now().fixed_offset() - Duration::hours(1))]])
            .with_exec_result(1)
            .build();

        let err = gate
            .authenticate(Some("session-1"), Role::User)
            .await
            .expect_err("gate should reject");
        assert_eq!(err.message(), EXPIRED_TOKEN);
    }

    #[tokio::test]
    async fn lower_role_is_forbidden() {
        let user_id = Uuid::new_v4();
        let gate = GateFixtureBuilder::new()
            .with_query_results([[session(user_id, live())]])
            .with_query_results([[user_model(user_id, Role::OrgAdmin)]])
            .build();

        let err = gate
            .authenticate(Some("session-1"), Role::Admin)
            .await
            .expect_err("gate should reject");
        assert_eq!(err.message(), INSUFFICIENT_ROLE);
    }

    #[tokio::test]
    async fn banned_user_is_forbidden() {
        let user_id = Uuid::new_v4();
        let mut banned = user_model(user_id, Role::User);
        banned.banned = true;
        let gate = GateFixtureBuilder::new()
            .with_query_results([[session(user_id, live())]])
            .with_query_results([[banned]])
            .build();

        let err = gate
            .authenticate(Some("session-1"), Role::User)
            .await
            .expect_err("gate should reject");
        assert_eq!(err.message(), "Account is banned");
    }

    #[tokio::test]
    async fn higher_role_passes_and_touches_last_active() {
        let user_id = Uuid::new_v4();
        let gate = GateFixtureBuilder::new()
            .with_query_results([[session(user_id, live())]])
            .with_query_results([[user_model(user_id, Role::Dev)]])
            .with_exec_result(1)
            .build();

        let caller = gate
            .authenticate(Some("session-1"), Role::OrgAdmin)
            .await
            .expect("gate should pass");
        assert_eq!(caller.user.id, user_id);
        assert_eq!(caller.role, Role::Dev);
        assert_eq!(caller.token, "session-1");
    }
}
