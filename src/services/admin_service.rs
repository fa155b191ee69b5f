use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{ConfirmationPurpose, Role, password::scrambled_password_hash},
    db::{
        dao::{DaoBase, DaoContext, DaoLayerError},
        entities::user,
    },
    error::AppError,
    services::{AuthenticatedUser, NotificationService, SessionService, UserProfile},
};

pub const USER_NOT_FOUND: &str = "User not found";
pub const ADMIN_NOT_FOUND: &str = "Admin not found";
pub const PAGE_NOT_FOUND: &str = "Page not found";

#[derive(Debug, Serialize)]
pub struct StaffPage {
    pub users: Vec<UserProfile>,
    pub total_pages: u64,
    pub page: u64,
}

#[derive(Clone)]
pub struct AdminService {
    daos: DaoContext,
    sessions: SessionService,
    notifications: NotificationService,
}

impl AdminService {
    pub fn new(
        daos: DaoContext,
        sessions: SessionService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            daos,
            sessions,
            notifications,
        }
    }

    /// Gives `role` to the account behind `email`.
    ///
    /// The old password stops working and every session is dropped; the
    /// account owner receives a reset link.
    pub async fn grant_role(
        &self,
        caller: &AuthenticatedUser,
        email: &str,
        role: Role,
    ) -> Result<user::Model, AppError> {
        if !caller.role.satisfies(role) {
            return Err(AppError::forbidden("Cannot grant a role above your own"));
        }

        let user_dao = self.daos.user();
        let target = user_dao
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        ensure_outranks_or_equal(caller, &target)?;

        let password_hash = scrambled_password_hash()?;
        let target = user_dao
            .save_with(target, move |active| {
                active.role = Set(role.as_str().to_string());
                active.password_hash = Set(password_hash);
            })
            .await?;
        self.sessions.revoke_all(target.id).await?;
        self.notifications
            .send_confirmation(&target, ConfirmationPurpose::RoleGranted(role))
            .await?;

        tracing::info!(
            admin_id = %caller.user.id,
            user_id = %target.id,
            role = %role,
            "role granted"
        );
        Ok(target)
    }

    /// One page of accounts holding a role above `user`.
    pub async fn list_staff(&self, limit: u64, page: u64) -> Result<StaffPage, AppError> {
        if limit == 0 || page == 0 {
            return Err(AppError::bad_request("limit and page must be at least 1"));
        }

        let user_dao = self.daos.user();
        let total = user_dao.count_staff().await?;
        let total_pages = total.div_ceil(limit);
        if page > total_pages {
            return Err(AppError::not_found(PAGE_NOT_FOUND));
        }

        let found = user_dao.find_staff_page(page, limit).await?;
        if found.data.is_empty() {
            return Err(AppError::not_found(PAGE_NOT_FOUND));
        }

        Ok(StaffPage {
            users: found.data.iter().map(UserProfile::from).collect(),
            total_pages,
            page,
        })
    }

    /// Removes a staff account along with its sessions and pending confirmations.
    pub async fn delete_staff(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<(), AppError> {
        let user_dao = self.daos.user();
        let target = user_dao
            .find_staff_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ADMIN_NOT_FOUND))?;
        ensure_outranks_or_equal(caller, &target)?;

        self.sessions.revoke_all(target.id).await?;
        self.daos.confirm_request().delete_for_user(target.id).await?;
        user_dao.delete(target.id).await?;

        tracing::info!(admin_id = %caller.user.id, user_id = %target.id, "staff account deleted");
        Ok(())
    }

    pub async fn ban(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<user::Model, AppError> {
        if caller.user.id == id {
            return Err(AppError::bad_request("Cannot ban yourself"));
        }

        let user_dao = self.daos.user();
        let target = find_user(&self.daos, id).await?;
        ensure_outranks_or_equal(caller, &target)?;

        let password_hash = scrambled_password_hash()?;
        let target = user_dao
            .save_with(target, move |active| {
                active.banned = Set(true);
                active.role = Set(Role::User.as_str().to_string());
                active.password_hash = Set(password_hash);
            })
            .await?;
        let revoked = self.sessions.revoke_all(target.id).await?;

        tracing::info!(
            admin_id = %caller.user.id,
            user_id = %target.id,
            revoked,
            "user banned"
        );
        Ok(target)
    }

    pub async fn unban(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<user::Model, AppError> {
        let user_dao = self.daos.user();
        let target = user_dao
            .find_banned_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Banned user not found"))?;

        let target = user_dao
            .save_with(target, |active| {
                active.banned = Set(false);
            })
            .await?;
        self.notifications
            .send_confirmation(&target, ConfirmationPurpose::PasswordResetAfterUnban)
            .await?;

        tracing::info!(admin_id = %caller.user.id, user_id = %target.id, "user unbanned");
        Ok(target)
    }

    /// Places a user in a group, or removes them from one when `group_id` is `None`.
    pub async fn set_group(
        &self,
        user_id: Uuid,
        group_id: Option<Uuid>,
    ) -> Result<user::Model, AppError> {
        if let Some(group_id) = group_id {
            match self.daos.group().find_by_id(group_id).await {
                Ok(_) => {}
                Err(DaoLayerError::NotFound { .. }) => {
                    return Err(AppError::bad_request("Unknown group"));
                }
                Err(err) => return Err(err.into()),
            }
        }

        let target = find_user(&self.daos, user_id).await?;
        Ok(self
            .daos
            .user()
            .save_with(target, move |active| {
                active.group_id = Set(group_id);
            })
            .await?)
    }
}

async fn find_user(daos: &DaoContext, id: Uuid) -> Result<user::Model, AppError> {
    daos.user().find_by_id(id).await.map_err(|err| match err {
        DaoLayerError::NotFound { .. } => AppError::not_found(USER_NOT_FOUND),
        other => other.into(),
    })
}

fn ensure_outranks_or_equal(caller: &AuthenticatedUser, target: &user::Model) -> Result<(), AppError> {
    let target_role = target.parsed_role().unwrap_or(Role::User);
    if caller.role.satisfies(target_role) {
        Ok(())
    } else {
        Err(AppError::forbidden("Target account outranks you"))
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Arc};

    use chrono::{Duration, FixedOffset, TimeZone, Utc};
    use sea_orm::{
        DatabaseBackend, DatabaseConnection, IntoMockRow, MockDatabase, MockExecResult, Value,
    };
    use uuid::Uuid;

    use crate::{
        auth::Role,
        config::AppConfig,
        db::entities::{confirm_request, session_token, user},
        error::AppError,
        integrations::{DisabledCaptcha, LogMailer},
        services::{AuthenticatedUser, ServiceContext},
    };

    use super::{ADMIN_NOT_FOUND, AdminService, PAGE_NOT_FOUND, USER_NOT_FOUND};

    struct AdminFixtureBuilder {
        mock: MockDatabase,
    }

    impl AdminFixtureBuilder {
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

        fn with_count(self, count: i64) -> Self {
            self.with_query_results([[BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(count)),
            )])]])
        }

        fn with_exec_result(mut self, rows_affected: u64) -> Self {
            self.mock = self.mock.append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected,
            }]);
            self
        }

        fn build(self) -> AdminService {
            self.build_context().0.admin()
        }

        fn build_context(self) -> (ServiceContext, DatabaseConnection) {
            let db = self.mock.into_connection();
            let services = ServiceContext::new(
                &db,
                &AppConfig::default(),
                Arc::new(LogMailer),
                Arc::new(DisabledCaptcha),
            );
            (services, db)
        }
    }

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid, role: Role) -> user::Model {
        user::Model {
            id,
            email: format!("{id}@example.com"),
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

    fn caller(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user: user_model(Uuid::new_v4(), role),
            role,
            token: "session-1".to_string(),
        }
    }

    #[tokio::test]
    async fn list_staff_reports_last_partial_page() {
        let staff: Vec<user::Model> = (0..5)
            .map(|_| user_model(Uuid::new_v4(), Role::OrgAdmin))
            .collect();
        let service = AdminFixtureBuilder::new()
            .with_count(25)
            .with_query_results([staff])
            .build();

        let page = service
            .list_staff(10, 3)
            .await
            .expect("listing should succeed");
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.users.len(), 5);
    }

    #[tokio::test]
    async fn list_staff_rejects_page_past_the_end() {
        let service = AdminFixtureBuilder::new().with_count(25).build();

        let err = service
            .list_staff(10, 4)
            .await
            .expect_err("listing should fail");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), PAGE_NOT_FOUND);
    }

    #[tokio::test]
    async fn list_staff_rejects_zero_limit() {
        let service = AdminFixtureBuilder::new().build();

        let err = service
            .list_staff(0, 1)
            .await
            .expect_err("listing should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn list_staff_rejects_oversized_pages() {
        let service = AdminFixtureBuilder::new().with_count(300).build();

        let err = service
            .list_staff(101, 1)
            .await
            .expect_err("listing should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn grant_role_refuses_roles_above_the_caller() {
        let service = AdminFixtureBuilder::new().build();

        let err = service
            .grant_role(&caller(Role::Admin), "bob@example.com", Role::RootAdmin)
            .await
            .expect_err("grant should fail");
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn grant_role_requires_known_email() {
        let service = AdminFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .build();

        let err = service
            .grant_role(&caller(Role::Admin), "ghost@example.com", Role::OrgAdmin)
            .await
            .expect_err("grant should fail");
        assert_eq!(err.message(), USER_NOT_FOUND);
    }

    #[tokio::test]
    async fn grant_role_resets_credentials_and_notifies() {
        let target_id = Uuid::new_v4();
        let target = user_model(target_id, Role::User);
        let promoted = user_model(target_id, Role::Dev);
        let service = AdminFixtureBuilder::new()
            .with_query_results([[target]])
            .with_query_results([[promoted]])
            .with_exec_result(2)
            .with_exec_result(0)
            .with_query_results([[confirm_request::Model {
                id: Uuid::new_v4(),
                token: "reset-1".to_string(),
                user_id: target_id,
                created_at: ts(),
                updated_at: ts(),
            }]])
            .build();

        let updated = service
            .grant_role(&caller(Role::Admin), "bob@example.com", Role::Dev)
            .await
            .expect("grant should succeed");
        assert_eq!(updated.parsed_role(), Some(Role::Dev));
    }

    #[tokio::test]
    async fn delete_staff_requires_non_base_role() {
        let service = AdminFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .build();

        let err = service
            .delete_staff(&caller(Role::Admin), Uuid::new_v4())
            .await
            .expect_err("delete should fail");
        assert_eq!(err.message(), ADMIN_NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_staff_cascades_owned_rows() {
        let target_id = Uuid::new_v4();
        let service = AdminFixtureBuilder::new()
            .with_query_results([[user_model(target_id, Role::OrgAdmin)]])
            .with_exec_result(3)
            .with_exec_result(1)
            .with_exec_result(1)
            .build();

        service
            .delete_staff(&caller(Role::Admin), target_id)
            .await
            .expect("delete should succeed");
    }

    #[tokio::test]
    async fn ban_refuses_self_and_higher_ranks() {
        let admin = caller(Role::Admin);
        let service = AdminFixtureBuilder::new()
            .with_query_results([[user_model(Uuid::new_v4(), Role::RootAdmin)]])
            .build();

        let err = service
            .ban(&admin, admin.user.id)
            .await
            .expect_err("self ban should fail");
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = service
            .ban(&admin, Uuid::new_v4())
            .await
            .expect_err("ban should fail");
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn ban_demotes_and_revokes_sessions() {
        let target_id = Uuid::new_v4();
        let mut banned = user_model(target_id, Role::User);
        banned.banned = true;
        let (services, db) = AdminFixtureBuilder::new()
            .with_query_results([[user_model(target_id, Role::OrgAdmin)]])
            .with_query_results([[banned]])
            .with_exec_result(2)
            .build_context();

        let updated = services
            .admin()
            .ban(&caller(Role::Admin), target_id)
            .await
            .expect("ban should succeed");
        assert!(updated.banned);
        assert_eq!(updated.parsed_role(), Some(Role::User));

        let revocations = db
            .into_transaction_log()
            .into_iter()
            .flat_map(|txn| txn.statements().to_vec())
            .filter(|stmt| stmt.sql.starts_with(r#"DELETE FROM "tokens""#))
            .count();
        assert_eq!(revocations, 1);
    }

    #[tokio::test]
    async fn banned_user_session_no_longer_passes_gate() {
        let target_id = Uuid::new_v4();
        let mut banned = user_model(target_id, Role::User);
        banned.banned = true;
        let (services, _db) = AdminFixtureBuilder::new()
            .with_query_results([[user_model(target_id, Role::OrgAdmin)]])
            .with_query_results([[banned.clone()]])
            .with_exec_result(1)
            .with_query_results([Vec::<session_token::Model>::new()])
            .with_query_results([[session_token::Model {
                id: Uuid::new_v4(),
                token: "in-flight".to_string(),
                user_id: target_id,
                expires_at: Utc::now().fixed_offset() + Duration::days(7),
                created_at: ts(),
                updated_at: ts(),
            }]])
            .with_query_results([[banned]])
            .build_context();

        services
            .admin()
            .ban(&caller(Role::Admin), target_id)
            .await
            .expect("ban should succeed");

        let err = services
            .sessions()
            .authenticate(Some("revoked"), Role::User)
            .await
            .expect_err("revoked session should fail the gate");
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = services
            .sessions()
            .authenticate(Some("in-flight"), Role::User)
            .await
            .expect_err("banned account should fail the gate");
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn unban_requires_banned_user() {
        let service = AdminFixtureBuilder::new()
            .with_query_results([Vec::<user::Model>::new()])
            .build();

        let err = service
            .unban(&caller(Role::Admin), Uuid::new_v4())
            .await
            .expect_err("unban should fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn set_group_rejects_unknown_group() {
        let service = AdminFixtureBuilder::new()
            .with_query_results([Vec::<crate::db::entities::group::Model>::new()])
            .build();

        let err = service
            .set_group(Uuid::new_v4(), Some(Uuid::new_v4()))
            .await
            .expect_err("set_group should fail");
        assert_eq!(err.message(), "Unknown group");
    }
}
