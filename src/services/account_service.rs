use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{
        ConfirmationPurpose, Role,
        confirmation::is_within_window,
        password::{hash_password, verify_password},
    },
    db::{
        dao::{DaoBase, DaoContext, DaoLayerError, NewUser},
        entities::{session_token, user},
    },
    error::AppError,
    integrations::CaptchaVerifier,
    services::{AuthenticatedUser, NotificationService, SessionService},
};

pub const INVALID_CREDENTIALS: &str = "Wrong email or password";
pub const DUPLICATE_EMAIL: &str = "User with this email already exists";
pub const UNKNOWN_CONFIRMATION: &str = "Unknown confirmation token";
pub const EXPIRED_CONFIRMATION: &str = "Confirmation token expired";

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub captcha_token: String,
}

#[derive(Debug)]
pub struct LoginOutcome {
    pub session: session_token::Model,
    pub user: user::Model,
}

/// Public view of an account. Optional fields are left out when unset.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub role: String,
    pub banned: bool,
    pub last_active: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
}

impl From<&user::Model> for UserProfile {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_active: user.is_active,
            role: user.role.clone(),
            banned: user.banned,
            last_active: user.last_active,
            name: user.name.clone(),
            group_id: user.group_id,
        }
    }
}

/// Registration, login and the confirmation-token flows.
#[derive(Clone)]
pub struct AccountService {
    daos: DaoContext,
    sessions: SessionService,
    notifications: NotificationService,
    captcha: Arc<dyn CaptchaVerifier>,
}

impl AccountService {
    pub fn new(
        daos: DaoContext,
        sessions: SessionService,
        notifications: NotificationService,
        captcha: Arc<dyn CaptchaVerifier>,
    ) -> Self {
        Self {
            daos,
            sessions,
            notifications,
            captcha,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<user::Model, AppError> {
        self.captcha.verify(&input.captcha_token).await?;

        let email = normalize_email(&input.email)?;
        let user_dao = self.daos.user();
        if user_dao.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(DUPLICATE_EMAIL));
        }

        let password_hash = hash_password(&input.password)?;
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let user = user_dao
            .create_user(NewUser {
                email: &email,
                password_hash: &password_hash,
                name,
                role: Role::User,
                is_active: false,
            })
            .await
            .map_err(|err| {
                if err.is_unique_violation() {
                    AppError::conflict(DUPLICATE_EMAIL)
                } else {
                    err.into()
                }
            })?;

        self.notifications
            .send_confirmation(&user, ConfirmationPurpose::AccountConfirmation)
            .await?;
        tracing::info!(user_id = %user.id, "registered account awaiting confirmation");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let user = self
            .daos
            .user()
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        if user.banned {
            return Err(AppError::forbidden("Account is banned"));
        }
        if !user.is_active {
            return Err(AppError::forbidden("Email not confirmed"));
        }

        let session = self.sessions.issue(user.id).await?;
        Ok(LoginOutcome { session, user })
    }

    pub async fn logout(&self, caller: &AuthenticatedUser) -> Result<(), AppError> {
        self.sessions.end(&caller.token).await
    }

    pub async fn confirm_email(&self, email: &str, token: &str) -> Result<user::Model, AppError> {
        let user = self.consume_confirmation(email, token).await?;
        let user = self
            .daos
            .user()
            .save_with(user, |active| {
                active.is_active = Set(true);
            })
            .await?;
        tracing::info!(user_id = %user.id, "email confirmed");
        Ok(user)
    }

    /// Sets a new password using a mailed confirmation token.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<user::Model, AppError> {
        let password_hash = hash_password(new_password)?;
        let user = self.consume_confirmation(email, token).await?;
        let user = self
            .daos
            .user()
            .save_with(user, move |active| {
                active.password_hash = Set(password_hash);
                active.is_active = Set(true);
            })
            .await?;
        self.sessions.revoke_all(user.id).await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(user)
    }

    /// Own profile, or any profile for admins.
    pub async fn profile(
        &self,
        caller: &AuthenticatedUser,
        id: Option<Uuid>,
    ) -> Result<UserProfile, AppError> {
        match id {
            None => Ok(UserProfile::from(&caller.user)),
            Some(id) if id == caller.user.id => Ok(UserProfile::from(&caller.user)),
            Some(id) => {
                if !caller.role.satisfies(Role::Admin) {
                    return Err(AppError::forbidden(
                        "Only administrators can view other profiles",
                    ));
                }
                let user = self.daos.user().find_by_id(id).await.map_err(|err| match err {
                    DaoLayerError::NotFound { .. } => AppError::not_found("User not found"),
                    other => other.into(),
                })?;
                Ok(UserProfile::from(&user))
            }
        }
    }

    /// Validates and deletes a confirmation request, returning its user.
    async fn consume_confirmation(
        &self,
        email: &str,
        token: &str,
    ) -> Result<user::Model, AppError> {
        let confirm_dao = self.daos.confirm_request();
        let request = confirm_dao
            .find_by_token(token.trim())
            .await?
            .ok_or_else(|| AppError::not_found(UNKNOWN_CONFIRMATION))?;

        let user = match self.daos.user().find_by_id(request.user_id).await {
            Ok(user) => user,
            Err(DaoLayerError::NotFound { .. }) => {
                return Err(AppError::not_found(UNKNOWN_CONFIRMATION));
            }
            Err(err) => return Err(err.into()),
        };
        if user.email != email.trim() {
            return Err(AppError::not_found(UNKNOWN_CONFIRMATION));
        }

        confirm_dao.delete(request.id).await?;
        if !is_within_window(request.created_at, Utc::now().fixed_offset()) {
            return Err(AppError::expired(EXPIRED_CONFIRMATION));
        }
        Ok(user)
    }
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(' '),
        None => false,
    };
    if !valid {
        return Err(AppError::bad_request("Invalid email"));
    }
    Ok(email.to_string())
}
