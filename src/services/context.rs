use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, CompletionRule},
    db::dao::DaoContext,
    integrations::{CaptchaVerifier, Mailer},
    services::{
        AccountService, AdminService, CatalogService, NotificationService, ScoringService,
        SessionService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    mailer: Arc<dyn Mailer>,
    captcha: Arc<dyn CaptchaVerifier>,
    frontend_host: String,
    subject_prefix: String,
    completion_rule: CompletionRule,
}

impl ServiceContext {
    pub fn new(
        db: &DatabaseConnection,
        config: &AppConfig,
        mailer: Arc<dyn Mailer>,
        captcha: Arc<dyn CaptchaVerifier>,
    ) -> Self {
        Self {
            daos: DaoContext::new(db),
            mailer,
            captcha,
            frontend_host: config.general.frontend_host.clone(),
            subject_prefix: config.mail.subject_prefix.clone(),
            completion_rule: config.quiz.completion_rule,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            &state.db,
            &state.config,
            Arc::clone(&state.mailer),
            Arc::clone(&state.captcha),
        )
    }

    pub fn daos(&self) -> &DaoContext {
        &self.daos
    }

    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(
            self.daos.confirm_request(),
            Arc::clone(&self.mailer),
            &self.frontend_host,
            &self.subject_prefix,
        )
    }

    pub fn sessions(&self) -> SessionService {
        SessionService::new(self.daos.session_token(), self.daos.user())
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            self.daos.clone(),
            self.sessions(),
            self.notifications(),
            Arc::clone(&self.captcha),
        )
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.daos.clone(), self.sessions(), self.notifications())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.daos.clone())
    }

    pub fn scoring(&self) -> ScoringService {
        ScoringService::new(self.daos.clone(), self.completion_rule)
    }
}
