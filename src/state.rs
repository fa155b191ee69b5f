use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    integrations::{CaptchaVerifier, Mailer},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub mailer: Arc<dyn Mailer>,
    pub captcha: Arc<dyn CaptchaVerifier>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        mailer: Arc<dyn Mailer>,
        captcha: Arc<dyn CaptchaVerifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            db,
            mailer,
            captcha,
        })
    }
}
