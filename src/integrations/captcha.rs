use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{config::CaptchaConfig, error::AppError};

pub const CAPTCHA_FAILED: &str = "CAPTCHA check failed";

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<(), AppError>;
}

/// Used when the captcha feature flag is off.
pub struct DisabledCaptcha;

#[async_trait]
impl CaptchaVerifier for DisabledCaptcha {
    async fn verify(&self, _token: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// Yandex SmartCaptcha server-side validation.
pub struct SmartCaptcha {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl SmartCaptcha {
    pub fn new(endpoint: &str, server_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            server_key: server_key.to_string(),
        })
    }
}

#[async_trait]
impl CaptchaVerifier for SmartCaptcha {
    async fn verify(&self, token: &str) -> Result<(), AppError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("secret", self.server_key.as_str()), ("token", token)])
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "captcha validation request failed");
                AppError::bad_request(CAPTCHA_FAILED)
            })?;

        if response.status() != StatusCode::OK {
            tracing::info!(status = response.status().as_u16(), "captcha rejected");
            return Err(AppError::bad_request(CAPTCHA_FAILED));
        }
        Ok(())
    }
}

pub fn build_captcha(cfg: &CaptchaConfig) -> anyhow::Result<Arc<dyn CaptchaVerifier>> {
    if !cfg.enabled {
        return Ok(Arc::new(DisabledCaptcha));
    }
    let server_key = cfg
        .server_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("captcha.server_key is required when captcha is enabled"))?;
    Ok(Arc::new(SmartCaptcha::new(
        &cfg.endpoint,
        server_key,
        Duration::from_millis(cfg.timeout_ms),
    )?))
}
