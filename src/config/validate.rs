use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.general.frontend_host.trim().is_empty() {
        errors.push("general.frontend_host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(bootstrap) = cfg.bootstrap.as_ref() {
        if bootstrap.admin_email.trim().is_empty() {
            errors.push("bootstrap.admin_email must not be empty".to_string());
        }

        if bootstrap.admin_password.len() < 8 {
            errors.push("bootstrap.admin_password must be at least 8 characters".to_string());
        }
    }

    if cfg.mail.smtp_host.is_some() && cfg.mail.from.trim().is_empty() {
        errors.push("mail.from must not be empty when mail.smtp_host is set".to_string());
    }

    if cfg.captcha.enabled
        && cfg
            .captcha
            .server_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
    {
        errors.push("captcha.server_key is required when captcha.enabled is true".to_string());
    }

    if cfg.captcha.timeout_ms == 0 {
        errors.push("captcha.timeout_ms must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
