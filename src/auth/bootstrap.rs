use sea_orm::Set;

use crate::{
    config::BootstrapConfig,
    db::{
        dao::{DaoBase, NewUser},
        entities::user,
    },
    services::ServiceContext,
};

use super::{
    ConfirmationPurpose, Role,
    password::{hash_password, verify_password},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// No bootstrap section configured.
    Skipped,
    Created,
    Updated,
    Unchanged,
}

/// Makes sure the configured root administrator exists and matches the config.
///
/// Looks the account up by email first, then falls back to any existing
/// root admin (the configured email changed). A new or re-addressed account
/// stays inactive until the mailed confirmation link is used, and is sent a
/// new link on each run until then.
pub async fn seed_root_admin(
    cfg: Option<&BootstrapConfig>,
    services: &ServiceContext,
) -> anyhow::Result<SeedOutcome> {
    let Some(cfg) = cfg else {
        tracing::info!("no bootstrap config, root admin seeding skipped");
        return Ok(SeedOutcome::Skipped);
    };

    let user_dao = services.daos().user();
    let name = Some(cfg.admin_name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    if let Some(existing) = user_dao
        .find_by_email(&cfg.admin_email)
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?
    {
        let password_matches = verify_password(&cfg.admin_password, &existing.password_hash)
            .map_err(|err| anyhow::anyhow!("root admin password check failed: {err}"))?;
        let in_sync = password_matches
            && existing.parsed_role() == Some(Role::RootAdmin)
            && existing.name == name;
        if in_sync && existing.is_active {
            tracing::info!(user_id = %existing.id, "root admin already present");
            return Ok(SeedOutcome::Unchanged);
        }
        if in_sync {
            send_root_confirmation(services, &existing).await?;
            tracing::info!(user_id = %existing.id, "root admin still unconfirmed, link resent");
            return Ok(SeedOutcome::Updated);
        }

        let hash = hash_password(&cfg.admin_password)
            .map_err(|err| anyhow::anyhow!("root admin seed hash error: {err}"))?;
        let user = user_dao
            .save_with(existing, move |active| {
                active.role = Set(Role::RootAdmin.as_str().to_string());
                active.password_hash = Set(hash);
                active.name = Set(name);
            })
            .await
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        if !user.is_active {
            send_root_confirmation(services, &user).await?;
        }
        tracing::info!(user_id = %user.id, "root admin updated from config");
        return Ok(SeedOutcome::Updated);
    }

    let hash = hash_password(&cfg.admin_password)
        .map_err(|err| anyhow::anyhow!("root admin seed hash error: {err}"))?;

    let previous = user_dao
        .find_first_with_role(Role::RootAdmin)
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    let (user, outcome) = match previous {
        Some(previous) => {
            let email = cfg.admin_email.clone();
            let user = user_dao
                .save_with(previous, move |active| {
                    active.email = Set(email);
                    active.password_hash = Set(hash);
                    active.name = Set(name);
                    active.is_active = Set(false);
                })
                .await
                .map_err(|err| anyhow::anyhow!("{err}"))?;
            (user, SeedOutcome::Updated)
        }
        None => {
            let user = user_dao
                .create_user(NewUser {
                    email: &cfg.admin_email,
                    password_hash: &hash,
                    name: name.as_deref(),
                    role: Role::RootAdmin,
                    is_active: false,
                })
                .await
                .map_err(|err| anyhow::anyhow!("{err}"))?;
            (user, SeedOutcome::Created)
        }
    };

    send_root_confirmation(services, &user).await?;
    tracing::info!(user_id = %user.id, outcome = ?outcome, "root admin seeded");
    Ok(outcome)
}

// An unconfirmed root admin gets a fresh link on every start.
async fn send_root_confirmation(
    services: &ServiceContext,
    user: &user::Model,
) -> anyhow::Result<()> {
    services
        .notifications()
        .send_confirmation(user, ConfirmationPurpose::RootAdminConfirmation)
        .await
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    Ok(())
}
