use std::sync::Arc;

use askama::Template;

use crate::{
    auth::{
        ConfirmationPurpose,
        confirmation::{CONFIRMATION_WINDOW_MINUTES, confirmation_link},
    },
    db::{
        dao::ConfirmRequestDao,
        entities::{confirm_request, user},
    },
    error::AppError,
    integrations::{MailError, Mailer, OutgoingMail},
};

#[derive(Template)]
#[template(path = "email_message.html")]
struct ConfirmationEmail<'a> {
    subject: &'a str,
    username: Option<&'a str>,
    action_label: &'a str,
    link: &'a str,
    valid_minutes: i64,
}

/// Issues confirmation tokens and mails the matching link.
#[derive(Clone)]
pub struct NotificationService {
    confirm_dao: ConfirmRequestDao,
    mailer: Arc<dyn Mailer>,
    frontend_host: String,
    subject_prefix: String,
}

impl NotificationService {
    pub fn new(
        confirm_dao: ConfirmRequestDao,
        mailer: Arc<dyn Mailer>,
        frontend_host: &str,
        subject_prefix: &str,
    ) -> Self {
        Self {
            confirm_dao,
            mailer,
            frontend_host: frontend_host.to_string(),
            subject_prefix: subject_prefix.to_string(),
        }
    }

    /// Replaces the user's pending request and mails the new link.
    ///
    /// The token is stored before delivery; a failed delivery is logged and
    /// does not undo it.
    pub async fn send_confirmation(
        &self,
        user: &user::Model,
        purpose: ConfirmationPurpose,
    ) -> Result<confirm_request::Model, AppError> {
        let request = self.confirm_dao.replace_for_user(user.id).await?;

        let subject = format!("{} | {}", self.subject_prefix, purpose.action());
        let link = confirmation_link(&self.frontend_host, purpose, &request.token);
        let delivery = match self.render(user, &subject, purpose, &link) {
            Ok(html_body) => {
                self.mailer
                    .send(OutgoingMail {
                        to: user.email.clone(),
                        subject,
                        html_body,
                    })
                    .await
            }
            Err(err) => Err(err),
        };

        if let Err(err) = delivery {
            tracing::warn!(
                user_id = %user.id,
                purpose = purpose.path(),
                error = %err,
                "confirmation mail not delivered"
            );
        }

        Ok(request)
    }

    fn render(
        &self,
        user: &user::Model,
        subject: &str,
        purpose: ConfirmationPurpose,
        link: &str,
    ) -> Result<String, MailError> {
        let html = ConfirmationEmail {
            subject,
            username: user.name.as_deref(),
            action_label: purpose.action_label(),
            link,
            valid_minutes: CONFIRMATION_WINDOW_MINUTES,
        }
        .render()?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::{
        auth::{ConfirmationPurpose, Role},
        db::{
            dao::{ConfirmRequestDao, DaoBase},
            entities::{confirm_request, user},
        },
        integrations::{MailError, Mailer, OutgoingMail},
    };

    use super::NotificationService;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Address(mail.to));
            }
            self.sent.lock().expect("mailer lock").push(mail);
            Ok(())
        }
    }

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid) -> user::Model {
        user::Model {
            id,
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: Some("Alice".to_string()),
            role: Role::User.as_str().to_string(),
            is_active: false,
            banned: false,
            last_active: ts(),
            scores: serde_json::json!({}),
            group_id: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn service(mailer: Arc<RecordingMailer>, user_id: Uuid) -> NotificationService {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[confirm_request::Model {
                id: Uuid::new_v4(),
                token: "token-123".to_string(),
                user_id,
                created_at: ts(),
                updated_at: ts(),
            }]])
            .into_connection();
        NotificationService::new(
            ConfirmRequestDao::new(&db),
            mailer,
            "https://it-cube.example",
            "IT-Cube",
        )
    }

    #[tokio::test]
    async fn sends_rendered_link_for_new_token() {
        let user_id = Uuid::new_v4();
        let mailer = Arc::new(RecordingMailer::default());
        let notifications = service(Arc::clone(&mailer), user_id);

        let request = notifications
            .send_confirmation(&user_model(user_id), ConfirmationPurpose::AccountConfirmation)
            .await
            .expect("confirmation should be stored");

        assert_eq!(request.token, "token-123");
        let sent = mailer.sent.lock().expect("mailer lock");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[0].subject, "IT-Cube | Email confirmation");
        assert!(
            sent[0]
                .html_body
                .contains("https://it-cube.example/confirm-email/token-123")
        );
        assert!(sent[0].html_body.contains("Alice"));
    }

    #[tokio::test]
    async fn delivery_failure_keeps_the_token() {
        let user_id = Uuid::new_v4();
        let mailer = Arc::new(RecordingMailer {
            fail: true,
            ..RecordingMailer::default()
        });
        let notifications = service(Arc::clone(&mailer), user_id);

        let request = notifications
            .send_confirmation(&user_model(user_id), ConfirmationPurpose::PasswordResetAfterUnban)
            .await
            .expect("delivery errors are not propagated");

        assert_eq!(request.user_id, user_id);
        assert!(mailer.sent.lock().expect("mailer lock").is_empty());
    }
}
