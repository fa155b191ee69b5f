use chrono::{DateTime, Duration, FixedOffset};

use super::Role;

pub const CONFIRMATION_WINDOW_MINUTES: i64 = 10;

/// A request stays usable up to, not including, the end of the window.
pub fn is_within_window(created_at: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> bool {
    now - created_at < Duration::minutes(CONFIRMATION_WINDOW_MINUTES)
}

/// Why a confirmation link is being mailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationPurpose {
    AccountConfirmation,
    RootAdminConfirmation,
    RoleGranted(Role),
    PasswordResetAfterUnban,
}

impl ConfirmationPurpose {
    pub fn action(&self) -> String {
        match self {
            Self::AccountConfirmation => "Email confirmation".to_string(),
            Self::RootAdminConfirmation => "[ROOT-ADMIN] Account confirmation".to_string(),
            Self::RoleGranted(role) => format!("Password reset due to role {role}"),
            Self::PasswordResetAfterUnban => "Password reset after unban".to_string(),
        }
    }

    /// Completes the sentence "follow the link for ...".
    pub fn action_label(&self) -> &'static str {
        match self {
            Self::AccountConfirmation => "email confirmation",
            Self::RootAdminConfirmation => "account confirmation",
            Self::RoleGranted(_) | Self::PasswordResetAfterUnban => "password reset",
        }
    }

    /// Frontend route the link points at.
    pub fn path(&self) -> &'static str {
        match self {
            Self::AccountConfirmation => "confirm-email",
            Self::RootAdminConfirmation => "confirm-account",
            Self::RoleGranted(_) | Self::PasswordResetAfterUnban => "reset-password",
        }
    }
}

pub fn confirmation_link(frontend_host: &str, purpose: ConfirmationPurpose, token: &str) -> String {
    format!(
        "{}/{}/{}",
        frontend_host.trim_end_matches('/'),
        purpose.path(),
        token
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone};

    use super::{ConfirmationPurpose, confirmation_link, is_within_window};
    use crate::auth::Role;

    #[test]
    fn window_excludes_the_ten_minute_mark() {
        let created = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");

        assert!(is_within_window(created, created));
        assert!(is_within_window(
            created,
            created + Duration::minutes(10) - Duration::milliseconds(1)
        ));
        assert!(!is_within_window(created, created + Duration::minutes(10)));
        assert!(!is_within_window(created, created + Duration::hours(2)));
    }

    #[test]
    fn link_joins_host_path_and_token() {
        assert_eq!(
            confirmation_link(
                "https://it-cube.example/",
                ConfirmationPurpose::AccountConfirmation,
                "abc"
            ),
            "https://it-cube.example/confirm-email/abc"
        );
        assert_eq!(
            confirmation_link(
                "https://it-cube.example",
                ConfirmationPurpose::RoleGranted(Role::Dev),
                "xyz"
            ),
            "https://it-cube.example/reset-password/xyz"
        );
    }

    #[test]
    fn role_grant_names_the_role() {
        assert_eq!(
            ConfirmationPurpose::RoleGranted(Role::OrgAdmin).action(),
            "Password reset due to role org-admin"
        );
    }
}
