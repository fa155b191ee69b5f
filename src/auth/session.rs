use chrono::{DateTime, Duration, FixedOffset};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";
pub const SESSION_TTL_DAYS: i64 = 7;

pub fn session_expiry(issued_at: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    issued_at + Duration::days(SESSION_TTL_DAYS)
}

pub fn is_session_expired(expires_at: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> bool {
    now >= expires_at
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, FixedOffset, TimeZone};

    use super::{is_session_expired, session_expiry};

    #[test]
    fn sessions_last_seven_days() {
        let issued = FixedOffset::east_opt(3 * 3600)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("timestamp should be valid");
        let expires = session_expiry(issued);

        assert_eq!(expires - issued, Duration::days(7));
        assert!(!is_session_expired(expires, expires - Duration::seconds(1)));
        assert!(is_session_expired(expires, expires));
    }
}
