pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_FRONTEND_HOST: &str = "http://localhost:5173";
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;
pub const DEFAULT_SMTP_PORT: i64 = 587;
pub const DEFAULT_MAIL_FROM: &str = "IT-Cube <noreply@localhost>";
pub const DEFAULT_SUBJECT_PREFIX: &str = "IT-Cube";
pub const DEFAULT_CAPTCHA_ENDPOINT: &str = "https://smartcaptcha.yandexcloud.net/validate";
pub const DEFAULT_CAPTCHA_TIMEOUT_MS: i64 = 1000;
