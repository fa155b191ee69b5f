pub mod captcha;
pub mod mailer;

pub use captcha::{CaptchaVerifier, DisabledCaptcha, SmartCaptcha, build_captcha};
pub use mailer::{LogMailer, MailError, Mailer, OutgoingMail, SmtpMailer, build_mailer};
