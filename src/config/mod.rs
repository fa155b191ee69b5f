pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, BootstrapConfig, CaptchaConfig, CompletionRule, DatabaseConfig, GeneralConfig,
    LoggingConfig, MailConfig, QuizConfig,
};
pub use envconfig::EnvConfig;
