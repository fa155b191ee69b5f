pub mod account_service;
pub mod admin_service;
pub mod catalog_service;
mod context;
pub mod notification_service;
pub mod scoring;
pub mod session_service;

pub use account_service::{AccountService, LoginOutcome, RegisterInput, UserProfile};
pub use admin_service::{AdminService, StaffPage};
pub use catalog_service::{AnswerView, CatalogService, QuestionView};
pub use context::ServiceContext;
pub use notification_service::NotificationService;
pub use scoring::{ScoreBoard, ScoringService, SubmitOutcome};
pub use session_service::{AuthenticatedUser, SessionService};
