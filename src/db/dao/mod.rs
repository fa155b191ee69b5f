pub mod answer_dao;
pub mod base;
pub mod base_traits;
pub mod confirm_request_dao;
mod context;
pub mod error;
pub mod group_dao;
pub mod question_dao;
pub mod session_token_dao;
pub mod speciality_dao;
pub mod test_dao;
pub mod user_dao;

pub use answer_dao::{AnswerDao, NewAnswer};
pub use base::{DaoBase, PaginatedResponse};
pub use base_traits::{BaseEntity, HasIdActiveModel, TimestampedActiveModel};
pub use confirm_request_dao::ConfirmRequestDao;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use group_dao::GroupDao;
pub use question_dao::QuestionDao;
pub use session_token_dao::SessionTokenDao;
pub use speciality_dao::SpecialityDao;
pub use test_dao::TestDao;
pub use user_dao::{NewUser, UserDao};
