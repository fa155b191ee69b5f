/// Wires an entity into the DAO base traits. Expects `id`, `created_at` and
/// `updated_at` columns on the model.
macro_rules! base_entity {
    ($label:literal) => {
        impl crate::db::dao::base_traits::BaseEntity for Entity {
            const LABEL: &'static str = $label;

            fn created_at_column() -> Column {
                Column::CreatedAt
            }
        }

        impl crate::db::dao::base_traits::HasIdActiveModel for ActiveModel {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.id = sea_orm::ActiveValue::Set(id);
            }
        }

        impl crate::db::dao::base_traits::TimestampedActiveModel for ActiveModel {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.created_at = sea_orm::ActiveValue::Set(ts);
            }

            fn set_updated_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.updated_at = sea_orm::ActiveValue::Set(ts);
            }
        }
    };
}

#[allow(unused_imports)]
pub mod prelude {
    pub use super::answer::Entity as Answer;
    pub use super::confirm_request::Entity as ConfirmRequest;
    pub use super::group::Entity as Group;
    pub use super::question::Entity as Question;
    pub use super::session_token::Entity as SessionToken;
    pub use super::speciality::Entity as Speciality;
    pub use super::test::Entity as Test;
    pub use super::user::Entity as User;
}

pub mod answer;
pub mod confirm_request;
pub mod group;
pub mod question;
pub mod session_token;
pub mod speciality;
pub mod test;
pub mod user;
