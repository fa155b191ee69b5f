use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait BaseEntity: sea_orm::EntityTrait {
    /// Human-readable name used in not-found messages.
    const LABEL: &'static str;

    fn created_at_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}
