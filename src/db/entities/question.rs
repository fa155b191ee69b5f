use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed, unique_key = "test_position")]
    pub test_id: Uuid,
    pub text: String,
    /// 1-based place within the test.
    #[sea_orm(unique_key = "test_position")]
    pub position: i32,
    #[sea_orm(default_value = false)]
    pub is_last: bool,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "test_id", to = "id", on_delete = "Cascade")]
    pub test: HasOne<super::test::Entity>,
    #[sea_orm(has_many)]
    pub answers: HasMany<super::answer::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

base_entity!("Question");
