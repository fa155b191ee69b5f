use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "answers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub question_id: Uuid,
    #[sea_orm(indexed)]
    pub speciality_id: Uuid,
    pub text: String,
    /// 1-based number within the question.
    pub answer_number: i32,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "question_id", to = "id", on_delete = "Cascade")]
    pub question: HasOne<super::question::Entity>,
    #[sea_orm(belongs_to, from = "speciality_id", to = "id", on_delete = "Cascade")]
    pub speciality: HasOne<super::speciality::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

base_entity!("Answer");
