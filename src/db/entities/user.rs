use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub role: String,
    #[sea_orm(default_value = false)]
    pub is_active: bool,
    #[sea_orm(default_value = false)]
    pub banned: bool,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub last_active: DateTimeWithTimeZone,
    /// Speciality id to accumulated score.
    pub scores: Json,
    #[sea_orm(indexed)]
    pub group_id: Option<Uuid>,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "group_id", to = "id", on_delete = "SetNull")]
    pub group: HasOne<super::group::Entity>,
    #[sea_orm(has_many)]
    pub session_tokens: HasMany<super::session_token::Entity>,
    #[sea_orm(has_many)]
    pub confirm_requests: HasMany<super::confirm_request::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

base_entity!("User");

impl Model {
    /// Stored role, `None` when the column holds an unknown identifier.
    pub fn parsed_role(&self) -> Option<crate::auth::Role> {
        crate::auth::Role::try_from(self.role.as_str()).ok()
    }
}
