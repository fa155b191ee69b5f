use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, PaginatedResponse};
use crate::auth::Role;
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Fields for a freshly registered account.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: Option<&'a str>,
    pub role: Role,
    pub is_active: bool,
}

impl UserDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        let email = email.to_string();
        self.find_first(move |query| query.filter(user::Column::Email.eq(email)))
            .await
    }

    pub async fn create_user(&self, new_user: NewUser<'_>) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            email: Set(new_user.email.to_string()),
            password_hash: Set(new_user.password_hash.to_string()),
            name: Set(new_user.name.map(str::to_string)),
            role: Set(new_user.role.as_str().to_string()),
            is_active: Set(new_user.is_active),
            banned: Set(false),
            last_active: Set(chrono::Utc::now().fixed_offset()),
            scores: Set(serde_json::json!({})),
            group_id: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    /// Single UPDATE without a read; used on every authenticated request.
    pub async fn touch_last_active(&self, id: Uuid, at: DateTime<FixedOffset>) -> DaoResult<()> {
        User::update_many()
            .col_expr(user::Column::LastActive, Expr::value(at))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(())
    }

    /// Accounts holding any role above the base one.
    pub async fn find_staff_page(
        &self,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<user::Model>> {
        self.find(page, page_size, None, |query| {
            query.filter(user::Column::Role.ne(Role::User.as_str()))
        })
        .await
    }

    pub async fn count_staff(&self) -> DaoResult<u64> {
        self.count(|query| query.filter(user::Column::Role.ne(Role::User.as_str())))
            .await
    }

    pub async fn find_staff_by_id(&self, id: Uuid) -> DaoResult<Option<user::Model>> {
        self.find_first(move |query| {
            query
                .filter(user::Column::Id.eq(id))
                .filter(user::Column::Role.ne(Role::User.as_str()))
        })
        .await
    }

    pub async fn find_first_with_role(&self, role: Role) -> DaoResult<Option<user::Model>> {
        self.find_first(move |query| query.filter(user::Column::Role.eq(role.as_str())))
            .await
    }

    pub async fn find_banned_by_id(&self, id: Uuid) -> DaoResult<Option<user::Model>> {
        self.find_first(move |query| {
            query
                .filter(user::Column::Id.eq(id))
                .filter(user::Column::Banned.eq(true))
        })
        .await
    }
}
