use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::session_token::{self, Entity as SessionToken};

#[derive(Clone)]
pub struct SessionTokenDao {
    db: DatabaseConnection,
}

impl DaoBase for SessionTokenDao {
    type Entity = SessionToken;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl SessionTokenDao {
    pub async fn issue(
        &self,
        user_id: Uuid,
        expires_at: DateTime<FixedOffset>,
    ) -> DaoResult<session_token::Model> {
        let model = session_token::ActiveModel {
            token: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<session_token::Model>> {
        let token = token.to_string();
        self.find_first(move |query| query.filter(session_token::Column::Token.eq(token)))
            .await
    }

    /// Returns how many rows went away; zero is not an error.
    pub async fn delete_token(&self, token: &str) -> DaoResult<u64> {
        let result = SessionToken::delete_many()
            .filter(session_token::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }

    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> DaoResult<u64> {
        let result = SessionToken::delete_many()
            .filter(session_token::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
