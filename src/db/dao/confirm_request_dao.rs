use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::confirm_request::{self, Entity as ConfirmRequest};

#[derive(Clone)]
pub struct ConfirmRequestDao {
    db: DatabaseConnection,
}

impl DaoBase for ConfirmRequestDao {
    type Entity = ConfirmRequest;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ConfirmRequestDao {
    /// Drops any earlier request for the user and stores a fresh token.
    pub async fn replace_for_user(&self, user_id: Uuid) -> DaoResult<confirm_request::Model> {
        self.delete_for_user(user_id).await?;
        let model = confirm_request::ActiveModel {
            token: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<confirm_request::Model>> {
        let token = token.to_string();
        self.find_first(move |query| query.filter(confirm_request::Column::Token.eq(token)))
            .await
    }

    pub async fn delete_for_user(&self, user_id: Uuid) -> DaoResult<u64> {
        let result = ConfirmRequest::delete_many()
            .filter(confirm_request::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::entities::confirm_request;

    use super::ConfirmRequestDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn request_model(token: &str, user_id: Uuid) -> confirm_request::Model {
        let now = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        confirm_request::Model {
            id: Uuid::new_v4(),
            token: token.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn replace_for_user_clears_previous_requests_first() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[request_model("fresh", user_id)]])
            .into_connection();
        let dao = ConfirmRequestDao::new(&db);

        let request = dao
            .replace_for_user(user_id)
            .await
            .expect("replace should succeed");
        assert_eq!(request.token, "fresh");
        assert_eq!(request.user_id, user_id);
    }

    #[tokio::test]
    async fn replace_for_user_stops_when_cleanup_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("delete failed".to_string())])
            .into_connection();
        let dao = ConfirmRequestDao::new(&db);

        let err = dao
            .replace_for_user(Uuid::new_v4())
            .await
            .expect_err("replace should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
