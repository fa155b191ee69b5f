use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use super::{BaseEntity, DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{
    question::{self, Entity as Question},
    test,
};

#[derive(Clone)]
pub struct QuestionDao {
    db: DatabaseConnection,
}

impl DaoBase for QuestionDao {
    type Entity = Question;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl QuestionDao {
    pub async fn count_for_test(&self, test_id: Uuid) -> DaoResult<u64> {
        self.count(move |query| query.filter(question::Column::TestId.eq(test_id)))
            .await
    }

    /// Question at a 1-based position within the test.
    pub async fn find_at_position(
        &self,
        test_id: Uuid,
        position: i32,
    ) -> DaoResult<Option<question::Model>> {
        self.find_first(move |query| {
            query
                .filter(question::Column::TestId.eq(test_id))
                .filter(question::Column::Position.eq(position))
        })
        .await
    }

    pub async fn list_for_test(&self, test_id: Uuid) -> DaoResult<Vec<question::Model>> {
        self.find_all(Some((question::Column::Position, Order::Asc)), move |query| {
            query.filter(question::Column::TestId.eq(test_id))
        })
        .await
    }

    /// Appends after the current tail and moves the last-question flag onto it.
    ///
    /// The test row stays locked until commit, so concurrent appends to one
    /// test get consecutive positions and exactly one flagged tail.
    pub async fn append(&self, test_id: Uuid, text: &str) -> DaoResult<question::Model> {
        let txn = self.db.begin().await?;

        test::Entity::find_by_id(test_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(DaoLayerError::NotFound {
                entity: <test::Entity as BaseEntity>::LABEL,
                id: test_id,
            })?;

        let count = Question::find()
            .filter(question::Column::TestId.eq(test_id))
            .count(&txn)
            .await?;
        let position = i32::try_from(count + 1).map_err(|_| {
            DaoLayerError::Db(DbErr::Custom(format!(
                "question position overflow for test {test_id}"
            )))
        })?;

        Question::update_many()
            .col_expr(question::Column::IsLast, Expr::value(false))
            .filter(question::Column::TestId.eq(test_id))
            .exec(&txn)
            .await?;

        let now = Utc::now().fixed_offset();
        let model = question::ActiveModel {
            id: Set(Uuid::new_v4()),
            test_id: Set(test_id),
            text: Set(text.to_string()),
            position: Set(position),
            is_last: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    pub async fn delete_for_test(&self, test_id: Uuid) -> DaoResult<u64> {
        let result = Question::delete_many()
            .filter(question::Column::TestId.eq(test_id))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
