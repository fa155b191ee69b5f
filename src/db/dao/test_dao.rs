use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::test::{self, Entity as Test};

#[derive(Clone)]
pub struct TestDao {
    db: DatabaseConnection,
}

impl DaoBase for TestDao {
    type Entity = Test;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TestDao {
    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<test::Model>> {
        let name = name.to_string();
        self.find_first(move |query| query.filter(test::Column::Name.eq(name)))
            .await
    }

    pub async fn create_test(&self, name: &str) -> DaoResult<test::Model> {
        let model = test::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_all(&self) -> DaoResult<Vec<test::Model>> {
        self.find_all(None, |query| query).await
    }
}
