use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::group::{self, Entity as Group, Place};

#[derive(Clone)]
pub struct GroupDao {
    db: DatabaseConnection,
}

impl DaoBase for GroupDao {
    type Entity = Group;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl GroupDao {
    pub async fn create_group(
        &self,
        place: Place,
        speciality_id: Option<Uuid>,
    ) -> DaoResult<group::Model> {
        let model = group::ActiveModel {
            place: Set(place.as_str().to_string()),
            speciality_id: Set(speciality_id),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_all(&self) -> DaoResult<Vec<group::Model>> {
        self.find_all(None, |query| query).await
    }
}
