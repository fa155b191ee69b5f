use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::speciality::{self, Entity as Speciality};

#[derive(Clone)]
pub struct SpecialityDao {
    db: DatabaseConnection,
}

impl DaoBase for SpecialityDao {
    type Entity = Speciality;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl SpecialityDao {
    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<speciality::Model>> {
        let name = name.to_string();
        self.find_first(move |query| query.filter(speciality::Column::Name.eq(name)))
            .await
    }

    pub async fn create_speciality(&self, name: &str) -> DaoResult<speciality::Model> {
        let model = speciality::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_all(&self) -> DaoResult<Vec<speciality::Model>> {
        self.find_all(Some((speciality::Column::Name, Order::Asc)), |query| query)
            .await
    }
}
