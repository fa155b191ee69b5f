use sea_orm::DatabaseConnection;

use super::{
    AnswerDao, ConfirmRequestDao, DaoBase, GroupDao, QuestionDao, SessionTokenDao, SpecialityDao,
    TestDao, UserDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn session_token(&self) -> SessionTokenDao {
        DaoBase::new(&self.db)
    }

    pub fn confirm_request(&self) -> ConfirmRequestDao {
        DaoBase::new(&self.db)
    }

    pub fn test(&self) -> TestDao {
        DaoBase::new(&self.db)
    }

    pub fn question(&self) -> QuestionDao {
        DaoBase::new(&self.db)
    }

    pub fn answer(&self) -> AnswerDao {
        DaoBase::new(&self.db)
    }

    pub fn speciality(&self) -> SpecialityDao {
        DaoBase::new(&self.db)
    }

    pub fn group(&self) -> GroupDao {
        DaoBase::new(&self.db)
    }
}
