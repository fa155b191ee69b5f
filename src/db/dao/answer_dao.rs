use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::answer::{self, Entity as Answer};

#[derive(Clone)]
pub struct AnswerDao {
    db: DatabaseConnection,
}

impl DaoBase for AnswerDao {
    type Entity = Answer;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

pub struct NewAnswer<'a> {
    pub question_id: Uuid,
    pub speciality_id: Uuid,
    pub text: &'a str,
    pub answer_number: i32,
}

impl AnswerDao {
    /// Answers of a question ordered by their number.
    pub async fn list_for_question(&self, question_id: Uuid) -> DaoResult<Vec<answer::Model>> {
        self.find_all(Some((answer::Column::AnswerNumber, Order::Asc)), move |query| {
            query.filter(answer::Column::QuestionId.eq(question_id))
        })
        .await
    }

    pub async fn find_by_number(
        &self,
        question_id: Uuid,
        answer_number: i32,
    ) -> DaoResult<Option<answer::Model>> {
        self.find_first(move |query| {
            query
                .filter(answer::Column::QuestionId.eq(question_id))
                .filter(answer::Column::AnswerNumber.eq(answer_number))
        })
        .await
    }

    pub async fn create_answer(&self, new_answer: NewAnswer<'_>) -> DaoResult<answer::Model> {
        let model = answer::ActiveModel {
            question_id: Set(new_answer.question_id),
            speciality_id: Set(new_answer.speciality_id),
            text: Set(new_answer.text.to_string()),
            answer_number: Set(new_answer.answer_number),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn delete_for_questions(&self, question_ids: Vec<Uuid>) -> DaoResult<u64> {
        if question_ids.is_empty() {
            return Ok(0);
        }
        let result = Answer::delete_many()
            .filter(answer::Column::QuestionId.is_in(question_ids))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
