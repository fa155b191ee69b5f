use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{
        dao::{DaoBase, DaoContext, DaoLayerError, NewAnswer},
        entities::{answer, group, group::Place, question, speciality, test},
    },
    error::AppError,
};

pub const QUESTION_NOT_FOUND: &str = "Question not found";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnswerView {
    /// The answer number within its question.
    pub id: i32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestionView {
    pub text: String,
    pub answers: Vec<AnswerView>,
    pub is_last_question: bool,
}

/// Tests, their questions and answers, plus the specialities and groups they refer to.
#[derive(Clone)]
pub struct CatalogService {
    daos: DaoContext,
}

impl CatalogService {
    pub fn new(daos: DaoContext) -> Self {
        Self { daos }
    }

    pub async fn list_tests(&self) -> Result<Vec<test::Model>, AppError> {
        Ok(self.daos.test().list_all().await?)
    }

    pub async fn create_test(&self, name: &str) -> Result<test::Model, AppError> {
        let name = name.trim();
        if !is_slug(name) {
            return Err(AppError::bad_request(
                "Test name must be a non-empty slug of letters, digits, '-' or '_'",
            ));
        }

        let test_dao = self.daos.test();
        if test_dao.find_by_name(name).await?.is_some() {
            return Err(AppError::bad_request("Test with this name already exists"));
        }
        test_dao.create_test(name).await.map_err(|err| {
            if err.is_unique_violation() {
                AppError::bad_request("Test with this name already exists")
            } else {
                err.into()
            }
        })
    }

    /// Deletes a test together with its questions and their answers.
    pub async fn delete_test(&self, id: Uuid) -> Result<(), AppError> {
        let test = self.daos.test().find_by_id(id).await?;

        let question_dao = self.daos.question();
        let question_ids = question_dao
            .list_for_test(test.id)
            .await?
            .into_iter()
            .map(|question| question.id)
            .collect::<Vec<_>>();
        let answers = self.daos.answer().delete_for_questions(question_ids).await?;
        let questions = question_dao.delete_for_test(test.id).await?;
        self.daos.test().delete(test.id).await?;

        tracing::info!(test_id = %test.id, questions, answers, "test deleted");
        Ok(())
    }

    pub async fn add_question(&self, test_id: Uuid, text: &str) -> Result<question::Model, AppError> {
        let text = non_empty(text, "Question text must not be empty")?;
        let test = self
            .find_reference(self.daos.test().find_by_id(test_id).await, "Unknown test")?;

        self.daos
            .question()
            .append(test.id, text)
            .await
            .map_err(|err| {
                if err.is_unique_violation() {
                    AppError::conflict("Another question was added to this test, try again")
                } else {
                    err.into()
                }
            })
    }

    pub async fn add_answer(
        &self,
        text: &str,
        answer_number: i32,
        question_id: Uuid,
        speciality_id: Uuid,
    ) -> Result<answer::Model, AppError> {
        let text = non_empty(text, "Answer text must not be empty")?;
        if answer_number < 1 {
            return Err(AppError::bad_request("Answer number must be at least 1"));
        }

        let question = self.find_reference(
            self.daos.question().find_by_id(question_id).await,
            "Unknown question",
        )?;
        let speciality = self.find_reference(
            self.daos.speciality().find_by_id(speciality_id).await,
            "Unknown speciality",
        )?;

        let answer_dao = self.daos.answer();
        if answer_dao
            .find_by_number(question.id, answer_number)
            .await?
            .is_some()
        {
            return Err(AppError::bad_request(format!(
                "Answer number {answer_number} is already used by this question"
            )));
        }

        Ok(answer_dao
            .create_answer(NewAnswer {
                question_id: question.id,
                speciality_id: speciality.id,
                text,
                answer_number,
            })
            .await?)
    }

    /// Question at a 1-based position with its answers in number order.
    pub async fn get_question(&self, test_id: Uuid, position: i32) -> Result<QuestionView, AppError> {
        let question = self.question_at(test_id, position).await?;
        let answers = self.daos.answer().list_for_question(question.id).await?;

        Ok(QuestionView {
            text: question.text,
            answers: answers
                .into_iter()
                .map(|answer| AnswerView {
                    id: answer.answer_number,
                    text: answer.text,
                })
                .collect(),
            is_last_question: question.is_last,
        })
    }

    pub(crate) async fn question_at(
        &self,
        test_id: Uuid,
        position: i32,
    ) -> Result<question::Model, AppError> {
        if position < 1 {
            return Err(AppError::not_found(QUESTION_NOT_FOUND));
        }
        self.daos
            .question()
            .find_at_position(test_id, position)
            .await?
            .ok_or_else(|| AppError::not_found(QUESTION_NOT_FOUND))
    }

    pub async fn list_specialities(&self) -> Result<Vec<speciality::Model>, AppError> {
        Ok(self.daos.speciality().list_all().await?)
    }

    pub async fn create_speciality(&self, name: &str) -> Result<speciality::Model, AppError> {
        let name = non_empty(name, "Speciality name must not be empty")?;
        let speciality_dao = self.daos.speciality();
        if speciality_dao.find_by_name(name).await?.is_some() {
            return Err(AppError::bad_request("Speciality already exists"));
        }
        Ok(speciality_dao.create_speciality(name).await?)
    }

    pub async fn list_groups(&self) -> Result<Vec<group::Model>, AppError> {
        Ok(self.daos.group().list_all().await?)
    }

    pub async fn create_group(
        &self,
        place: Place,
        speciality_id: Option<Uuid>,
    ) -> Result<group::Model, AppError> {
        if let Some(speciality_id) = speciality_id {
            self.find_reference(
                self.daos.speciality().find_by_id(speciality_id).await,
                "Unknown speciality",
            )?;
        }
        Ok(self.daos.group().create_group(place, speciality_id).await?)
    }

    /// Turns a missing referenced row into a validation failure.
    fn find_reference<T>(
        &self,
        found: Result<T, DaoLayerError>,
        message: &str,
    ) -> Result<T, AppError> {
        match found {
            Ok(model) => Ok(model),
            Err(DaoLayerError::NotFound { .. }) => Err(AppError::bad_request(message)),
            Err(err) => Err(err.into()),
        }
    }
}

fn is_slug(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn non_empty<'a>(value: &'a str, message: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::bad_request(message))
    } else {
        Ok(value)
    }
}
