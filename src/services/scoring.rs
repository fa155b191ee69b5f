use std::collections::BTreeMap;

use sea_orm::Set;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    config::CompletionRule,
    db::{
        dao::{DaoBase, DaoContext},
        entities::user,
    },
    error::AppError,
    services::CatalogService,
};

pub const TEST_PASSED: &str = "Test passed!";
pub const ANSWER_ACCEPTED: &str = "OK!";

/// Per-user speciality scores, keyed by speciality id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard(BTreeMap<Uuid, i64>);

impl ScoreBoard {
    /// Reads the stored JSON map. Entries that are not `uuid -> integer` are skipped.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let scores = object
            .iter()
            .filter_map(|(key, score)| Some((Uuid::parse_str(key).ok()?, score.as_i64()?)))
            .collect();
        Self(scores)
    }

    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .0
            .iter()
            .map(|(id, score)| (id.to_string(), Value::from(*score)))
            .collect();
        Value::Object(object)
    }

    pub fn record(&mut self, speciality_id: Uuid) {
        *self.0.entry(speciality_id).or_insert(0) += 1;
    }

    pub fn score(&self, speciality_id: Uuid) -> i64 {
        self.0.get(&speciality_id).copied().unwrap_or_default()
    }

    /// Highest score wins; ties go to the lowest speciality id.
    pub fn leader(&self) -> Option<Uuid> {
        let mut best: Option<(Uuid, i64)> = None;
        for (&id, &score) in &self.0 {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((id, score)),
            }
        }
        best.map(|(id, _)| id)
    }
}

pub fn is_complete(
    rule: CompletionRule,
    answer_id: i32,
    answers_count: usize,
    is_last_question: bool,
) -> bool {
    match rule {
        CompletionRule::LastAnswer => usize::try_from(answer_id).ok() == Some(answers_count),
        CompletionRule::LastQuestion => is_last_question,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub finally: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speciality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SubmitOutcome {
    pub fn message(&self) -> &'static str {
        if self.finally { TEST_PASSED } else { ANSWER_ACCEPTED }
    }
}

#[derive(Clone)]
pub struct ScoringService {
    daos: DaoContext,
    completion_rule: CompletionRule,
}

impl ScoringService {
    pub fn new(daos: DaoContext, completion_rule: CompletionRule) -> Self {
        Self {
            daos,
            completion_rule,
        }
    }

    /// Records the chosen answer for the question at `position` and reports
    /// whether the test is finished.
    ///
    /// `answer_id` is the 1-based index into the question's answers ordered
    /// by number.
    pub async fn submit_answer(
        &self,
        user: &user::Model,
        test_id: Uuid,
        position: i32,
        answer_id: i32,
    ) -> Result<SubmitOutcome, AppError> {
        let question = CatalogService::new(self.daos.clone())
            .question_at(test_id, position)
            .await?;
        let answers = self.daos.answer().list_for_question(question.id).await?;

        let chosen = usize::try_from(answer_id)
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| answers.get(index))
            .ok_or_else(|| AppError::not_found("Answer not found"))?;

        let mut board = ScoreBoard::from_json(&user.scores);
        board.record(chosen.speciality_id);
        let scores = board.to_json();
        self.daos
            .user()
            .save_with(user.clone(), move |active| {
                active.scores = Set(scores);
            })
            .await?;

        if !is_complete(self.completion_rule, answer_id, answers.len(), question.is_last) {
            return Ok(SubmitOutcome {
                finally: false,
                speciality: None,
                text: None,
            });
        }

        let leader = board
            .leader()
            .ok_or_else(|| AppError::internal("Score board is empty after recording"))?;
        let speciality = self.daos.speciality().find_by_id(leader).await?;
        tracing::info!(
            user_id = %user.id,
            %test_id,
            speciality_id = %speciality.id,
            score = board.score(speciality.id),
            "test completed"
        );

        Ok(SubmitOutcome {
            finally: true,
            text: Some(format!(
                "Based on the test results you are a natural-born {}!",
                speciality.name
            )),
            speciality: Some(speciality.name),
        })
    }
}
