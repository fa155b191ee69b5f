use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::entities::{answer, question, test},
    middleware::{OrgAdminGuard, UserGuard},
    response::{ApiResult, JsonApiResponse},
    services::{QuestionView, ServiceContext, SubmitOutcome},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateTestRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddQuestionRequest {
    pub test_id: Uuid,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AddAnswerRequest {
    pub text: String,
    pub answer_number: i32,
    pub question_id: Uuid,
    pub speciality_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TestQuery {
    pub test_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub test_id: Uuid,
    pub answer_id: i32,
}

#[derive(Debug, Serialize)]
pub struct TestSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<test::Model> for TestSummary {
    fn from(test: test::Model) -> Self {
        Self {
            id: test.id,
            name: test.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestList {
    pub tests: Vec<TestSummary>,
}

#[derive(Debug, Serialize)]
pub struct QuestionCreated {
    pub id: Uuid,
    pub position: i32,
}

impl From<question::Model> for QuestionCreated {
    fn from(question: question::Model) -> Self {
        Self {
            id: question.id,
            position: question.position,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerCreated {
    pub id: Uuid,
    pub answer_number: i32,
}

impl From<answer::Model> for AnswerCreated {
    fn from(answer: answer::Model) -> Self {
        Self {
            id: answer.id,
            answer_number: answer.answer_number,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get-all", get(list_tests))
        .route("/create", post(create_test))
        .route("/add-question", post(add_question))
        .route("/add-answer", post(add_answer))
        .route("/delete", delete(delete_test))
        .route("/{position}/get-question", get(get_question))
        .route("/{position}/answer", post(submit_answer))
        .with_state(state)
}

async fn list_tests(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
) -> ApiResult<TestList> {
    let tests = ServiceContext::from_state(state.as_ref())
        .catalog()
        .list_tests()
        .await?;
    JsonApiResponse::ok(TestList {
        tests: tests.into_iter().map(TestSummary::from).collect(),
    })
}

async fn create_test(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
    Json(body): Json<CreateTestRequest>,
) -> ApiResult<TestSummary> {
    let test = ServiceContext::from_state(state.as_ref())
        .catalog()
        .create_test(&body.name)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Test created", test.into())
}

async fn add_question(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
    Json(body): Json<AddQuestionRequest>,
) -> ApiResult<QuestionCreated> {
    let question = ServiceContext::from_state(state.as_ref())
        .catalog()
        .add_question(body.test_id, &body.text)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Question added", question.into())
}

async fn add_answer(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
    Json(body): Json<AddAnswerRequest>,
) -> ApiResult<AnswerCreated> {
    let answer = ServiceContext::from_state(state.as_ref())
        .catalog()
        .add_answer(
            &body.text,
            body.answer_number,
            body.question_id,
            body.speciality_id,
        )
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Answer added", answer.into())
}

async fn delete_test(
    State(state): State<Arc<AppState>>,
    _guard: OrgAdminGuard,
    Query(query): Query<IdQuery>,
) -> ApiResult<()> {
    ServiceContext::from_state(state.as_ref())
        .catalog()
        .delete_test(query.id)
        .await?;
    JsonApiResponse::message("Test deleted", ())
}

async fn get_question(
    State(state): State<Arc<AppState>>,
    _guard: UserGuard,
    Path(position): Path<i32>,
    Query(query): Query<TestQuery>,
) -> ApiResult<QuestionView> {
    let view = ServiceContext::from_state(state.as_ref())
        .catalog()
        .get_question(query.test_id, position)
        .await?;
    JsonApiResponse::ok(view)
}

async fn submit_answer(
    State(state): State<Arc<AppState>>,
    guard: UserGuard,
    Path(position): Path<i32>,
    Json(body): Json<SubmitAnswerRequest>,
) -> ApiResult<SubmitOutcome> {
    let outcome = ServiceContext::from_state(state.as_ref())
        .scoring()
        .submit_answer(&guard.caller.user, body.test_id, position, body.answer_id)
        .await?;
    JsonApiResponse::message(outcome.message(), outcome)
}
