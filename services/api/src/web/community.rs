//! services/api/src/web/community.rs
//!
//! Handlers for the community Q&A board.

use crate::web::{
    error::{ErrorResponse, HttpError},
    state::{run_blocking, AppState},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use portfolio_core::{NewQuestion, NewReply, Question, QuestionPatch, Reply, SortKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reply_count: usize,
    pub replies: Vec<ReplyView>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            title: question.title.clone(),
            description: question.description.clone(),
            author: question.author.clone(),
            email: question.email.clone(),
            created_at: question.created_at,
            reply_count: question.replies.len(),
            replies: question.replies.iter().map(ReplyView::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: u64,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text.clone(),
            author: reply.author.clone(),
            created_at: reply.created_at,
        }
    }
}

/// The "ask a question" form. The site posts the author as `name`.
#[derive(Serialize, Deserialize, Default, ToSchema)]
#[serde(default)]
pub struct CreateQuestionRequest {
    pub title: String,
    pub description: String,
    #[serde(alias = "name")]
    pub author: String,
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Default, ToSchema)]
#[serde(default)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// An empty string clears the email.
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Default, ToSchema)]
#[serde(default)]
pub struct CreateReplyRequest {
    pub text: String,
    #[serde(alias = "name")]
    pub author: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_questions: usize,
    pub total_answers: usize,
    pub unique_authors: usize,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// `newest` (default), `popular` or `unanswered`. Anything else means `newest`.
    pub sort: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List questions.
#[utoipa::path(
    get,
    path = "/questions",
    params(ListQuery),
    responses(
        (status = 200, description = "Questions in the requested order", body = [QuestionView])
    )
)]
pub async fn list_questions_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<QuestionView>> {
    let sort = query.sort.as_deref().map(SortKey::parse).unwrap_or_default();
    let board = app_state.board.lock().await;
    Json(board.list(sort).into_iter().map(QuestionView::from).collect())
}

/// Post a new question.
#[utoipa::path(
    post,
    path = "/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question posted", body = QuestionView),
        (status = 400, description = "Missing title or author", body = ErrorResponse)
    )
)]
pub async fn create_question_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(request) = payload?;
    let question = run_blocking(&app_state.board, move |board| {
        board.create(NewQuestion {
            title: request.title,
            description: request.description,
            author: request.author,
            email: request.email,
        })
    })
    .await?;

    info!("Question {} posted by {}", question.id, question.author);
    Ok((StatusCode::CREATED, Json(QuestionView::from(&question))))
}

/// Fetch one question with its replies.
#[utoipa::path(
    get,
    path = "/questions/{id}",
    params(("id" = u64, Path, description = "Question id")),
    responses(
        (status = 200, description = "The question", body = QuestionView),
        (status = 404, description = "No such question", body = ErrorResponse)
    )
)]
pub async fn get_question_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<QuestionView>, HttpError> {
    let Path(id) = id?;
    let board = app_state.board.lock().await;
    let question = board.get(id)?;
    Ok(Json(QuestionView::from(question)))
}

/// Edit a question's title, description or email.
#[utoipa::path(
    patch,
    path = "/questions/{id}",
    params(("id" = u64, Path, description = "Question id")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Updated question", body = QuestionView),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "No such question", body = ErrorResponse)
    )
)]
pub async fn update_question_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<UpdateQuestionRequest>, JsonRejection>,
) -> Result<Json<QuestionView>, HttpError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let question = run_blocking(&app_state.board, move |board| {
        board.update(
            id,
            QuestionPatch {
                title: request.title,
                description: request.description,
                email: request.email,
            },
        )
    })
    .await?;
    Ok(Json(QuestionView::from(&question)))
}

/// Delete a question and all of its replies.
#[utoipa::path(
    delete,
    path = "/questions/{id}",
    params(("id" = u64, Path, description = "Question id")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 404, description = "No such question", body = ErrorResponse)
    )
)]
pub async fn delete_question_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, HttpError> {
    let Path(id) = id?;
    let removed = run_blocking(&app_state.board, move |board| board.remove(id)).await?;
    info!(
        "Question {} deleted with {} replies",
        removed.id,
        removed.replies.len()
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Answer a question.
#[utoipa::path(
    post,
    path = "/questions/{id}/replies",
    params(("id" = u64, Path, description = "Question id")),
    request_body = CreateReplyRequest,
    responses(
        (status = 201, description = "Reply posted", body = ReplyView),
        (status = 400, description = "Missing text or author", body = ErrorResponse),
        (status = 404, description = "No such question", body = ErrorResponse)
    )
)]
pub async fn create_reply_handler(
    State(app_state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<CreateReplyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let reply = run_blocking(&app_state.board, move |board| {
        board.add_reply(
            id,
            NewReply {
                text: request.text,
                author: request.author,
            },
        )
    })
    .await?;
    Ok((StatusCode::CREATED, Json(ReplyView::from(&reply))))
}

/// Board totals: questions, answers and distinct authors.
#[utoipa::path(
    get,
    path = "/community/stats",
    responses(
        (status = 200, description = "Board totals", body = StatsResponse)
    )
)]
pub async fn stats_handler(State(app_state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let stats = app_state.board.lock().await.stats();
    Json(StatsResponse {
        total_questions: stats.total_questions,
        total_answers: stats.total_answers,
        unique_authors: stats.unique_authors,
    })
}
