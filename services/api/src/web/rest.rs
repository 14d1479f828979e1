//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the chat and health endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    community, meetings,
    error::{ErrorResponse, HttpError},
    state::{run_blocking, AppState},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        chat_handler,
        health_handler,
        visitor_count_handler,
        record_visit_handler,
        community::list_questions_handler,
        community::create_question_handler,
        community::get_question_handler,
        community::update_question_handler,
        community::delete_question_handler,
        community::create_reply_handler,
        community::stats_handler,
        meetings::list_meetings_handler,
        meetings::create_meeting_handler,
        meetings::get_meeting_handler,
        meetings::update_meeting_handler,
        meetings::delete_meeting_handler,
        meetings::availability_handler,
    ),
    components(
        schemas(
            ChatRequest,
            ChatResponse,
            HealthResponse,
            VisitorsResponse,
            ErrorResponse,
            community::QuestionView,
            community::ReplyView,
            community::CreateQuestionRequest,
            community::UpdateQuestionRequest,
            community::CreateReplyRequest,
            community::StatsResponse,
            meetings::MeetingView,
            meetings::MeetingPayload,
            meetings::Minutes,
            meetings::AvailabilityView,
        )
    ),
    tags(
        (name = "Portfolio API", description = "Chatbot, community Q&A and meeting scheduler endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub remote_configured: bool,
    pub model: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct VisitorsResponse {
    pub visitors: u64,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Ask the portfolio chatbot a question.
///
/// Uses the remote chat-completion service when one is configured and falls
/// back to the keyword table otherwise, so a valid message always gets a reply.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chatbot reply", body = ChatResponse),
        (status = 400, description = "Missing message or malformed body", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, HttpError> {
    let Json(request) = payload?;
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| HttpError::bad_request("Message is required"))?;

    let response = app_state.responder.respond(&message).await;
    Ok(Json(ChatResponse { response }))
}

/// Report liveness and whether the remote chat service is configured.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        remote_configured: app_state.responder.is_remote_configured(),
        model: app_state.config.chat_model.clone(),
    })
}

/// Current page-view count.
#[utoipa::path(
    get,
    path = "/visitors",
    responses(
        (status = 200, description = "Page views so far", body = VisitorsResponse)
    )
)]
pub async fn visitor_count_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<VisitorsResponse>, HttpError> {
    let visitors = run_blocking(&app_state.visitors, |counter| counter.count()).await?;
    Ok(Json(VisitorsResponse { visitors }))
}

/// Count one page view and return the new total.
#[utoipa::path(
    post,
    path = "/visitors",
    responses(
        (status = 200, description = "Page views including this one", body = VisitorsResponse)
    )
)]
pub async fn record_visit_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<VisitorsResponse>, HttpError> {
    let visitors = run_blocking(&app_state.visitors, |counter| counter.record_visit()).await?;
    Ok(Json(VisitorsResponse { visitors }))
}
