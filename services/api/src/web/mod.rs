pub mod chat_task;
pub mod community;
pub mod error;
pub mod meetings;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use rest::ApiDoc;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Form posts are small; anything larger is rejected before it reaches a handler.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application router. Every endpoint is served both at the
/// root and under `/api`.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let api_routes: Router<Arc<AppState>> = Router::new()
        .route("/chat", post(rest::chat_handler))
        .route("/health", get(rest::health_handler))
        .route(
            "/visitors",
            get(rest::visitor_count_handler).post(rest::record_visit_handler),
        )
        .route(
            "/questions",
            get(community::list_questions_handler).post(community::create_question_handler),
        )
        .route(
            "/questions/{id}",
            get(community::get_question_handler)
                .patch(community::update_question_handler)
                .delete(community::delete_question_handler),
        )
        .route(
            "/questions/{id}/replies",
            post(community::create_reply_handler),
        )
        .route("/community/stats", get(community::stats_handler))
        .route(
            "/meetings",
            get(meetings::list_meetings_handler).post(meetings::create_meeting_handler),
        )
        .route(
            "/meetings/availability",
            get(meetings::availability_handler),
        )
        .route(
            "/meetings/{id}",
            get(meetings::get_meeting_handler)
                .put(meetings::update_meeting_handler)
                .delete(meetings::delete_meeting_handler),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    Router::new()
        .merge(api_routes.clone())
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
