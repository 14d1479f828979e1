//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::web::{chat_task::RemoteResponder, error::HttpError};
use axum::http::StatusCode;
use portfolio_core::{MeetingScheduler, PortResult, QuestionBoard, VisitorCounter};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The chat side is read-only. Each persisted collection sits behind its own
/// lock, so two mutations of the same collection never interleave.
pub struct AppState {
    pub config: Arc<Config>,
    pub responder: RemoteResponder,
    pub board: Arc<Mutex<QuestionBoard>>,
    pub scheduler: Arc<Mutex<MeetingScheduler>>,
    pub visitors: Arc<Mutex<VisitorCounter>>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        responder: RemoteResponder,
        board: QuestionBoard,
        scheduler: MeetingScheduler,
        visitors: VisitorCounter,
    ) -> Self {
        Self {
            config,
            responder,
            board: Arc::new(Mutex::new(board)),
            scheduler: Arc::new(Mutex::new(scheduler)),
            visitors: Arc::new(Mutex::new(visitors)),
        }
    }
}

/// Locks `target` and runs `work` on the blocking pool. Anything that touches
/// the key/value store goes through here, since the store does synchronous
/// file I/O. Reads served from memory just take the lock.
pub async fn run_blocking<S, T, F>(target: &Arc<Mutex<S>>, work: F) -> Result<T, HttpError>
where
    S: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut S) -> PortResult<T> + Send + 'static,
{
    let mut guard = target.clone().lock_owned().await;
    let result = tokio::task::spawn_blocking(move || work(&mut *guard))
        .await
        .map_err(|e| {
            error!("Storage task failed: {}", e);
            HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })?;
    Ok(result?)
}
