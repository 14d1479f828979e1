//! services/api/src/web/chat_task.rs
//!
//! Resolves one chatbot reply: ask the remote chat-completion service, and fall
//! back to the local keyword table on any failure. Callers always get text back.

use portfolio_core::{ChatCompletionService, KeywordResponder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub struct RemoteResponder {
    remote: Option<Arc<dyn ChatCompletionService>>,
    fallback: KeywordResponder,
    timeout: Duration,
}

impl RemoteResponder {
    /// `remote` is `None` when no API credential is configured; every reply then
    /// comes from `fallback`.
    pub fn new(
        remote: Option<Arc<dyn ChatCompletionService>>,
        fallback: KeywordResponder,
        timeout: Duration,
    ) -> Self {
        Self {
            remote,
            fallback,
            timeout,
        }
    }

    pub fn is_remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    pub fn fallback_reply(&self, message: &str) -> String {
        self.fallback.respond(message).to_string()
    }

    /// Makes a single attempt against the remote service, bounded by the
    /// configured timeout. No retries.
    pub async fn respond(&self, message: &str) -> String {
        let Some(remote) = &self.remote else {
            warn!("Chat API key not configured. Using fallback responses.");
            return self.fallback_reply(message);
        };

        let start_time = Instant::now();
        match tokio::time::timeout(self.timeout, remote.complete(message)).await {
            Ok(Ok(reply)) => {
                info!("Remote chat reply received in {:?}", start_time.elapsed());
                reply
            }
            Ok(Err(e)) => {
                error!("Chat API error, using fallback: {}", e);
                self.fallback_reply(message)
            }
            Err(_) => {
                error!(
                    "Chat API timed out after {:?}, using fallback",
                    self.timeout
                );
                self.fallback_reply(message)
            }
        }
    }
}
