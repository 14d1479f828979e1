//! crates/portfolio_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core depends on.
//! These traits form the boundary of the hexagonal architecture: the core never
//! touches a filesystem or the network directly, only these ports.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type for all core operations and port implementations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// A required field was missing, empty, or malformed. Names the field.
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A persisted collection could not be read back.
    #[error("Persisted data is corrupt: {0}")]
    Corrupt(String),
    /// The remote chat-completion service failed.
    #[error("External service error: {0}")]
    ExternalService(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// String key/value storage, the server-side stand-in for browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing is stored under `key`.
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> PortResult<()>;
}

#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Sends one user message (with the adapter's own system prompt) and returns
    /// the first completion text.
    async fn complete(&self, message: &str) -> PortResult<String>;
}
