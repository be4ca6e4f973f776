//! Orchestrator error types.

use auth_transport::TransportError;
use identity_session::ProviderError;
use thiserror::Error;

/// Failure surfaced by the login orchestrator.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Credential, profile, or CSRF transport failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Identity-provider operation failure.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// CSRF-mode submission attempted with no fetched token held.
    #[error("CSRF submission blocked: no token held")]
    MissingCsrfToken,

    /// A session check is already in flight; duplicate popups are not opened.
    #[error("Session check already in flight")]
    SessionCheckInFlight,

    /// Invalid transition in the session-check lifecycle machine.
    #[error("Invalid session-check transition: {0}")]
    InvalidCheckTransition(String),
}

/// Result type alias using OrchestratorError.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
