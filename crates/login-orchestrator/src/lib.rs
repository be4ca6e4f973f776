//! Login orchestration core.
//!
//! This crate provides:
//! - The mode selector over the four authentication strategies
//! - The credential submission coordinator with per-mode request construction
//! - The post-login side-effect chain (directory profile fetch + navigation)
//! - The session-check fallback chain for OIDC session recovery

mod effects;
mod error;
mod orchestrator;
mod session_check;

#[cfg(test)]
mod tests;

pub use effects::{
    InMemorySessionStore, Navigator, SessionStore, APP_ROOT, EMAIL_SESSION_KEY,
};
pub use error::{OrchestratorError, OrchestratorResult};
pub use orchestrator::LoginOrchestrator;
pub use session_check::SessionCheckOutcome;

pub use auth_transport::{AuthMode, CredentialForm, CredentialTransport, LoginResult};
pub use identity_session::{IdentitySessionClient, ProviderSettings, SessionEvent};
