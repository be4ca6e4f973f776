//! Capability interface over the external identity library.
//!
//! Token storage, validation, and signature checks live behind this seam;
//! the session client only sequences the protocol operations and publishes
//! lifecycle events.

use crate::error::GatewayError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use async_trait::async_trait;

/// Established identity/session object.
///
/// Opaque to the orchestration core, which only tests presence or absence.
/// The session client reads `expires_at` to schedule expiry notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Subject identifier.
    pub subject: String,
    /// Access-token expiry, when the provider communicated one.
    pub expires_at: Option<DateTime<Utc>>,
    /// Raw claims, uninterpreted here.
    #[serde(default)]
    pub claims: serde_json::Value,
}

/// Result of a session status query at the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Subject the provider reports the session for.
    pub sub: String,
    /// Provider session identifier, when reported.
    pub sid: Option<String>,
}

/// Protocol operations delegated to the identity library.
///
/// Implementations perform the raw OIDC exchanges (including user-agent
/// hand-offs for the redirect, popup, and iframe variants) and own token
/// persistence. They do not retry.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Query the provider for the current session. `Ok(None)` means no
    /// active session, a negotiated outcome rather than a failure.
    async fn query_session_status(&self) -> Result<Option<SessionStatus>, GatewayError>;

    /// Start the full-page redirect sign-in. On success the execution
    /// context unloads; control does not return on the success path.
    async fn signin_redirect(&self, state: &str) -> Result<(), GatewayError>;

    /// Interactive popup sign-in.
    async fn signin_popup(&self, state: &str) -> Result<SessionIdentity, GatewayError>;

    /// Silent (hidden iframe) sign-in.
    async fn signin_silent(&self, state: &str) -> Result<SessionIdentity, GatewayError>;

    /// Popup sign-out.
    async fn signout_popup(&self, state: &str) -> Result<(), GatewayError>;

    /// Load the locally stored identity, if any.
    async fn load_user(&self) -> Result<Option<SessionIdentity>, GatewayError>;

    /// Persist an identity into the library's store.
    async fn store_user(&self, user: &SessionIdentity) -> Result<(), GatewayError>;

    /// Remove the locally stored identity.
    async fn remove_user(&self) -> Result<(), GatewayError>;

    /// Clear stale interim protocol state (unfinished flows).
    async fn clear_stale_state(&self) -> Result<(), GatewayError>;
}
