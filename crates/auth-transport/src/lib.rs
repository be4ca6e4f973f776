//! Credential-exchange wire types and HTTP transport.
//!
//! This crate provides:
//! - The wire data model of the form-based credential exchange
//! - The `CredentialTransport` capability trait the coordinator dispatches to
//! - An HTTP implementation over `reqwest`

mod error;
mod http;
mod types;

use async_trait::async_trait;

pub use error::{TransportError, TransportResult};
pub use http::{HttpCredentialTransport, TransportConfig, DEFAULT_CSRF_PATH, DEFAULT_LOGIN_PATH};
pub use types::{
    AuthMode, CredentialForm, DirectoryProfile, DirectoryRecord, LoginResult, RequestOptions,
    FORM_URLENCODED,
};

/// Capability interface over the credential-exchange endpoints.
///
/// Implementations do not retry; retry policy, if any, belongs to the caller.
#[async_trait]
pub trait CredentialTransport: Send + Sync {
    /// Submit the login payload. Non-2xx responses fail with a
    /// [`TransportError`] that distinguishes credential rejection from
    /// network or server faults.
    async fn submit_credentials(
        &self,
        payload: &CredentialForm,
        options: RequestOptions,
    ) -> TransportResult<LoginResult>;

    /// Fetch the directory profile behind a login result's link.
    async fn fetch_directory_profile(&self, link: &str) -> TransportResult<DirectoryProfile>;

    /// Fetch a fresh single-use CSRF token.
    async fn fetch_csrf_token(&self) -> TransportResult<String>;
}
