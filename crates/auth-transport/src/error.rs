//! Transport error types.

use thiserror::Error;

/// Failure of a credential, profile, or CSRF transport call.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The server rejected the submitted credentials (401/403).
    #[error("Credentials rejected ({status}): {detail}")]
    CredentialsRejected { status: u16, detail: String },

    /// Any other non-2xx response.
    #[error("Unexpected status {status} from {endpoint}: {detail}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        detail: String,
    },

    /// Network-level failure (connect, timeout, body read, decode).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed endpoint or profile link.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl TransportError {
    /// Returns true when the failure is a credential rejection rather than a
    /// network or server fault.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, TransportError::CredentialsRejected { .. })
    }
}

/// Result type alias using TransportError.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_is_distinguished_from_server_fault() {
        let rejected = TransportError::CredentialsRejected {
            status: 401,
            detail: "bad password".into(),
        };
        assert!(rejected.is_credential_rejection());

        let fault = TransportError::UnexpectedStatus {
            endpoint: "/api/auth/login".into(),
            status: 502,
            detail: "bad gateway".into(),
        };
        assert!(!fault.is_credential_rejection());
    }
}
