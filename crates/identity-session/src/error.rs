//! Identity provider error types.

use std::time::Duration;
use thiserror::Error;

/// Failure reported by the underlying identity library.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The user closed the popup before the flow completed.
    #[error("popup closed by user")]
    PopupClosed,

    /// The provider rejected the request.
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    /// Transport-level failure reaching the provider.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Failure of an Identity-Session Client operation, wrapping the underlying
/// transport or protocol failure. None of the operations retry internally.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A protocol operation failed.
    #[error("{operation} failed: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: GatewayError,
    },

    /// The user dismissed the popup. An ordinary failure, not a hang.
    #[error("popup closed by user during {operation}")]
    PopupClosed { operation: &'static str },

    /// A silent flow exceeded the configured request timeout.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl ProviderError {
    pub(crate) fn wrap(operation: &'static str, source: GatewayError) -> Self {
        match source {
            GatewayError::PopupClosed => ProviderError::PopupClosed { operation },
            other => ProviderError::Operation {
                operation,
                source: other,
            },
        }
    }

    /// Returns true when the failure was the user dismissing a popup.
    pub fn is_popup_closed(&self) -> bool {
        matches!(self, ProviderError::PopupClosed { .. })
    }
}

/// Result type alias using ProviderError.
pub type ProviderResult<T> = Result<T, ProviderError>;
