//! Identity provider configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default authority URL (can be overridden at compile time via OIDC_AUTHORITY).
pub const DEFAULT_AUTHORITY: &str = match option_env!("OIDC_AUTHORITY") {
    Some(url) => url,
    None => "http://localhost:8080/auth/realms/master",
};

/// Default client identifier (can be overridden at compile time via OIDC_CLIENT_ID).
pub const DEFAULT_CLIENT_ID: &str = match option_env!("OIDC_CLIENT_ID") {
    Some(id) => id,
    None => "glasskey-login",
};

const DEFAULT_REDIRECT_URI: &str = "http://localhost:3001";
const DEFAULT_RESPONSE_TYPE: &str = "id_token token";
const DEFAULT_SCOPE: &str = "openid email";
const DEFAULT_SILENT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_EXPIRING_LEAD_SECS: u64 = 60;

/// Fixed identity-provider configuration.
///
/// These values are configuration, not runtime-negotiable by the
/// orchestration core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Authority (issuer) URL.
    #[serde(default = "default_authority")]
    pub authority: String,
    /// Registered client identifier.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Redirect URI for the full-page sign-in.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Redirect URI after sign-out.
    #[serde(default = "default_redirect_uri")]
    pub post_logout_redirect_uri: String,
    /// Redirect URI for the popup variant.
    #[serde(default = "default_redirect_uri")]
    pub popup_redirect_uri: String,
    /// Redirect URI for the silent (iframe) variant.
    #[serde(default = "default_redirect_uri")]
    pub silent_redirect_uri: String,
    /// OIDC response type.
    #[serde(default = "default_response_type")]
    pub response_type: String,
    /// Requested scopes.
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Whether the client answers token-expiring events with a silent renew.
    #[serde(default = "default_true")]
    pub automatic_silent_renew: bool,
    /// Upper bound on a silent sign-in request.
    #[serde(default = "default_silent_timeout_ms")]
    pub silent_request_timeout_ms: u64,
    /// Lead time before expiry at which the expiring notification fires.
    #[serde(default = "default_expiring_lead_secs")]
    pub expiring_lead_secs: u64,
}

fn default_authority() -> String {
    DEFAULT_AUTHORITY.to_string()
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_response_type() -> String {
    DEFAULT_RESPONSE_TYPE.to_string()
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_silent_timeout_ms() -> u64 {
    DEFAULT_SILENT_REQUEST_TIMEOUT_MS
}

fn default_expiring_lead_secs() -> u64 {
    DEFAULT_EXPIRING_LEAD_SECS
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            authority: default_authority(),
            client_id: default_client_id(),
            redirect_uri: default_redirect_uri(),
            post_logout_redirect_uri: default_redirect_uri(),
            popup_redirect_uri: default_redirect_uri(),
            silent_redirect_uri: default_redirect_uri(),
            response_type: default_response_type(),
            scope: default_scope(),
            automatic_silent_renew: true,
            silent_request_timeout_ms: DEFAULT_SILENT_REQUEST_TIMEOUT_MS,
            expiring_lead_secs: DEFAULT_EXPIRING_LEAD_SECS,
        }
    }
}

impl ProviderSettings {
    /// Silent-request timeout as a [`Duration`].
    pub fn silent_request_timeout(&self) -> Duration {
        Duration::from_millis(self.silent_request_timeout_ms)
    }

    /// Expiring-notification lead as a [`Duration`].
    pub fn expiring_lead(&self) -> Duration {
        Duration::from_secs(self.expiring_lead_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_configuration() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.response_type, "id_token token");
        assert_eq!(settings.scope, "openid email");
        assert!(settings.automatic_silent_renew);
        assert_eq!(settings.silent_request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.expiring_lead(), Duration::from_secs(60));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let settings: ProviderSettings = serde_json::from_str(
            r#"{"authority": "https://idp.example.com/realms/main", "client_id": "abc"}"#,
        )
        .unwrap();
        assert_eq!(settings.authority, "https://idp.example.com/realms/main");
        assert_eq!(settings.client_id, "abc");
        assert_eq!(settings.scope, "openid email");
    }
}
