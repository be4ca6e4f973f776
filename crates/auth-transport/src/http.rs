//! HTTP implementation of the credential transport over `reqwest`.

use crate::error::{TransportError, TransportResult};
use crate::types::{
    CredentialForm, DirectoryProfile, LoginResult, RequestOptions, FORM_URLENCODED,
};
use crate::CredentialTransport;
use async_trait::async_trait;
use url::Url;

/// Default login endpoint path.
pub const DEFAULT_LOGIN_PATH: &str = "/api/auth/login";

/// Default CSRF token endpoint path.
pub const DEFAULT_CSRF_PATH: &str = "/api/auth/csrf";

/// Cap on response-body text carried inside an error.
const DETAIL_LIMIT: usize = 256;

/// Endpoint configuration for [`HttpCredentialTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL of the deployed target, e.g. `https://app.example.com`.
    pub base_url: String,
    /// Path the login payload is posted to.
    pub login_path: String,
    /// Path the single-use CSRF token is fetched from.
    pub csrf_path: String,
}

impl TransportConfig {
    /// Configuration with the default endpoint paths.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            csrf_path: DEFAULT_CSRF_PATH.to_string(),
        }
    }
}

/// Credential transport backed by an HTTP API.
#[derive(Clone)]
pub struct HttpCredentialTransport {
    http_client: reqwest::Client,
    config: TransportConfig,
}

impl HttpCredentialTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Resolve a directory-profile link, which may be absolute or relative to
    /// the base URL.
    fn resolve_link(&self, link: &str) -> TransportResult<String> {
        if link.starts_with("http://") || link.starts_with("https://") {
            return Ok(link.to_string());
        }
        let base = Url::parse(&self.config.base_url)?;
        Ok(base.join(link)?.to_string())
    }

    async fn fail_on_status(
        endpoint: &str,
        response: reqwest::Response,
    ) -> TransportResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = truncate_detail(&response.text().await.unwrap_or_default());
        tracing::error!(endpoint, status = status.as_u16(), "Transport call failed");
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TransportError::CredentialsRejected {
                status: status.as_u16(),
                detail,
            });
        }
        Err(TransportError::UnexpectedStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl CredentialTransport for HttpCredentialTransport {
    async fn submit_credentials(
        &self,
        payload: &CredentialForm,
        options: RequestOptions,
    ) -> TransportResult<LoginResult> {
        let endpoint = self.endpoint(&self.config.login_path);
        tracing::debug!(endpoint, mode = ?payload.op, "Submitting credentials");

        let request = self.http_client.post(&endpoint);
        let request = match options.content_type.as_deref() {
            Some(FORM_URLENCODED) => request.form(payload),
            _ => request.json(payload),
        };

        let response = Self::fail_on_status(&endpoint, request.send().await?).await?;
        let result: LoginResult = response.json().await?;
        tracing::info!(email = %result.email, "Login accepted");
        Ok(result)
    }

    async fn fetch_directory_profile(&self, link: &str) -> TransportResult<DirectoryProfile> {
        let endpoint = self.resolve_link(link)?;
        tracing::debug!(endpoint, "Fetching directory profile");
        let response = self.http_client.get(&endpoint).send().await?;
        let response = Self::fail_on_status(&endpoint, response).await?;
        let profile: DirectoryProfile = response.json().await?;
        tracing::debug!(records = profile.len(), "Directory profile fetched");
        Ok(profile)
    }

    async fn fetch_csrf_token(&self) -> TransportResult<String> {
        let endpoint = self.endpoint(&self.config.csrf_path);
        tracing::debug!(endpoint, "Fetching CSRF token");
        let response = self.http_client.get(&endpoint).send().await?;
        let response = Self::fail_on_status(&endpoint, response).await?;
        let token = response.text().await?;
        Ok(token.trim().to_string())
    }
}

fn truncate_detail(body: &str) -> String {
    if body.len() <= DETAIL_LIMIT {
        body.to_string()
    } else {
        let mut end = DETAIL_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body[..end].to_string()
    }
}
