//! Command-line login against a deployed target.
//!
//! Drives the non-OIDC authentication strategies end to end: selects the
//! mode (fetching a CSRF token when required), submits the credentials, and
//! prints the login result and linked directory profile.

use anyhow::Context;
use async_trait::async_trait;
use auth_transport::{AuthMode, HttpCredentialTransport, TransportConfig};
use clap::{Parser, ValueEnum};
use identity_session::{
    GatewayError, IdentitySessionClient, ProviderGateway, ProviderSettings, SessionIdentity,
    SessionStatus,
};
use login_orchestrator::{InMemorySessionStore, LoginOrchestrator, Navigator};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMode {
    Basic,
    Html,
    Csrf,
    OidcPassword,
}

impl From<CliMode> for AuthMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Basic => AuthMode::Basic,
            CliMode::Html => AuthMode::Html,
            CliMode::Csrf => AuthMode::Csrf,
            CliMode::OidcPassword => AuthMode::OidcPassword,
        }
    }
}

/// Login command-line interface.
#[derive(Parser)]
#[command(name = "login-cli")]
#[command(about = "Credential login against a deployed target")]
#[command(version)]
struct Cli {
    /// Base URL of the target, e.g. https://app.example.com
    #[arg(long, env = "LOGIN_BASE_URL")]
    base_url: String,

    /// Authentication strategy
    #[arg(long, value_enum, default_value = "basic")]
    mode: CliMode,

    /// Login identifier (email)
    #[arg(long)]
    user: String,

    /// Password
    #[arg(long, env = "LOGIN_PASSWORD", hide_env_values = true)]
    password: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

/// Gateway for hosts without an interactive user agent. Every provider
/// operation reports that no redirect or popup can be opened here.
struct DisabledGateway;

impl DisabledGateway {
    fn unavailable() -> GatewayError {
        GatewayError::Rejected("no interactive user agent available".into())
    }
}

#[async_trait]
impl ProviderGateway for DisabledGateway {
    async fn query_session_status(&self) -> Result<Option<SessionStatus>, GatewayError> {
        Err(Self::unavailable())
    }

    async fn signin_redirect(&self, _state: &str) -> Result<(), GatewayError> {
        Err(Self::unavailable())
    }

    async fn signin_popup(&self, _state: &str) -> Result<SessionIdentity, GatewayError> {
        Err(Self::unavailable())
    }

    async fn signin_silent(&self, _state: &str) -> Result<SessionIdentity, GatewayError> {
        Err(Self::unavailable())
    }

    async fn signout_popup(&self, _state: &str) -> Result<(), GatewayError> {
        Err(Self::unavailable())
    }

    async fn load_user(&self) -> Result<Option<SessionIdentity>, GatewayError> {
        Ok(None)
    }

    async fn store_user(&self, _user: &SessionIdentity) -> Result<(), GatewayError> {
        Err(Self::unavailable())
    }

    async fn remove_user(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn clear_stale_state(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

/// Prints the hard navigation a browser host would perform.
struct AnnouncingNavigator;

impl Navigator for AnnouncingNavigator {
    fn navigate(&self, location: &str) {
        println!("login complete, navigating to {location}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let transport = Arc::new(HttpCredentialTransport::new(TransportConfig::new(
        cli.base_url.clone(),
    )));
    let identity = Arc::new(IdentitySessionClient::new(
        Arc::new(DisabledGateway),
        ProviderSettings::default(),
    ));
    let orchestrator = LoginOrchestrator::new(
        transport,
        identity,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(AnnouncingNavigator),
    );

    orchestrator.select_mode(cli.mode.into()).await;
    orchestrator.set_user(&cli.user);
    orchestrator.set_password(&cli.password);

    orchestrator.submit().await.context("login failed")?;

    if let Some(login) = orchestrator.last_login() {
        println!("signed in as {}", login.email);
    }
    if let Some(profile) = orchestrator.last_profile() {
        for record in profile {
            println!(
                "directory record: {} {} <{}>",
                record.first_name, record.last_name, record.email
            );
        }
    }
    Ok(())
}
