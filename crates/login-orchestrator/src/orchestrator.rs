//! Mode selection and credential submission coordination.

use crate::effects::{Navigator, SessionStore, APP_ROOT, EMAIL_SESSION_KEY};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::session_check::CheckMachine;
use auth_transport::{
    AuthMode, CredentialForm, CredentialTransport, DirectoryProfile, LoginResult, RequestOptions,
};
use identity_session::IdentitySessionClient;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Mutable state shared between the mode selector and the coordinator.
///
/// Owned exclusively by this pair; event-channel callbacks never touch it.
/// The mutex is only held for synchronous snapshots and writes, never across
/// an await.
struct FormState {
    form: CredentialForm,
    /// Bumped on every mode selection; a CSRF fetch only installs its token
    /// when the epoch it was started under is still current.
    csrf_epoch: u64,
    /// Bumped when a login result is committed; gates the post-login chain.
    login_seq: u64,
    last_login: Option<LoginResult>,
    last_profile: Option<DirectoryProfile>,
}

/// Orchestrates the form-based credential exchange and the OIDC session
/// lifecycle.
///
/// Holds the active authentication mode, the held CSRF token, and the last
/// login response, and sequences the asynchronous negotiation each mode
/// needs: request augmentation and dispatch, the post-login side-effect
/// chain, and the session-check fallback chain.
pub struct LoginOrchestrator {
    transport: Arc<dyn CredentialTransport>,
    identity: Arc<IdentitySessionClient>,
    session_store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<FormState>,
    submit_in_flight: AtomicBool,
    /// Highest login sequence the post-login chain has run for.
    post_login_done: AtomicU64,
    pub(crate) check_machine: Mutex<CheckMachine>,
}

impl LoginOrchestrator {
    pub fn new(
        transport: Arc<dyn CredentialTransport>,
        identity: Arc<IdentitySessionClient>,
        session_store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            identity,
            session_store,
            navigator,
            state: Mutex::new(FormState {
                form: CredentialForm::default(),
                csrf_epoch: 0,
                login_seq: 0,
                last_login: None,
                last_profile: None,
            }),
            submit_in_flight: AtomicBool::new(false),
            post_login_done: AtomicU64::new(0),
            check_machine: Mutex::new(CheckMachine::new()),
        }
    }

    pub(crate) fn identity(&self) -> &IdentitySessionClient {
        &self.identity
    }

    /// Record user input into the identifier field.
    pub fn set_user(&self, user: &str) {
        self.state.lock().unwrap().form.user = user.to_string();
    }

    /// Record user input into the secret field.
    pub fn set_password(&self, password: &str) {
        self.state.lock().unwrap().form.password = password.to_string();
    }

    /// Snapshot of the current form state.
    pub fn form(&self) -> CredentialForm {
        self.state.lock().unwrap().form.clone()
    }

    /// The active authentication mode.
    pub fn mode(&self) -> AuthMode {
        self.state.lock().unwrap().form.op
    }

    /// Last committed login result, if any.
    pub fn last_login(&self) -> Option<LoginResult> {
        self.state.lock().unwrap().last_login.clone()
    }

    /// Last fetched directory profile, a display artifact.
    pub fn last_profile(&self) -> Option<DirectoryProfile> {
        self.state.lock().unwrap().last_profile.clone()
    }

    /// Select the active authentication mode.
    ///
    /// Leaving `Csrf` clears any held token so it cannot leak into another
    /// mode. Every entry into `Csrf`, including a reselect, triggers exactly
    /// one fresh token fetch; a failed fetch is logged and leaves the token
    /// unset, which blocks csrf-mode submission until a later entry succeeds.
    pub async fn select_mode(&self, mode: AuthMode) {
        let epoch = {
            let mut state = self.state.lock().unwrap();
            state.form.op = mode;
            state.form.csrf = None;
            state.csrf_epoch += 1;
            state.csrf_epoch
        };
        debug!(mode = ?mode, "Mode selected");

        if mode != AuthMode::Csrf {
            return;
        }
        match self.transport.fetch_csrf_token().await {
            Ok(token) => {
                let mut state = self.state.lock().unwrap();
                if state.csrf_epoch == epoch {
                    state.form.csrf = Some(token);
                } else {
                    debug!("Discarding CSRF token fetched under a stale mode selection");
                }
            }
            Err(err) => {
                warn!(error = %err, "CSRF token fetch failed; token stays unset");
            }
        }
    }

    /// Submit the current form under the active mode.
    ///
    /// A call arriving while another submission is in flight is suppressed;
    /// at most one dispatch happens per form snapshot. Failure keeps the form
    /// populated and the mode selected.
    pub async fn submit(&self) -> OrchestratorResult<()> {
        if self.submit_in_flight.swap(true, Ordering::SeqCst) {
            debug!("Submission already in flight, suppressing duplicate");
            return Ok(());
        }
        let result = self.dispatch_submission().await;
        self.submit_in_flight.store(false, Ordering::SeqCst);
        result
    }

    /// One handler per mode; adding a mode is a compile-checked change here.
    async fn dispatch_submission(&self) -> OrchestratorResult<()> {
        let form = self.form();
        match form.op {
            AuthMode::Basic => self.submit_basic(form).await,
            AuthMode::Html => self.submit_html(form).await,
            AuthMode::Csrf => self.submit_csrf(form).await,
            AuthMode::OidcPassword => self.submit_oidc_password(form).await,
        }
    }

    async fn submit_basic(&self, form: CredentialForm) -> OrchestratorResult<()> {
        self.dispatch_credentials(form, RequestOptions::default())
            .await
    }

    async fn submit_html(&self, form: CredentialForm) -> OrchestratorResult<()> {
        self.dispatch_credentials(form, RequestOptions::form_encoded())
            .await
    }

    async fn submit_csrf(&self, form: CredentialForm) -> OrchestratorResult<()> {
        if form.csrf.is_none() {
            warn!("CSRF submission blocked: no token held");
            return Err(OrchestratorError::MissingCsrfToken);
        }
        self.dispatch_credentials(form, RequestOptions::default())
            .await
    }

    /// OIDC mode never calls the credential transport. The submitted secret
    /// rides along as opaque request state for redirect correlation; it is
    /// not logged and not persisted beyond the single request. On success the
    /// page unloads and control does not return here.
    async fn submit_oidc_password(&self, form: CredentialForm) -> OrchestratorResult<()> {
        self.identity.signin_redirect(&form.password).await?;
        Ok(())
    }

    /// Dispatch to the credential transport and run the post-success chain.
    ///
    /// The payload and options are fully built before this point, so the
    /// augmentation always completes before the network call is issued.
    async fn dispatch_credentials(
        &self,
        payload: CredentialForm,
        options: RequestOptions,
    ) -> OrchestratorResult<()> {
        let result = self.transport.submit_credentials(&payload, options).await?;

        let seq = {
            let mut state = self.state.lock().unwrap();
            state.login_seq += 1;
            state.last_login = Some(result.clone());
            state.login_seq
        };
        self.session_store.put(EMAIL_SESSION_KEY, &result.email);
        info!(email = %result.email, "Login result committed");

        self.run_post_login(seq, result).await
    }

    /// Post-login side-effect chain: fetch the linked directory profile,
    /// then perform a hard navigation to the application root.
    ///
    /// Gated on the result sequence, not on callers: the chain runs exactly
    /// once per committed result no matter how often it is re-invoked.
    async fn run_post_login(&self, seq: u64, result: LoginResult) -> OrchestratorResult<()> {
        if self.post_login_done.fetch_max(seq, Ordering::SeqCst) >= seq {
            debug!(seq, "Post-login chain already ran for this result");
            return Ok(());
        }
        if result.directory_profile_link.is_empty() {
            debug!("No directory profile link; post-login chain is a no-op");
            return Ok(());
        }

        let profile = self
            .transport
            .fetch_directory_profile(&result.directory_profile_link)
            .await?;
        self.state.lock().unwrap().last_profile = Some(profile);

        // Navigation happens whether or not the profile had any records.
        info!("Directory profile fetched, navigating to application root");
        self.navigator.navigate(APP_ROOT);
        Ok(())
    }
}
