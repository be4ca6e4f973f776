//! The Identity-Session Client.

use crate::error::{ProviderError, ProviderResult};
use crate::events::{SessionEvent, SessionEvents};
use crate::gateway::{ProviderGateway, SessionIdentity, SessionStatus};
use crate::settings::ProviderSettings;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Client for the OIDC session lifecycle.
///
/// Wraps every protocol operation of the underlying identity library in
/// [`ProviderError`], publishes [`SessionEvent`]s over a broadcast channel,
/// schedules token-expiry notifications, and optionally answers expiry with
/// an automatic silent renew. Constructed once at startup; its subscriptions
/// and background tasks end with the client.
pub struct IdentitySessionClient {
    gateway: Arc<dyn ProviderGateway>,
    settings: ProviderSettings,
    events: SessionEvents,
    expiry_task: Mutex<Option<JoinHandle<()>>>,
    renew_task: Mutex<Option<JoinHandle<()>>>,
    /// Subject last reported by a status query, for cross-tab change detection.
    last_session_subject: Mutex<Option<String>>,
}

impl IdentitySessionClient {
    pub fn new(gateway: Arc<dyn ProviderGateway>, settings: ProviderSettings) -> Self {
        Self {
            gateway,
            settings,
            events: SessionEvents::new(),
            expiry_task: Mutex::new(None),
            renew_task: Mutex::new(None),
            last_session_subject: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Subscribe to session lifecycle events emitted from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Query the provider for the current session status.
    ///
    /// `Ok(None)` means no active session. A change in the reported subject
    /// since the previous query emits [`SessionEvent::SessionChanged`].
    pub async fn query_session_status(&self) -> ProviderResult<Option<SessionStatus>> {
        let status = self
            .gateway
            .query_session_status()
            .await
            .map_err(|e| ProviderError::wrap("query_session_status", e))?;

        let current = status.as_ref().map(|s| s.sub.clone());
        {
            let mut last = self.last_session_subject.lock().unwrap();
            if last.is_some() && *last != current {
                debug!("Provider session changed since last query");
                self.events.emit(SessionEvent::SessionChanged);
            }
            *last = current;
        }

        match &status {
            Some(s) => debug!(sub = %s.sub, "Active provider session"),
            None => debug!("No active provider session"),
        }
        Ok(status)
    }

    /// Start the full-page redirect sign-in.
    ///
    /// On the success path the execution context unloads and control does not
    /// return; a local failure (provider unreachable before the redirect)
    /// surfaces without unloading anything. The request state is opaque and
    /// is never logged.
    pub async fn signin_redirect(&self, state: &str) -> ProviderResult<()> {
        info!("Starting redirect sign-in");
        self.gateway
            .signin_redirect(state)
            .await
            .map_err(|e| ProviderError::wrap("signin_redirect", e))
    }

    /// Interactive popup sign-in. A popup closed by the user is an ordinary
    /// [`ProviderError::PopupClosed`] failure.
    pub async fn signin_popup(&self, state: &str) -> ProviderResult<SessionIdentity> {
        info!("Starting popup sign-in");
        let identity = self
            .gateway
            .signin_popup(state)
            .await
            .map_err(|e| ProviderError::wrap("signin_popup", e))?;

        info!(subject = %identity.subject, "Popup sign-in established a session");
        self.schedule_expiry(&identity);
        self.events.emit(SessionEvent::UserLoaded);
        self.events.emit(SessionEvent::SignedIn);
        Ok(identity)
    }

    /// Silent (hidden iframe) sign-in, bounded by the configured
    /// silent-request timeout.
    pub async fn signin_silent(&self, state: &str) -> ProviderResult<SessionIdentity> {
        let timeout = self.settings.silent_request_timeout();
        let identity = tokio::time::timeout(timeout, self.gateway.signin_silent(state))
            .await
            .map_err(|_| ProviderError::Timeout {
                operation: "signin_silent",
                timeout,
            })?
            .map_err(|e| ProviderError::wrap("signin_silent", e))?;

        debug!(subject = %identity.subject, "Silent sign-in renewed the session");
        self.schedule_expiry(&identity);
        self.events.emit(SessionEvent::UserLoaded);
        Ok(identity)
    }

    /// Popup sign-out.
    pub async fn signout_popup(&self, state: &str) -> ProviderResult<()> {
        info!("Starting popup sign-out");
        self.gateway
            .signout_popup(state)
            .await
            .map_err(|e| ProviderError::wrap("signout_popup", e))?;

        self.cancel_expiry();
        self.events.emit(SessionEvent::UserUnloaded);
        self.events.emit(SessionEvent::SignedOut);
        Ok(())
    }

    /// Load the locally stored identity, if any.
    pub async fn get_user(&self) -> ProviderResult<Option<SessionIdentity>> {
        self.gateway
            .load_user()
            .await
            .map_err(|e| ProviderError::wrap("get_user", e))
    }

    /// Persist an identity into the library's store.
    pub async fn persist_user(&self, user: &SessionIdentity) -> ProviderResult<()> {
        self.gateway
            .store_user(user)
            .await
            .map_err(|e| ProviderError::wrap("persist_user", e))?;
        self.schedule_expiry(user);
        self.events.emit(SessionEvent::UserLoaded);
        Ok(())
    }

    /// Remove the locally stored identity.
    pub async fn remove_user(&self) -> ProviderResult<()> {
        self.gateway
            .remove_user()
            .await
            .map_err(|e| ProviderError::wrap("remove_user", e))?;
        self.cancel_expiry();
        self.events.emit(SessionEvent::UserUnloaded);
        Ok(())
    }

    /// Clear stale interim protocol state.
    pub async fn clear_stale_state(&self) -> ProviderResult<()> {
        self.gateway
            .clear_stale_state()
            .await
            .map_err(|e| ProviderError::wrap("clear_stale_state", e))
    }

    /// Answer [`SessionEvent::TokenExpiring`] with a silent sign-in.
    ///
    /// No-op unless `automatic_silent_renew` is enabled. A failed renew emits
    /// [`SessionEvent::SilentRenewError`] and waits for the next expiry
    /// cycle; there is no retry loop.
    pub fn start_automatic_renew(self: &Arc<Self>) {
        if !self.settings.automatic_silent_renew {
            return;
        }
        let client = Arc::clone(self);
        let mut rx = self.events.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(SessionEvent::TokenExpiring) => {
                        debug!("Token expiring, attempting silent renew");
                        if let Err(err) = client.signin_silent("").await {
                            warn!(error = %err, "Silent renew failed");
                            client
                                .events
                                .emit(SessionEvent::SilentRenewError(err.to_string()));
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Renew loop lagged behind the event channel");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        if let Some(old) = self.renew_task.lock().unwrap().replace(handle) {
            old.abort();
        }
    }

    /// Stop the automatic renew loop, if running.
    pub fn stop_automatic_renew(&self) {
        if let Some(handle) = self.renew_task.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Schedule `TokenExpiring` at `expires_at - lead` and `TokenExpired` at
    /// `expires_at`, replacing any previous schedule.
    fn schedule_expiry(&self, identity: &SessionIdentity) {
        let Some(expires_at) = identity.expires_at else {
            return;
        };
        let events = self.events.clone();
        let lead = self.settings.expiring_lead();
        let handle = tokio::spawn(async move {
            let until_expiry = (expires_at - Utc::now()).to_std().unwrap_or_default();
            let lead = lead.min(until_expiry);
            tokio::time::sleep(until_expiry - lead).await;
            events.emit(SessionEvent::TokenExpiring);
            tokio::time::sleep(lead).await;
            events.emit(SessionEvent::TokenExpired);
        });
        if let Some(old) = self.expiry_task.lock().unwrap().replace(handle) {
            old.abort();
        }
    }

    fn cancel_expiry(&self) {
        if let Some(handle) = self.expiry_task.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for IdentitySessionClient {
    fn drop(&mut self) {
        self.cancel_expiry();
        self.stop_automatic_renew();
    }
}
