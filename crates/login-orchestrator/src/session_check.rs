//! Session-check fallback chain.
//!
//! A strict two-tier recovery pipeline for re-establishing an OIDC session
//! without forcing a full redirect: query the session status and load user
//! info, and on any failure fall back to a single interactive popup sign-in.
//! Each terminal state is reported exactly once; there is no retry loop and
//! no silent-iframe stage in this chain.

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::orchestrator::LoginOrchestrator;
use rust_fsm::*;
use tracing::{debug, info, warn};

/// Request state attached to the recovery popup sign-in.
const SESSION_RECOVERY_STATE: &str = "session-recovery";

// Lifecycle of one session check. Guards re-entrancy: `Begin` is only
// possible from `Idle`, so a second check while one is in flight is rejected
// instead of opening a duplicate popup.
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub check_machine(Idle)

    Idle => {
        Begin => Primary
    },
    Primary => {
        Authorized => Idle,
        PrimaryFailed => PopupRecovery
    },
    PopupRecovery => {
        Authorized => Idle,
        PopupFailed => Idle
    }
}

pub use check_machine::Input as CheckInput;
pub use check_machine::State as CheckState;
pub use check_machine::StateMachine as CheckMachine;

/// Terminal success state of a session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCheckOutcome {
    /// The provider reported an active session and user info was loaded.
    ActiveSession,
    /// The session was re-established through the popup sign-in.
    RecoveredViaPopup,
}

impl LoginOrchestrator {
    /// Run the session-check fallback chain.
    ///
    /// Ordered stages, first success wins: status query plus user-info load,
    /// then the interactive popup. An absent session status is a negotiated
    /// no-session outcome handled inside the chain, never surfaced as a raw
    /// error. Popup failure, including the user dismissing the popup, is the
    /// terminal failure state and leaves the user signed out.
    pub async fn check_session(&self) -> OrchestratorResult<SessionCheckOutcome> {
        self.begin_check()?;

        if let Some(outcome) = self.stage_status_and_user_info().await {
            self.advance_check(CheckInput::Authorized)?;
            return Ok(outcome);
        }
        self.advance_check(CheckInput::PrimaryFailed)?;

        match self.stage_popup_signin().await {
            Ok(outcome) => {
                self.advance_check(CheckInput::Authorized)?;
                Ok(outcome)
            }
            Err(err) => {
                self.advance_check(CheckInput::PopupFailed)?;
                warn!(error = %err, "Session check failed; user remains signed out");
                Err(err)
            }
        }
    }

    /// Stage 1: session status query, then user info. Every failure here,
    /// including the synthesized no-session outcome, falls through to the
    /// popup stage.
    async fn stage_status_and_user_info(&self) -> Option<SessionCheckOutcome> {
        let status = match self.identity().query_session_status().await {
            Ok(Some(status)) => status,
            Ok(None) => {
                debug!("No active session reported; falling through to recovery");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "Session status query failed");
                return None;
            }
        };

        // A user-info load that resolves is authorization, even when no
        // stored user comes back; only a failed load falls through.
        match self.identity().get_user().await {
            Ok(user) => {
                info!(
                    sub = %status.sub,
                    stored_user = user.is_some(),
                    "Session check authorized"
                );
                Some(SessionCheckOutcome::ActiveSession)
            }
            Err(err) => {
                warn!(error = %err, "User info load failed");
                None
            }
        }
    }

    /// Stage 2: interactive popup sign-in, the single recovery path.
    async fn stage_popup_signin(&self) -> OrchestratorResult<SessionCheckOutcome> {
        info!("Falling back to popup sign-in");
        self.identity()
            .signin_popup(SESSION_RECOVERY_STATE)
            .await
            .map(|_| SessionCheckOutcome::RecoveredViaPopup)
            .map_err(OrchestratorError::from)
    }

    fn begin_check(&self) -> OrchestratorResult<()> {
        let mut machine = self.check_machine.lock().unwrap();
        machine
            .consume(&CheckInput::Begin)
            .map_err(|_| OrchestratorError::SessionCheckInFlight)?;
        Ok(())
    }

    fn advance_check(&self, input: CheckInput) -> OrchestratorResult<()> {
        let mut machine = self.check_machine.lock().unwrap();
        let state = format!("{:?}", machine.state());
        machine.consume(&input).map_err(|_| {
            OrchestratorError::InvalidCheckTransition(format!(
                "cannot apply {:?} in state {}",
                input, state
            ))
        })?;
        Ok(())
    }
}
