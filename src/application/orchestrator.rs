//! Resilient launch loop.
//!
//! The [`Orchestrator`] drives repeated launch attempts until one runs all
//! three phases cleanly or the policy stops it. Each attempt acquires a
//! fresh session from the [`SessionFactory`], runs startup, app, and
//! message server in order, and releases the session through a
//! [`SessionGuard`] whatever happened. On failure the network configuration
//! produced before the failure is classified and, on retry, handed to the
//! next attempt's startup as its hint.
//!
//! The loop is an explicit state machine:
//!
//! ```text
//!   RetryPending ──step──▶ Attempting ──ok──────────────▶ Succeeded
//!        ▲                     │
//!        └──── classify: retry ┤
//!                              └── abort / not resilient ▶ Aborted
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::classifier::{classify, RetryDecision};
use crate::domain::{
    AbortReason, ExitStatus, LaunchPolicy, NetworkConfiguration, Phase, ProcessIdentity,
};
use crate::error::PhaseError;
use crate::port::{LaunchSession, SessionFactory, SessionGuard};

/// State of the launch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// An attempt is in flight, or about to start.
    Attempting,
    /// The previous attempt failed and will be retried.
    RetryPending,
    /// No further attempts will be made.
    Aborted(AbortReason),
    /// An attempt completed all three phases.
    Succeeded,
}

impl LoopState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Aborted(_) | Self::Succeeded)
    }

    /// Process exit status for terminal states.
    #[must_use]
    pub const fn exit_status(&self) -> Option<ExitStatus> {
        match self {
            Self::Succeeded => Some(ExitStatus::Success),
            Self::Aborted(_) => Some(ExitStatus::Fail),
            Self::Attempting | Self::RetryPending => None,
        }
    }
}

/// How one attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// All three phases succeeded.
    Completed,
    /// A phase failed. `available` is the healthy count when classified.
    Failed {
        phase: Phase,
        error: String,
        available: Option<usize>,
    },
    /// The session could not be acquired.
    Unavailable { error: String },
}

/// History entry for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub number: u32,
    /// Absent when no session was acquired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub outcome: AttemptOutcome,
}

/// What is known about an attempt before it ends.
struct AttemptStart {
    number: u32,
    session_id: Option<String>,
    started_at: DateTime<Utc>,
}

impl AttemptStart {
    fn finish(self, outcome: AttemptOutcome) -> AttemptRecord {
        AttemptRecord {
            number: self.number,
            session_id: self.session_id,
            started_at: self.started_at,
            outcome,
        }
    }
}

/// Drives launch attempts against a [`SessionFactory`].
pub struct Orchestrator<F> {
    factory: F,
    policy: LaunchPolicy,
    identity: ProcessIdentity,
    state: LoopState,
    net_conf: Option<NetworkConfiguration>,
    history: Vec<AttemptRecord>,
}

impl<F: SessionFactory> Orchestrator<F> {
    pub fn new(factory: F, policy: LaunchPolicy, identity: ProcessIdentity) -> Self {
        Self {
            factory,
            policy,
            identity,
            state: LoopState::Attempting,
            net_conf: None,
            history: Vec::new(),
        }
    }

    /// Seed the first attempt's startup hint.
    #[must_use]
    pub fn with_initial_config(mut self, net_conf: NetworkConfiguration) -> Self {
        self.net_conf = Some(net_conf);
        self
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn policy(&self) -> &LaunchPolicy {
        &self.policy
    }

    pub fn identity(&self) -> &ProcessIdentity {
        &self.identity
    }

    /// The configuration carried into the next attempt, or the final one.
    pub fn network_config(&self) -> Option<&NetworkConfiguration> {
        self.net_conf.as_ref()
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    pub fn attempts(&self) -> u32 {
        u32::try_from(self.history.len()).unwrap_or(u32::MAX)
    }

    /// Run attempts until the loop reaches a terminal state.
    pub async fn run(&mut self) -> ExitStatus {
        info!(
            identity = %self.identity,
            node_count = self.policy.node_count,
            resilient = self.policy.resilient,
            exhaust_resources = self.policy.exhaust_resources,
            max_attempts = ?self.policy.max_attempts,
            "Launch loop starting"
        );

        loop {
            let state = self.step().await.clone();
            if let Some(status) = state.exit_status() {
                match &state {
                    LoopState::Aborted(reason) => {
                        warn!(%reason, attempts = self.attempts(), "Launch aborted");
                    }
                    _ => info!(attempts = self.attempts(), "Exiting front end"),
                }
                return status;
            }
        }
    }

    /// Run a single attempt and transition. No-op once terminal.
    pub async fn step(&mut self) -> &LoopState {
        if self.state.is_terminal() {
            return &self.state;
        }
        self.state = LoopState::Attempting;

        let number = self.attempts().saturating_add(1);
        let mut start = AttemptStart {
            number,
            session_id: None,
            started_at: Utc::now(),
        };
        info!(
            attempt = number,
            carried_nodes = self.net_conf.as_ref().map_or(0, NetworkConfiguration::len),
            "Starting launch attempt"
        );

        let session = match self.factory.acquire().await {
            Ok(session) => session,
            Err(err) => {
                error!(attempt = number, error = %err, "Failed to acquire launch session");
                let detail = err.to_string();
                self.history.push(start.finish(AttemptOutcome::Unavailable {
                    error: detail.clone(),
                }));
                self.state = LoopState::Aborted(AbortReason::SessionUnavailable { detail });
                return &self.state;
            }
        };

        let mut session = SessionGuard::new(session);
        start.session_id = Some(session.id().to_owned());
        let resilient = session.resilient();
        let result = run_phases(&mut *session, &mut self.net_conf).await;
        session.release();

        match result {
            Ok(()) => {
                info!(attempt = number, "Launch attempt completed");
                self.history.push(start.finish(AttemptOutcome::Completed));
                self.state = LoopState::Succeeded;
            }
            Err(err) => self.handle_failure(start, resilient, err),
        }
        &self.state
    }

    fn handle_failure(&mut self, start: AttemptStart, resilient: bool, err: PhaseError) {
        let number = start.number;
        let message = err.to_string();
        error!(
            attempt = number,
            session = start.session_id.as_deref().unwrap_or_default(),
            phase = %err.phase,
            error = %message,
            cause = ?err.source,
            "Error in launcher front end"
        );

        let PhaseError {
            phase, snapshot, ..
        } = err;
        if let Some(snapshot) = snapshot {
            self.net_conf = Some(snapshot);
        }

        if !resilient {
            self.history.push(start.finish(AttemptOutcome::Failed {
                phase,
                error: message,
                available: None,
            }));
            self.state = LoopState::Aborted(AbortReason::NotResilient);
            return;
        }

        let classification = classify(self.net_conf.as_ref(), &self.policy);
        info!(
            attempt = number,
            available = classification.available,
            node_count = self.policy.node_count,
            "Available nodes counted"
        );
        self.history.push(start.finish(AttemptOutcome::Failed {
            phase,
            error: message,
            available: Some(classification.available),
        }));

        self.state = match classification.decision {
            RetryDecision::Abort(reason) => LoopState::Aborted(reason),
            RetryDecision::Retry if !self.policy.allows_attempt_after(number) => {
                LoopState::Aborted(AbortReason::AttemptsExhausted { attempts: number })
            }
            RetryDecision::Retry => {
                info!(attempt = number, "Retrying launch");
                LoopState::RetryPending
            }
        };
    }
}

/// Run the three phases in order, storing each returned configuration.
async fn run_phases(
    session: &mut dyn LaunchSession,
    net_conf: &mut Option<NetworkConfiguration>,
) -> Result<(), PhaseError> {
    debug!(
        phase = %Phase::Startup,
        hint = ?net_conf.as_ref().map(NetworkConfiguration::len),
        "Entering phase"
    );
    *net_conf = Some(session.run_startup(net_conf.clone()).await?);

    debug!(phase = %Phase::App, "Entering phase");
    *net_conf = Some(session.run_app().await?);

    debug!(phase = %Phase::MsgServer, "Entering phase");
    *net_conf = Some(session.run_msg_server().await?);

    Ok(())
}
