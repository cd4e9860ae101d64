//! Scripted [`LaunchSession`] and [`SessionFactory`] implementations.
//!
//! - [`ScriptedFactory`] - hands out one [`ScriptedSession`] per scripted
//!   attempt, or fails acquisition when the script says so.
//! - [`Journal`] - shared, ordered record of every session call, so tests
//!   can assert phase order, teardown counts, and carried hints.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{NetworkConfiguration, Phase};
use crate::error::{PhaseError, SessionError};
use crate::port::{LaunchSession, SessionFactory};

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// A single recorded session interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Acquire { attempt: u32 },
    Startup {
        attempt: u32,
        hint: Option<NetworkConfiguration>,
    },
    App { attempt: u32 },
    MsgServer { attempt: u32 },
    Teardown { attempt: u32 },
}

/// Thread-safe call recorder shared by a factory and its sessions.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Calls made by one attempt, in order.
    pub fn calls_for(&self, attempt: u32) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.attempt() == attempt)
            .collect()
    }

    pub fn teardowns(&self) -> usize {
        self.count(|call| matches!(call, Call::Teardown { .. }))
    }

    pub fn acquisitions(&self) -> usize {
        self.count(|call| matches!(call, Call::Acquire { .. }))
    }

    /// Hints passed to `run_startup`, one per attempt that reached it.
    pub fn startup_hints(&self) -> Vec<Option<NetworkConfiguration>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Startup { hint, .. } => Some(hint),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }
}

impl Call {
    pub fn attempt(&self) -> u32 {
        match self {
            Self::Acquire { attempt }
            | Self::Startup { attempt, .. }
            | Self::App { attempt }
            | Self::MsgServer { attempt }
            | Self::Teardown { attempt } => *attempt,
        }
    }
}

// ---------------------------------------------------------------------------
// AttemptScript
// ---------------------------------------------------------------------------

/// What one scripted session does.
#[derive(Debug, Clone)]
pub struct AttemptScript {
    resilient: bool,
    fail_at: Option<Phase>,
    output: NetworkConfiguration,
    snapshot: Option<NetworkConfiguration>,
}

impl AttemptScript {
    /// Every phase succeeds and returns `output`.
    pub fn succeeding(output: NetworkConfiguration) -> Self {
        Self {
            resilient: true,
            fail_at: None,
            output,
            snapshot: None,
        }
    }

    /// Phases before `phase` return `output`; `phase` fails.
    pub fn failing_at(phase: Phase, output: NetworkConfiguration) -> Self {
        Self {
            fail_at: Some(phase),
            ..Self::succeeding(output)
        }
    }

    pub fn non_resilient(mut self) -> Self {
        self.resilient = false;
        self
    }

    /// Attach a configuration snapshot to the failure.
    pub fn with_snapshot(mut self, snapshot: NetworkConfiguration) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

// ---------------------------------------------------------------------------
// ScriptedSession
// ---------------------------------------------------------------------------

pub struct ScriptedSession {
    id: String,
    attempt: u32,
    script: AttemptScript,
    journal: Journal,
}

impl ScriptedSession {
    fn phase_result(&self, phase: Phase) -> Result<NetworkConfiguration, PhaseError> {
        if self.script.fail_at == Some(phase) {
            let error = PhaseError::new(
                phase,
                SessionError::Other(format!("scripted {phase} failure")),
            );
            return Err(match &self.script.snapshot {
                Some(snapshot) => error.with_snapshot(snapshot.clone()),
                None => error,
            });
        }
        Ok(self.script.output.clone())
    }
}

#[async_trait]
impl LaunchSession for ScriptedSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn resilient(&self) -> bool {
        self.script.resilient
    }

    async fn run_startup(
        &mut self,
        hint: Option<NetworkConfiguration>,
    ) -> Result<NetworkConfiguration, PhaseError> {
        self.journal.record(Call::Startup {
            attempt: self.attempt,
            hint,
        });
        self.phase_result(Phase::Startup)
    }

    async fn run_app(&mut self) -> Result<NetworkConfiguration, PhaseError> {
        self.journal.record(Call::App {
            attempt: self.attempt,
        });
        self.phase_result(Phase::App)
    }

    async fn run_msg_server(&mut self) -> Result<NetworkConfiguration, PhaseError> {
        self.journal.record(Call::MsgServer {
            attempt: self.attempt,
        });
        self.phase_result(Phase::MsgServer)
    }

    fn teardown(&mut self) {
        self.journal.record(Call::Teardown {
            attempt: self.attempt,
        });
    }
}

// ---------------------------------------------------------------------------
// ScriptedFactory
// ---------------------------------------------------------------------------

/// Id handed to the session of `attempt`.
pub fn scripted_session_id(attempt: u32) -> String {
    format!("scripted-{attempt}")
}

/// Factory that replays a queue of attempt scripts.
///
/// `None` entries make acquisition fail. An exhausted queue also fails
/// acquisition, so a runaway retry loop ends instead of hanging a test.
pub struct ScriptedFactory {
    scripts: Mutex<VecDeque<Option<AttemptScript>>>,
    attempts: AtomicU32,
    journal: Journal,
}

impl ScriptedFactory {
    pub fn new(scripts: impl IntoIterator<Item = AttemptScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().map(Some).collect()),
            attempts: AtomicU32::new(0),
            journal: Journal::new(),
        }
    }

    /// Queue an acquisition failure.
    pub fn then_unavailable(self) -> Self {
        self.scripts.lock().push_back(None);
        self
    }

    /// Queue a further attempt.
    pub fn then(self, script: AttemptScript) -> Self {
        self.scripts.lock().push_back(Some(script));
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    async fn acquire(&self) -> Result<Box<dyn LaunchSession>, SessionError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let script = self
            .scripts
            .lock()
            .pop_front()
            .flatten()
            .ok_or_else(|| SessionError::Other("scripted acquisition failure".into()))?;

        self.journal.record(Call::Acquire { attempt });
        Ok(Box::new(ScriptedSession {
            id: scripted_session_id(attempt),
            attempt,
            script,
            journal: self.journal.clone(),
        }))
    }
}
