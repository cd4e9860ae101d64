//! Launch session port.
//!
//! A launch session is one attempt's scoped handle to infrastructure
//! bring-up, application execution, and message-server execution. It is
//! acquired from a [`SessionFactory`] and released through a
//! [`SessionGuard`], which guarantees teardown runs exactly once on every
//! exit path: normal return, `?` propagation, panic unwinding, or the
//! enclosing future being dropped.

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;

use crate::domain::NetworkConfiguration;
use crate::error::{PhaseError, SessionError};

/// One attempt's handle to the three ordered launch phases.
///
/// Implementations own node lifecycle mechanics. Each phase may block for
/// an unbounded time and may fail; the orchestration loop treats failures
/// as opaque apart from the optional configuration snapshot.
#[async_trait]
pub trait LaunchSession: Send {
    /// Identifier of this session, unique per attempt.
    fn id(&self) -> &str;

    /// Whether failures of this session may be retried.
    fn resilient(&self) -> bool;

    /// Bring infrastructure up, seeded by the configuration of a previous
    /// attempt when there was one.
    async fn run_startup(
        &mut self,
        hint: Option<NetworkConfiguration>,
    ) -> Result<NetworkConfiguration, PhaseError>;

    /// Run the user workload atop the started infrastructure.
    async fn run_app(&mut self) -> Result<NetworkConfiguration, PhaseError>;

    /// Run the control/message layer.
    async fn run_msg_server(&mut self) -> Result<NetworkConfiguration, PhaseError>;

    /// Release everything the session set up. Called once, by [`SessionGuard`].
    fn teardown(&mut self);
}

/// Produces a fresh [`LaunchSession`] per attempt.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Acquire a new session, performing its setup.
    async fn acquire(&self) -> Result<Box<dyn LaunchSession>, SessionError>;
}

/// Scope guard that tears a session down when dropped.
pub struct SessionGuard {
    session: Box<dyn LaunchSession>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn LaunchSession>) -> Self {
        Self { session }
    }

    /// Tear the session down now.
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for SessionGuard {
    type Target = dyn LaunchSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.teardown();
    }
}
