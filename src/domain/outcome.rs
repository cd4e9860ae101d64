//! Launch phases, abort reasons, and process exit status.

use std::fmt;
use std::process::ExitCode;

use serde::Serialize;

/// One of the three ordered phases of a launch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Infrastructure bring-up across nodes.
    Startup,
    /// User application execution.
    App,
    /// Control/message-server execution.
    MsgServer,
}

impl Phase {
    /// Phases in execution order.
    pub const ORDER: [Self; 3] = [Self::Startup, Self::App, Self::MsgServer];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Startup => "startup",
            Self::App => "app",
            Self::MsgServer => "msg-server",
        };
        f.write_str(label)
    }
}

/// Why the loop stopped retrying.
///
/// A policy decision, not an error: the launch itself may have failed for
/// any reason, this records why no further attempt was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    /// Exhaust mode and no healthy worker remains.
    NoResourcesLeft,
    /// Threshold mode and capacity dropped to one below the request.
    InsufficientResources { available: usize, node_count: usize },
    /// A failure under a non-resilient policy.
    NotResilient,
    /// The session could not be constructed.
    SessionUnavailable { detail: String },
    /// The configured attempt limit was reached.
    AttemptsExhausted { attempts: u32 },
}

impl AbortReason {
    /// Explanation shown to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoResourcesLeft => {
                "There are no more hardware resources available for continued app execution."
                    .to_string()
            }
            Self::InsufficientResources { .. } => {
                "There are not enough hardware resources available for continued app execution."
                    .to_string()
            }
            Self::NotResilient => {
                "Launch failed and resilient mode is off; not retrying.".to_string()
            }
            Self::SessionUnavailable { detail } => {
                format!("Could not start a launch session: {detail}")
            }
            Self::AttemptsExhausted { attempts } => {
                format!("Launch failed after {attempts} attempts; giving up.")
            }
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResourcesLeft => f.write_str("no resources left"),
            Self::InsufficientResources {
                available,
                node_count,
            } => write!(
                f,
                "not enough resources left ({available} of {node_count} nodes)"
            ),
            Self::NotResilient => f.write_str("failure under non-resilient policy"),
            Self::SessionUnavailable { detail } => write!(f, "session unavailable: {detail}"),
            Self::AttemptsExhausted { attempts } => {
                write!(f, "attempt limit reached after {attempts} attempts")
            }
        }
    }
}

/// Final status of the front-end process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitStatus {
    Success,
    Fail,
}

impl ExitStatus {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Fail => 1,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Fail.code(), 1);
    }

    #[test]
    fn resource_messages_are_distinct() {
        let none = AbortReason::NoResourcesLeft.user_message();
        let short = AbortReason::InsufficientResources {
            available: 3,
            node_count: 4,
        }
        .user_message();

        assert!(none.contains("no more hardware resources"));
        assert!(short.contains("not enough hardware resources"));
    }

    #[test]
    fn phase_order() {
        assert_eq!(
            Phase::ORDER,
            [Phase::Startup, Phase::App, Phase::MsgServer]
        );
        assert_eq!(Phase::MsgServer.to_string(), "msg-server");
    }
}
