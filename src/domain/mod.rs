//! Launch-agnostic domain types.
//!
//! - [`node`] - Node index, state, and descriptor
//! - [`network`] - The network configuration carried across attempts
//! - [`policy`] - Retry policy parameters
//! - [`outcome`] - Phases, abort reasons, and exit status
//! - [`identity`] - Front-end process identity
//! - [`error`] - Domain validation errors

pub mod error;
pub mod identity;
pub mod network;
pub mod node;
pub mod outcome;
pub mod policy;

pub use identity::ProcessIdentity;
pub use network::NetworkConfiguration;
pub use node::{NodeDescriptor, NodeIndex, NodeState};
pub use outcome::{AbortReason, ExitStatus, Phase};
pub use policy::LaunchPolicy;
