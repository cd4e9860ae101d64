//! nodelaunch - resilient multi-node launch front end.
//!
//! The front end brings up infrastructure on a set of worker nodes, runs a
//! user application on top, then runs a message server. When any phase
//! fails it counts the healthy nodes left and, depending on policy, tries
//! again on what remains or gives up with an explanation.
//!
//! # Architecture
//!
//! - [`domain`] - Nodes, network configuration, policy, outcomes
//! - [`port`] - The launch session boundary and its scope guard
//! - [`application`] - The launch loop and the retry classifier
//! - [`infrastructure`] - Configuration, logging, process identity, and the
//!   command-driven session
//! - [`adapter`] - The command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use nodelaunch::infrastructure::bootstrap::build_orchestrator;
//! use nodelaunch::infrastructure::config::settings::Config;
//! use nodelaunch::infrastructure::identity;
//!
//! # async fn launch() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("nodelaunch.toml")?;
//! let mut orchestrator = build_orchestrator(&config, identity::resolve())?;
//! let status = orchestrator.run().await;
//! println!("exit code {}", status.code());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
