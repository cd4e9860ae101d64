//! Command-driven launch session.
//!
//! - [`command`] - Session and factory running templated shell commands
//! - [`template`] - Placeholder rendering for command templates

pub mod command;
pub mod template;

pub use command::{CommandSession, CommandSessionFactory};
