//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`session`] - Scripted [`LaunchSession`](crate::port::LaunchSession)
//!   and [`SessionFactory`](crate::port::SessionFactory) with a call journal.
//! - [`domain`] - Builders for network configurations.
//! - [`config`] - Canonical TOML configurations and policies.

pub mod config;
pub mod domain;
pub mod session;
