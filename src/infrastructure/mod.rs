//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! launch policy. This layer handles configuration, process identity, and the
//! command-driven launch session.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`identity`] - Front-end process identity and naming
//! - [`session`] - Launch session running templated shell commands

pub mod bootstrap;
pub mod config;
pub mod identity;
pub mod session;
