//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!        ┌──────────────────────────┐
//!        │       Application        │
//!        │  (orchestrator, classifier)
//!        └────────────┬─────────────┘
//!                     │ SessionFactory / LaunchSession
//!                     ▼
//!              ┌─────────────┐
//!              │   Session   │
//!              │   Adapter   │
//!              └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`SessionFactory`], [`LaunchSession`] - One launch attempt's phases
//! - [`SessionGuard`] - Scoped release of an acquired session

pub mod outbound;

pub use outbound::{LaunchSession, SessionFactory, SessionGuard};
