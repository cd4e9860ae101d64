//! Outbound ports: what the application drives.

pub mod session;

pub use session::{LaunchSession, SessionFactory, SessionGuard};
