//! Infrastructure configuration modules.

pub mod logging;
pub mod session;
pub mod settings;

pub use logging::{LogDevice, LogFormat, LoggingConfig};
pub use session::SessionSettings;
pub use settings::{Config, LaunchConfig};
