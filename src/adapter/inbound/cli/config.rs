//! Handler for the `config` command group.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::logging::LogDevice;
use crate::infrastructure::config::settings::Config;

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    output::success("Configuration is valid");
    output::field("Path", path.display());
    output::field("Nodes", config.launch.node_count);
    output::field("Hosts", config.session.hosts.len());
    if config.session.hosts.len() < config.launch.node_count {
        output::warning(&format!(
            "only {} host(s) for {} requested node(s)",
            config.session.hosts.len(),
            config.launch.node_count
        ));
    }
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    output::record("config", serde_json::to_value(&config)?);

    output::section("Launch");
    output::field("Nodes", config.launch.node_count);
    output::field("Resilient", config.launch.resilient);
    output::field("Exhaust", config.launch.exhaust_resources);
    output::field(
        "Max attempts",
        config
            .launch
            .max_attempts
            .map_or_else(|| "unbounded".to_string(), |max| max.to_string()),
    );

    output::section("Session");
    output::field("Launcher", &config.session.launcher);
    output::field("App", &config.session.app);
    for (label, command) in [
        ("Startup", &config.session.startup),
        ("Msg server", &config.session.msg_server),
        ("Probe", &config.session.probe),
        ("Shutdown", &config.session.shutdown),
    ] {
        output::field(label, command.as_deref().unwrap_or("(none)"));
    }
    output::field("Hosts", config.session.hosts.join(", "));

    output::section("Logging");
    output::field("Format", format!("{:?}", config.logging.format).to_lowercase());
    for device in [LogDevice::Stderr, LogDevice::File] {
        if let Some(level) = config.logging.level_for(device) {
            output::field(&format!("{device:?}").to_lowercase(), level);
        }
    }
    if let Some(file) = config.logging.file_path() {
        output::field("Log file", file.display());
    }
    Ok(())
}
