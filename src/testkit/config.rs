//! Canonical test configurations.
//!
//! Single source of truth for configs and policies used across tests.

use crate::domain::LaunchPolicy;
use crate::infrastructure::config::session::SessionSettings;
use crate::infrastructure::config::settings::{Config, LaunchConfig};

/// Startup command that fails on any host named `bad`.
pub const FAIL_ON_BAD_HOST: &str = "test {host} != bad";

/// Resilient threshold-mode policy.
pub fn resilient(node_count: usize) -> LaunchPolicy {
    policy(node_count, true, false)
}

/// Resilient exhaust-mode policy.
pub fn exhaustive(node_count: usize) -> LaunchPolicy {
    policy(node_count, true, true)
}

pub fn policy(node_count: usize, resilient: bool, exhaust_resources: bool) -> LaunchPolicy {
    match LaunchPolicy::try_new(node_count, resilient, exhaust_resources) {
        Ok(policy) => policy,
        Err(err) => panic!("invalid test policy: {err}"),
    }
}

/// Local session over `hosts` whose startup fails on hosts named `bad`.
pub fn session(hosts: &[&str]) -> SessionSettings {
    SessionSettings {
        hosts: hosts.iter().map(ToString::to_string).collect(),
        startup: Some(FAIL_ON_BAD_HOST.to_string()),
        app: "true".to_string(),
        msg_server: Some("true".to_string()),
        ..SessionSettings::default()
    }
}

/// Resilient config over `hosts` launching `node_count` nodes.
pub fn config(hosts: &[&str], node_count: usize) -> Config {
    Config {
        launch: LaunchConfig {
            node_count,
            resilient: true,
            ..LaunchConfig::default()
        },
        session: session(hosts),
        ..Config::default()
    }
}

/// TOML text for a resilient config over `hosts`.
pub fn toml(hosts: &[&str], node_count: usize) -> String {
    let hosts = hosts
        .iter()
        .map(|host| format!("\"{host}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"[launch]
node_count = {node_count}
resilient = true

[session]
hosts = [{hosts}]
startup = "{FAIL_ON_BAD_HOST}"
app = "true"
msg_server = "true"

[logging]
level = "warn"
"#
    )
}
