//! Handler for the `run` command.

use std::fs;
use std::path::Path;

use serde_json::json;
use tokio::signal;
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::application::{LoopState, Orchestrator};
use crate::domain::{ExitStatus, NetworkConfiguration};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::logging::{LogDevice, LogFormat};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::identity;
use crate::port::SessionFactory;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<ExitStatus> {
    let mut config = Config::load_unvalidated(&args.config)?;
    apply_overrides(&mut config, args, output::is_json());
    config.validate()?;
    config.init_logging()?;

    let identity = identity::resolve();
    identity::set_process_name(identity.process_name());
    info!(
        pid = identity.pid(),
        pgid = identity.pgid(),
        host_id = identity.host_id(),
        host = identity.host_name(),
        "Front end starting"
    );
    info!(args = ?args, "Front end arguments");

    print_startup(&config, args);
    let mut orchestrator = bootstrap::build_orchestrator(&config, identity)?;

    let status = tokio::select! {
        status = orchestrator.run() => status,
        _ = signal::ctrl_c() => {
            warn!("Interrupt received, cancelling launch");
            output::warning("Interrupted; launch cancelled.");
            ExitStatus::Fail
        }
    };

    report(&orchestrator);
    if let Some(path) = &args.netconf_out {
        write_netconf(path, orchestrator.network_config())?;
    }
    Ok(status)
}

/// Apply CLI flags on top of the loaded configuration.
fn apply_overrides(config: &mut Config, args: &RunArgs, force_json_logs: bool) {
    if let Some(node_count) = args.node_count {
        config.launch.node_count = node_count;
    }
    if args.resilient {
        config.launch.resilient = true;
    }
    if args.exhaust_resources {
        config.launch.exhaust_resources = true;
    }
    if args.max_attempts.is_some() {
        config.launch.max_attempts = args.max_attempts;
    }
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
        config.logging.devices.remove(&LogDevice::Stderr);
    }
    if args.json_logs || force_json_logs {
        config.logging.format = LogFormat::Json;
    }
}

fn print_startup(config: &Config, args: &RunArgs) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Config", args.config.display());
    output::field("Nodes", config.launch.node_count);
    output::field("Hosts", config.session.hosts.len());
    output::field("Resilient", config.launch.resilient);
    if config.launch.resilient {
        let mode = if config.launch.exhaust_resources {
            "exhaust"
        } else {
            "threshold"
        };
        output::field("Retry mode", mode);
    }
    if output::verbosity() > 0 {
        output::field("Launcher", &config.session.launcher);
        output::field("App", &config.session.app);
    }
}

fn report<F: SessionFactory>(orchestrator: &Orchestrator<F>) {
    output::record("history", json!(orchestrator.history()));
    output::field("Attempts", orchestrator.attempts());
    match orchestrator.state() {
        LoopState::Succeeded => output::success("Launch completed"),
        LoopState::Aborted(reason) => output::warning(&reason.user_message()),
        LoopState::Attempting | LoopState::RetryPending => {}
    }
}

fn write_netconf(path: &Path, net_conf: Option<&NetworkConfiguration>) -> Result<()> {
    let Some(net_conf) = net_conf else {
        output::note("No network configuration was produced");
        return Ok(());
    };
    fs::write(path, serde_json::to_string_pretty(net_conf)?)?;
    output::field("Netconf", path.display());
    Ok(())
}
