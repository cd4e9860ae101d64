//! Launch session driven by templated shell commands.
//!
//! Node commands (startup, probe, shutdown) run through the configured
//! launcher template, one task per node on a [`JoinSet`]. The app and
//! message-server commands run locally on the front end with inherited
//! stdio. Every child is spawned with `kill_on_drop`, so cancelling a phase
//! kills its commands.

use std::collections::BTreeMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::template::{node_command, TemplateVars};
use crate::domain::{
    LaunchPolicy, NetworkConfiguration, NodeDescriptor, NodeIndex, NodeState, Phase,
};
use crate::error::{PhaseError, SessionError};
use crate::infrastructure::config::session::SessionSettings;
use crate::port::{LaunchSession, SessionFactory};

/// Comma-separated host names of the active workers.
pub const NODES_ENV: &str = "NODELAUNCH_NODES";
/// Number of active workers.
pub const NODE_COUNT_ENV: &str = "NODELAUNCH_NODE_COUNT";
/// Id of the current launch session.
pub const SESSION_ID_ENV: &str = "NODELAUNCH_SESSION_ID";

const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Builds a [`CommandSession`] per attempt.
#[derive(Debug, Clone)]
pub struct CommandSessionFactory {
    settings: Arc<SessionSettings>,
    node_count: usize,
    resilient: bool,
    front_end_host: String,
}

impl CommandSessionFactory {
    pub fn new(
        settings: SessionSettings,
        policy: &LaunchPolicy,
        front_end_host: impl Into<String>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            node_count: policy.node_count,
            resilient: policy.resilient,
            front_end_host: front_end_host.into(),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }
}

#[async_trait]
impl SessionFactory for CommandSessionFactory {
    async fn acquire(&self) -> Result<Box<dyn LaunchSession>, SessionError> {
        if self.settings.hosts.is_empty() {
            return Err(SessionError::NoHosts);
        }
        let id = Uuid::new_v4().to_string();
        info!(session = %id, hosts = self.settings.hosts.len(), "Launch session acquired");
        Ok(Box::new(CommandSession {
            id,
            settings: Arc::clone(&self.settings),
            node_count: self.node_count,
            resilient: self.resilient,
            front_end_host: self.front_end_host.clone(),
            net_conf: NetworkConfiguration::new(),
            started: Vec::new(),
        }))
    }
}

/// One attempt's view of the nodes, driven by shell commands.
pub struct CommandSession {
    id: String,
    settings: Arc<SessionSettings>,
    node_count: usize,
    resilient: bool,
    front_end_host: String,
    net_conf: NetworkConfiguration,
    started: Vec<NodeIndex>,
}

impl CommandSession {
    /// Front end active, every configured host an idle worker.
    fn fresh_config(&self) -> NetworkConfiguration {
        std::iter::once(NodeDescriptor::front_end(self.front_end_host.as_str()))
            .chain(self.settings.hosts.iter().zip(0u32..).map(|(host, ordinal)| {
                NodeDescriptor::new(NodeIndex::Worker(ordinal), host.as_str(), NodeState::Idle)
            }))
            .collect()
    }

    fn front_end_command(&self, template: &str) -> String {
        let index = NodeIndex::FrontEnd.to_string();
        TemplateVars {
            host: &self.front_end_host,
            index: &index,
            session: &self.id,
        }
        .render(template)
    }

    fn active_workers(&self) -> Vec<NodeIndex> {
        self.net_conf
            .workers_in(NodeState::Active)
            .map(NodeDescriptor::index)
            .collect()
    }

    fn fail(&self, phase: Phase, source: SessionError) -> PhaseError {
        PhaseError::new(phase, source).with_snapshot(self.net_conf.clone())
    }

    /// Run `template` on each of `nodes` concurrently.
    async fn run_on_nodes(
        &self,
        template: &str,
        nodes: &[NodeIndex],
    ) -> BTreeMap<NodeIndex, Result<(), SessionError>> {
        let mut tasks = JoinSet::new();
        for &index in nodes {
            let Some(node) = self.net_conf.get(index) else {
                continue;
            };
            let line = node_command(&self.settings.launcher, template, node, &self.id);
            debug!(session = %self.id, node = %index, command = %line, "Running node command");
            tasks.spawn(async move { (index, run_captured(line).await) });
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    results.insert(index, result);
                }
                Err(err) => warn!(session = %self.id, error = %err, "Node command task failed"),
            }
        }
        results
    }

    /// Move each node to `on_success` or `Down`. Returns the nodes marked down.
    fn apply_results(
        &mut self,
        nodes: &[NodeIndex],
        mut results: BTreeMap<NodeIndex, Result<(), SessionError>>,
        on_success: NodeState,
    ) -> Vec<NodeIndex> {
        let mut failed = Vec::new();
        for &index in nodes {
            match results.remove(&index) {
                Some(Ok(())) => {
                    self.net_conf.set_state(index, on_success);
                }
                Some(Err(err)) => {
                    warn!(session = %self.id, node = %index, error = %err, "Marking node down");
                    self.net_conf.set_state(index, NodeState::Down);
                    failed.push(index);
                }
                None => {
                    warn!(session = %self.id, node = %index, "Node command did not complete; marking node down");
                    self.net_conf.set_state(index, NodeState::Down);
                    failed.push(index);
                }
            }
        }
        failed
    }
}

#[async_trait]
impl LaunchSession for CommandSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn resilient(&self) -> bool {
        self.resilient
    }

    async fn run_startup(
        &mut self,
        hint: Option<NetworkConfiguration>,
    ) -> Result<NetworkConfiguration, PhaseError> {
        let settings = Arc::clone(&self.settings);
        self.net_conf = hint.unwrap_or_else(|| self.fresh_config());
        if !self.net_conf.has_front_end() {
            self.net_conf
                .insert(NodeDescriptor::front_end(self.front_end_host.as_str()));
        }

        let selected: Vec<NodeIndex> = self
            .net_conf
            .workers()
            .filter(|node| node.state().is_healthy())
            .take(self.node_count)
            .map(NodeDescriptor::index)
            .collect();
        if selected.is_empty() {
            return Err(self.fail(Phase::Startup, SessionError::NoHealthyNodes));
        }
        if selected.len() < self.node_count {
            warn!(
                session = %self.id,
                selected = selected.len(),
                node_count = self.node_count,
                "Fewer healthy nodes than requested"
            );
        }

        for &index in &selected {
            self.net_conf.set_state(index, NodeState::Pending);
        }
        info!(session = %self.id, nodes = selected.len(), "Starting nodes");

        let failed = match settings.startup.as_deref() {
            Some(template) => {
                let results = self.run_on_nodes(template, &selected).await;
                self.apply_results(&selected, results, NodeState::Active)
            }
            None => {
                for &index in &selected {
                    self.net_conf.set_state(index, NodeState::Active);
                }
                Vec::new()
            }
        };
        self.started
            .extend(selected.iter().copied().filter(|index| !failed.contains(index)));

        if !failed.is_empty() {
            return Err(self.fail(Phase::Startup, SessionError::NodesFailed { failed }));
        }
        Ok(self.net_conf.clone())
    }

    async fn run_app(&mut self) -> Result<NetworkConfiguration, PhaseError> {
        let settings = Arc::clone(&self.settings);
        let (nodes, count) = {
            let hosts: Vec<&str> = self
                .net_conf
                .workers_in(NodeState::Active)
                .map(NodeDescriptor::host_name)
                .collect();
            (hosts.join(","), hosts.len())
        };
        let env = [
            (NODES_ENV, nodes),
            (NODE_COUNT_ENV, count.to_string()),
            (SESSION_ID_ENV, self.id.clone()),
        ];
        let line = self.front_end_command(&settings.app);
        info!(session = %self.id, command = %line, nodes = count, "Running application");

        let Err(err) = run_inherited(&line, &env).await else {
            return Ok(self.net_conf.clone());
        };

        if let Some(probe) = settings.probe.as_deref() {
            let active = self.active_workers();
            let results = self.run_on_nodes(probe, &active).await;
            let down = self.apply_results(&active, results, NodeState::Active);
            info!(session = %self.id, probed = active.len(), down = down.len(), "Probed nodes after application failure");
        }
        Err(self.fail(Phase::App, err))
    }

    async fn run_msg_server(&mut self) -> Result<NetworkConfiguration, PhaseError> {
        let settings = Arc::clone(&self.settings);
        if let Some(template) = settings.msg_server.as_deref() {
            let line = self.front_end_command(template);
            info!(session = %self.id, command = %line, "Running message server");
            let env = [(SESSION_ID_ENV, self.id.clone())];
            if let Err(err) = run_inherited(&line, &env).await {
                return Err(self.fail(Phase::MsgServer, err));
            }
        }

        for index in self.active_workers() {
            self.net_conf.set_state(index, NodeState::Idle);
        }
        Ok(self.net_conf.clone())
    }

    fn teardown(&mut self) {
        let started = std::mem::take(&mut self.started);
        let Some(template) = self.settings.shutdown.as_deref() else {
            info!(session = %self.id, "Launch session released");
            return;
        };
        let timeout = self.settings.shutdown_timeout();

        for index in started {
            let Some(node) = self.net_conf.get(index) else {
                continue;
            };
            if node.state() == NodeState::Down {
                continue;
            }
            let line = node_command(&self.settings.launcher, template, node, &self.id);
            match run_bounded(&line, timeout) {
                Ok(Some(status)) if status.success() => {
                    debug!(session = %self.id, node = %index, "Node shut down");
                }
                Ok(Some(status)) => {
                    warn!(session = %self.id, node = %index, %status, "Shutdown command failed");
                }
                Ok(None) => {
                    warn!(
                        session = %self.id,
                        node = %index,
                        timeout_secs = timeout.as_secs(),
                        "Shutdown command timed out and was killed"
                    );
                }
                Err(err) => {
                    warn!(session = %self.id, node = %index, error = %err, "Failed to spawn shutdown command");
                }
            }
        }
        info!(session = %self.id, "Launch session released");
    }
}

/// Run `line` to completion on the calling thread, killing it after `timeout`.
///
/// Returns `None` when the command was killed.
fn run_bounded(
    line: &str,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let mut child = std::process::Command::new("sh")
        .arg("-c")
        .arg(line)
        .stdin(Stdio::null())
        .spawn()?;
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            // The child may exit between try_wait and kill.
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(SHUTDOWN_POLL_INTERVAL);
    }
}

fn shell(line: &str) -> Command {
    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(line)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    command
}

/// Run a node command with captured output.
async fn run_captured(line: String) -> Result<(), SessionError> {
    let output = shell(&line)
        .output()
        .await
        .map_err(|source| SessionError::Spawn {
            command: line.clone(),
            source,
        })?;
    if output.status.success() {
        return Ok(());
    }
    debug!(
        command = %line,
        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
        "Node command failed"
    );
    Err(SessionError::CommandFailed {
        command: line,
        status: output.status.to_string(),
    })
}

/// Run a front-end command with inherited stdio.
async fn run_inherited(line: &str, env: &[(&str, String)]) -> Result<(), SessionError> {
    let status = shell(line)
        .envs(env.iter().map(|(key, value)| (*key, value.as_str())))
        .status()
        .await
        .map_err(|source| SessionError::Spawn {
            command: line.to_string(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(SessionError::CommandFailed {
            command: line.to_string(),
            status: status.to_string(),
        })
    }
}
