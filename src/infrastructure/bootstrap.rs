//! Infrastructure bootstrap helpers for runtime wiring.

use tracing::info;

use crate::application::Orchestrator;
use crate::domain::ProcessIdentity;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::session::CommandSessionFactory;

/// Build the command session factory from configuration.
pub(crate) fn build_session_factory(
    config: &Config,
    identity: &ProcessIdentity,
) -> Result<CommandSessionFactory> {
    let policy = config.policy()?;
    let factory =
        CommandSessionFactory::new(config.session.clone(), &policy, identity.host_name());
    info!(
        hosts = factory.settings().hosts.len(),
        launcher = %factory.settings().launcher,
        "Command session factory ready"
    );
    Ok(factory)
}

/// Wire a launch orchestrator for `config`.
///
/// # Errors
///
/// Returns an error if the launch policy is invalid.
pub fn build_orchestrator(
    config: &Config,
    identity: ProcessIdentity,
) -> Result<Orchestrator<CommandSessionFactory>> {
    let policy = config.policy()?;
    let factory = build_session_factory(config, &identity)?;
    Ok(Orchestrator::new(factory, policy, identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::LoopState;
    use crate::domain::identity::FRONT_END_HOST_ID;

    #[test]
    fn orchestrator_takes_policy_from_config() {
        let mut config = Config::default();
        config.launch.node_count = 3;
        config.launch.resilient = true;
        config.launch.max_attempts = Some(2);
        config.session.hosts = vec!["a".into(), "b".into(), "c".into()];
        config.session.app = "true".into();
        let identity = ProcessIdentity::new(FRONT_END_HOST_ID, "fe", "test", 1, 1);

        let orchestrator = build_orchestrator(&config, identity).unwrap();

        assert_eq!(orchestrator.policy().node_count, 3);
        assert_eq!(orchestrator.policy().max_attempts, Some(2));
        assert_eq!(orchestrator.state(), &LoopState::Attempting);
        assert_eq!(orchestrator.identity().host_name(), "fe");
    }
}
