//! The command session driven by the launch loop end to end.

use nodelaunch::application::{AttemptOutcome, LoopState, Orchestrator};
use nodelaunch::domain::identity::FRONT_END_HOST_ID;
use nodelaunch::domain::{AbortReason, ExitStatus, NodeIndex, NodeState, Phase, ProcessIdentity};
use nodelaunch::infrastructure::bootstrap::build_orchestrator;
use nodelaunch::infrastructure::session::CommandSessionFactory;
use nodelaunch::testkit::config::{config, exhaustive, resilient, session};

fn identity() -> ProcessIdentity {
    ProcessIdentity::new(FRONT_END_HOST_ID, "fe", "nodelaunch-fe", 1, 1)
}

#[tokio::test]
async fn retries_onto_spare_hosts() {
    let config = config(&["a", "b", "bad", "c"], 3);
    let mut orchestrator = build_orchestrator(&config, identity()).unwrap();

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(orchestrator.attempts(), 2);
    assert!(matches!(
        orchestrator.history()[0].outcome,
        AttemptOutcome::Failed {
            phase: Phase::Startup,
            available: Some(3),
            ..
        }
    ));

    let net_conf = orchestrator.network_config().unwrap();
    assert_eq!(
        net_conf.get(NodeIndex::Worker(2)).unwrap().state(),
        NodeState::Down
    );
    let idle: Vec<_> = net_conf
        .workers_in(NodeState::Idle)
        .map(|node| node.host_name())
        .collect();
    assert_eq!(idle, ["a", "b", "c"]);
}

#[tokio::test]
async fn threshold_abort_when_one_short() {
    let config = config(&["a", "bad", "c"], 3);
    let mut orchestrator = build_orchestrator(&config, identity()).unwrap();

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(orchestrator.attempts(), 1);
    assert_eq!(
        orchestrator.state(),
        &LoopState::Aborted(AbortReason::InsufficientResources {
            available: 2,
            node_count: 3
        })
    );
}

#[tokio::test]
async fn exhaust_mode_runs_until_no_host_is_left() {
    let settings = session(&["bad", "bad", "bad"]);
    let factory = CommandSessionFactory::new(settings, &exhaustive(2), "fe");
    let mut orchestrator = Orchestrator::new(factory, exhaustive(2), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    // Two hosts fail on the first attempt, the third on the second.
    assert_eq!(orchestrator.attempts(), 2);
    assert_eq!(
        orchestrator.state(),
        &LoopState::Aborted(AbortReason::NoResourcesLeft)
    );
}

#[tokio::test]
async fn app_failure_is_retried_with_probed_configuration() {
    let mut settings = session(&["a", "b", "c"]);
    settings.app = "test \"$NODELAUNCH_NODES\" != a,b".into();
    settings.probe = Some("test {host} != b".into());
    let factory = CommandSessionFactory::new(settings, &resilient(2), "fe");
    let mut orchestrator = Orchestrator::new(factory, resilient(2), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(orchestrator.attempts(), 2);
    let net_conf = orchestrator.network_config().unwrap();
    assert_eq!(
        net_conf.get(NodeIndex::Worker(1)).unwrap().state(),
        NodeState::Down
    );
    assert_eq!(net_conf.available_workers(), 2);
}

#[tokio::test]
async fn no_hosts_is_a_fatal_construction_failure() {
    let config = config(&[], 1);
    let mut orchestrator = build_orchestrator(&config, identity()).unwrap();

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert!(matches!(
        orchestrator.state(),
        LoopState::Aborted(AbortReason::SessionUnavailable { .. })
    ));
}

#[tokio::test]
async fn non_resilient_config_does_not_retry() {
    let mut config = config(&["a", "bad", "c", "d"], 3);
    config.launch.resilient = false;
    let mut orchestrator = build_orchestrator(&config, identity()).unwrap();

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(orchestrator.attempts(), 1);
    assert_eq!(
        orchestrator.state(),
        &LoopState::Aborted(AbortReason::NotResilient)
    );
}
