//! Launch loop behavior against scripted sessions.

use nodelaunch::application::{AttemptOutcome, LoopState, Orchestrator};
use nodelaunch::domain::identity::FRONT_END_HOST_ID;
use nodelaunch::domain::{AbortReason, ExitStatus, NodeState, Phase, ProcessIdentity};
use nodelaunch::testkit::config::{exhaustive, policy, resilient};
use nodelaunch::testkit::domain::{degraded_network, healthy_network, network};
use nodelaunch::testkit::session::{AttemptScript, Call, ScriptedFactory};

fn identity() -> ProcessIdentity {
    ProcessIdentity::new(FRONT_END_HOST_ID, "fe", "nodelaunch-fe", 100, 100)
}

#[tokio::test]
async fn successful_attempt_runs_phases_in_order_once() {
    let factory = ScriptedFactory::new([AttemptScript::succeeding(healthy_network(3))]);
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(factory, resilient(3), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(
        journal.calls(),
        vec![
            Call::Acquire { attempt: 1 },
            Call::Startup {
                attempt: 1,
                hint: None
            },
            Call::App { attempt: 1 },
            Call::MsgServer { attempt: 1 },
            Call::Teardown { attempt: 1 },
        ]
    );
    assert_eq!(orchestrator.attempts(), 1);
    assert_eq!(orchestrator.state(), &LoopState::Succeeded);
}

#[tokio::test]
async fn every_failing_phase_tears_down_exactly_once() {
    for phase in Phase::ORDER {
        let factory = ScriptedFactory::new([
            AttemptScript::failing_at(phase, healthy_network(4)),
            AttemptScript::succeeding(healthy_network(4)),
        ]);
        let journal = factory.journal();
        let mut orchestrator = Orchestrator::new(factory, resilient(2), identity());

        let status = orchestrator.run().await;

        assert_eq!(status, ExitStatus::Success, "failure at {phase}");
        assert_eq!(journal.acquisitions(), 2, "failure at {phase}");
        assert_eq!(journal.teardowns(), 2, "failure at {phase}");
        let first = journal.calls_for(1);
        assert_eq!(first.last(), Some(&Call::Teardown { attempt: 1 }));
        assert_eq!(
            first
                .iter()
                .filter(|call| matches!(call, Call::Teardown { .. }))
                .count(),
            1
        );
    }
}

#[tokio::test]
async fn failing_phase_stops_later_phases() {
    let factory = ScriptedFactory::new([AttemptScript::failing_at(
        Phase::Startup,
        healthy_network(2),
    )
    .non_resilient()]);
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(factory, resilient(2), identity());

    orchestrator.run().await;

    let calls = journal.calls_for(1);
    assert!(!calls.iter().any(|call| matches!(call, Call::App { .. })));
    assert!(!calls.iter().any(|call| matches!(call, Call::MsgServer { .. })));
}

#[tokio::test]
async fn exhaust_mode_aborts_only_when_nothing_is_left() {
    let factory = ScriptedFactory::new([
        AttemptScript::failing_at(Phase::App, degraded_network(1, 3)),
        AttemptScript::failing_at(Phase::App, degraded_network(0, 4)),
    ]);
    let mut orchestrator = Orchestrator::new(factory, exhaustive(4), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(orchestrator.attempts(), 2);
    assert_eq!(
        orchestrator.state(),
        &LoopState::Aborted(AbortReason::NoResourcesLeft)
    );
}

#[tokio::test]
async fn threshold_mode_aborts_one_below_request() {
    let factory = ScriptedFactory::new([
        AttemptScript::failing_at(Phase::MsgServer, degraded_network(5, 1)),
        AttemptScript::failing_at(Phase::MsgServer, degraded_network(4, 2)),
    ]);
    let mut orchestrator = Orchestrator::new(factory, resilient(5), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(orchestrator.attempts(), 2);
    assert_eq!(
        orchestrator.state(),
        &LoopState::Aborted(AbortReason::InsufficientResources {
            available: 4,
            node_count: 5
        })
    );
}

#[tokio::test]
async fn non_resilient_session_aborts_at_full_health() {
    let factory = ScriptedFactory::new([
        AttemptScript::failing_at(Phase::App, healthy_network(8)).non_resilient(),
        AttemptScript::succeeding(healthy_network(8)),
    ]);
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(factory, resilient(2), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(journal.acquisitions(), 1);
    assert_eq!(
        orchestrator.state(),
        &LoopState::Aborted(AbortReason::NotResilient)
    );
    assert!(matches!(
        orchestrator.history()[0].outcome,
        AttemptOutcome::Failed {
            available: None,
            ..
        }
    ));
}

#[tokio::test]
async fn last_returned_configuration_is_next_hint() {
    let after_startup = degraded_network(3, 1);
    let factory = ScriptedFactory::new([
        AttemptScript::failing_at(Phase::App, after_startup.clone()),
        AttemptScript::succeeding(healthy_network(3)),
    ]);
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(factory, resilient(2), identity());

    orchestrator.run().await;

    assert_eq!(journal.startup_hints(), vec![None, Some(after_startup)]);
}

#[tokio::test]
async fn failure_snapshot_replaces_carried_configuration() {
    let snapshot = network(&[NodeState::Active, NodeState::Down, NodeState::Idle]);
    let factory = ScriptedFactory::new([
        AttemptScript::failing_at(Phase::App, healthy_network(3)).with_snapshot(snapshot.clone()),
        AttemptScript::succeeding(healthy_network(3)),
    ]);
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(factory, resilient(1), identity());

    orchestrator.run().await;

    assert_eq!(journal.startup_hints()[1], Some(snapshot));
}

#[tokio::test]
async fn startup_failure_without_snapshot_carries_none() {
    let factory = ScriptedFactory::new([
        AttemptScript::failing_at(Phase::Startup, healthy_network(3)),
        AttemptScript::succeeding(healthy_network(3)),
    ]);
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(factory, exhaustive(3), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(journal.startup_hints(), vec![None]);
    assert_eq!(
        orchestrator.state(),
        &LoopState::Aborted(AbortReason::NoResourcesLeft)
    );
}

#[tokio::test]
async fn initial_configuration_seeds_first_hint() {
    let seed = healthy_network(2);
    let factory = ScriptedFactory::new([AttemptScript::succeeding(healthy_network(2))]);
    let journal = factory.journal();
    let mut orchestrator =
        Orchestrator::new(factory, resilient(2), identity()).with_initial_config(seed.clone());

    orchestrator.run().await;

    assert_eq!(journal.startup_hints(), vec![Some(seed)]);
}

#[tokio::test]
async fn first_attempt_success_keeps_final_configuration() {
    let output = healthy_network(4);
    let factory = ScriptedFactory::new([AttemptScript::succeeding(output.clone())]);
    let mut orchestrator = Orchestrator::new(factory, policy(4, false, false), identity());

    assert_eq!(orchestrator.run().await, ExitStatus::Success);
    assert_eq!(orchestrator.network_config(), Some(&output));
    assert_eq!(orchestrator.history().len(), 1);
    assert_eq!(orchestrator.history()[0].outcome, AttemptOutcome::Completed);
}

#[tokio::test]
async fn acquisition_failure_is_fatal() {
    let factory = ScriptedFactory::new(Vec::<AttemptScript>::new()).then_unavailable();
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(factory, resilient(2), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(journal.teardowns(), 0);
    assert_eq!(orchestrator.attempts(), 1);
    assert!(matches!(
        orchestrator.state(),
        LoopState::Aborted(AbortReason::SessionUnavailable { .. })
    ));
}

#[tokio::test]
async fn acquisition_failure_after_retry_ends_loop() {
    let factory = ScriptedFactory::new([AttemptScript::failing_at(
        Phase::App,
        healthy_network(4),
    )])
    .then_unavailable()
    .then(AttemptScript::succeeding(healthy_network(4)));
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(factory, resilient(2), identity());

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(journal.acquisitions(), 1);
    assert_eq!(journal.teardowns(), 1);
    assert_eq!(orchestrator.attempts(), 2);
}

#[tokio::test]
async fn max_attempts_stops_retrying() {
    let factory = ScriptedFactory::new([
        AttemptScript::failing_at(Phase::App, healthy_network(4)),
        AttemptScript::failing_at(Phase::App, healthy_network(4)),
        AttemptScript::succeeding(healthy_network(4)),
    ]);
    let journal = factory.journal();
    let mut orchestrator = Orchestrator::new(
        factory,
        resilient(2).with_max_attempts(Some(2)),
        identity(),
    );

    let status = orchestrator.run().await;

    assert_eq!(status, ExitStatus::Fail);
    assert_eq!(journal.acquisitions(), 2);
    assert_eq!(
        orchestrator.state(),
        &LoopState::Aborted(AbortReason::AttemptsExhausted { attempts: 2 })
    );
}
