mod common;

use common::StubCompute;
use std::time::Duration;
use zncup_cloud::{
    await_operation, OpScope, OpStatus, Operation, PollOutcome, PollPolicy,
};

fn running_op() -> Operation {
    Operation {
        name: "op-slow".to_string(),
        status: OpStatus::Running,
        error: None,
    }
}

/// An operation that never reaches a terminal state is reported as
/// timed out only after the regional ceiling (300 s), not before.
/// Paused tokio time makes the virtual five-minute wait instant.
#[tokio::test(start_paused = true)]
async fn regional_operation_times_out_at_ceiling() {
    let stub = StubCompute::new().never_done();
    let policy = PollPolicy::default();
    let scope = OpScope::Regional("us-west1".to_string());

    let (outcome, _) = await_operation(&stub, &scope, running_op(), &policy, "IP reservation").await;

    match outcome {
        PollOutcome::TimedOut { waited } => {
            assert!(waited >= Duration::from_secs(300), "gave up early: {waited:?}");
            assert!(waited <= Duration::from_secs(310), "overshot: {waited:?}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }

    // 5 s interval over a 300 s ceiling: roughly sixty polls, not two.
    let polls = stub.calls("get_operation");
    assert!(polls >= 60, "only {polls} status fetches before timeout");
}

/// Zonal operations get the longer instance ceiling (600 s).
#[tokio::test(start_paused = true)]
async fn zonal_operation_times_out_at_longer_ceiling() {
    let stub = StubCompute::new().never_done();
    let policy = PollPolicy::default();
    let scope = OpScope::Zonal("us-west1-a".to_string());

    let (outcome, _) =
        await_operation(&stub, &scope, running_op(), &policy, "instance creation").await;

    match outcome {
        PollOutcome::TimedOut { waited } => {
            assert!(waited >= Duration::from_secs(600), "gave up early: {waited:?}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

/// An operation that is already DONE completes without a single
/// status fetch or sleep.
#[tokio::test]
async fn done_operation_returns_immediately() {
    let stub = StubCompute::new();
    let op = Operation {
        name: "op-done".to_string(),
        status: OpStatus::Done,
        error: None,
    };

    let (outcome, _) = await_operation(
        &stub,
        &OpScope::Global,
        op,
        &PollPolicy::default(),
        "firewall rule creation",
    )
    .await;

    assert_eq!(outcome, PollOutcome::Success);
    assert_eq!(stub.calls("get_operation"), 0);
}

/// A DONE operation carrying an error payload is a failure with the
/// joined details, not a success.
#[tokio::test]
async fn done_operation_with_error_fails() {
    let stub = StubCompute::new();
    let op: Operation = serde_json::from_str(
        r#"{"name":"op-err","status":"DONE","error":{"errors":[
            {"code":"QUOTA_EXCEEDED","message":"addresses quota exceeded"}
        ]}}"#,
    )
    .unwrap();

    let (outcome, _) = await_operation(
        &stub,
        &OpScope::Regional("us-west1".to_string()),
        op,
        &PollPolicy::default(),
        "IP reservation",
    )
    .await;

    match outcome {
        PollOutcome::Failed(details) => assert!(details.contains("QUOTA_EXCEEDED")),
        other => panic!("expected failure, got {other:?}"),
    }
}
