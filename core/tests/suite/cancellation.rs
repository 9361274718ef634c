use std::ops::ControlFlow;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use pullseq_core::drive_session;
use pullseq_protocol::Sequence;
use pullseq_protocol::SequenceError;
use pullseq_protocol::Session;
use pullseq_protocol::SessionState;
use tokio_test::assert_pending;
use tokio_test::task;
use tokio_util::sync::CancellationToken;

use super::harness::ScriptedSequence;
use super::harness::Step;

/// Cancelling the token while the loop is parked in a suspended wait fails
/// the drive with `Cancelled` and still runs disposal.
#[tokio::test]
async fn cancellation_during_a_suspended_wait_fails_and_disposes() -> anyhow::Result<()> {
    let sequence = ScriptedSequence::new(vec![Step::Ready(1), Step::Stall]);
    let counters = sequence.counters();
    let cancel = CancellationToken::new();
    let mut session = sequence.create_session()?;
    let mut seen = Vec::new();

    {
        let mut driving = task::spawn(drive_session(&mut session, &cancel, |item| {
            seen.push(item);
            ControlFlow::Continue(())
        }));
        assert_pending!(driving.poll());

        cancel.cancel();
        let outcome = driving.await;
        assert_matches!(outcome, Err(SequenceError::Cancelled));
    }

    assert_eq!(seen, vec![1]);
    assert_eq!(counters.disposals(), 1);
    assert_eq!(session.state(), SessionState::Disposed);
    Ok(())
}

/// Cancellation observed between elements short-circuits to disposal
/// without invoking the callback again.
#[tokio::test]
async fn cancellation_between_elements_skips_the_callback() -> anyhow::Result<()> {
    let sequence = ScriptedSequence::new(vec![Step::Ready(1), Step::Ready(2)]);
    let counters = sequence.counters();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut session = sequence.create_session()?;
    let mut seen = Vec::new();

    let outcome = drive_session(&mut session, &cancel, |item| {
        seen.push(item);
        ControlFlow::Continue(())
    })
    .await;

    assert_matches!(outcome, Err(SequenceError::Cancelled));
    assert!(seen.is_empty());
    assert_eq!(counters.polls(), 0);
    assert_eq!(counters.disposals(), 1);
    assert_eq!(session.state(), SessionState::Disposed);
    Ok(())
}
