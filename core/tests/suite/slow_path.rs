use std::ops::ControlFlow;

use pretty_assertions::assert_eq;
use pullseq_core::drive;
use tokio_util::sync::CancellationToken;

use super::harness::ScriptedSequence;
use super::harness::Step;

/// A strictly asynchronous producer costs one failed poll and one
/// suspending wait per element, plus one of each for the terminal
/// exhaustion signal.
#[tokio::test]
async fn always_async_producer_waits_once_per_element() -> anyhow::Result<()> {
    let sequence = ScriptedSequence::new(vec![
        Step::Deferred(1),
        Step::Deferred(2),
        Step::Deferred(3),
        Step::End,
    ]);
    let counters = sequence.counters();
    let cancel = CancellationToken::new();
    let mut seen = Vec::new();

    drive(&sequence, &cancel, |item| {
        seen.push(item);
        ControlFlow::Continue(())
    })
    .await?;

    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(counters.polls(), 4);
    assert_eq!(counters.waits(), 4);
    assert_eq!(counters.disposals(), 1);
    Ok(())
}

/// Mixed producers interleave the two paths: ready elements are drained
/// without suspension, deferred ones fall back to the wait.
#[tokio::test]
async fn mixed_producer_interleaves_fast_and_slow_paths() -> anyhow::Result<()> {
    let sequence = ScriptedSequence::new(vec![
        Step::Ready(1),
        Step::Deferred(2),
        Step::Ready(3),
        Step::End,
    ]);
    let counters = sequence.counters();
    let cancel = CancellationToken::new();
    let mut seen = Vec::new();

    drive(&sequence, &cancel, |item| {
        seen.push(item);
        ControlFlow::Continue(())
    })
    .await?;

    assert_eq!(seen, vec![1, 2, 3]);
    // Polls: ready(1), pending, ready(3), pending-at-end.
    assert_eq!(counters.polls(), 4);
    // Waits: deferred(2), terminal exhaustion.
    assert_eq!(counters.waits(), 2);
    assert_eq!(counters.disposals(), 1);
    Ok(())
}
