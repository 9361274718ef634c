use std::ops::ControlFlow;

use pretty_assertions::assert_eq;
use pullseq_core::IterSequence;
use pullseq_core::drive_session;
use pullseq_protocol::Sequence;
use pullseq_protocol::SequenceError;
use pullseq_protocol::Session;
use pullseq_protocol::SessionState;
use tokio_util::sync::CancellationToken;

/// Two sessions from the same handle, driven concurrently on separate
/// tasks, each observe the full element sequence independently.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_sessions_observe_independent_sequences() -> anyhow::Result<()> {
    let sequence = IterSequence::new(vec![10, 20, 30]);
    let mut tasks = Vec::new();

    for _ in 0..2 {
        let mut session = sequence.create_session()?;
        tasks.push(tokio::spawn(async move {
            let cancel = CancellationToken::new();
            let mut seen = Vec::new();
            drive_session(&mut session, &cancel, |item| {
                seen.push(item);
                ControlFlow::Continue(())
            })
            .await?;
            assert_eq!(session.state(), SessionState::Disposed);
            Ok::<_, SequenceError>(seen)
        }));
    }

    for task in tasks {
        let seen = task.await??;
        assert_eq!(seen, vec![10, 20, 30]);
    }
    Ok(())
}
