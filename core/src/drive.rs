use std::ops::ControlFlow;

use pullseq_protocol::Polled;
use pullseq_protocol::Result;
use pullseq_protocol::Sequence;
use pullseq_protocol::SequenceError;
use pullseq_protocol::Session;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;
use tracing::warn;

/// Open a session on `sequence` and drive it to completion. See
/// [`drive_session`].
pub async fn drive<Q, F>(sequence: &Q, cancel: &CancellationToken, on_item: F) -> Result<()>
where
    Q: Sequence,
    F: FnMut(Q::Item) -> ControlFlow<()>,
{
    let mut session = sequence.create_session()?;
    drive_session(&mut session, cancel, on_item).await
}

/// Drive `session` to completion, invoking `on_item` once per element in
/// production order.
///
/// The fast path (`try_next`) is drained before every suspending wait, so a
/// producer whose elements are synchronously ready costs one non-suspending
/// call per element. Returning `ControlFlow::Break` from the callback stops
/// the loop early.
///
/// Disposal runs on every exit path: normal exhaustion, early break,
/// producer fault, and cancellation. A disposal failure is logged and
/// swallowed; by the time disposal runs the loop has already decided how it
/// terminates.
pub async fn drive_session<S, F>(
    session: &mut S,
    cancel: &CancellationToken,
    mut on_item: F,
) -> Result<()>
where
    S: Session,
    F: FnMut(S::Item) -> ControlFlow<()>,
{
    let outcome = pump(session, cancel, &mut on_item).await;
    if let Err(err) = session.dispose().await {
        // Best-effort release: record the residual leak, keep the loop's
        // own outcome.
        warn!("session disposal failed, producer resources may leak: {err}");
    }
    outcome
}

async fn pump<S, F>(session: &mut S, cancel: &CancellationToken, on_item: &mut F) -> Result<()>
where
    S: Session,
    F: FnMut(S::Item) -> ControlFlow<()>,
{
    loop {
        // Cancellation observed between elements short-circuits without
        // invoking the callback again.
        if cancel.is_cancelled() {
            return Err(SequenceError::Cancelled);
        }

        match session.try_next()? {
            Polled::Ready(item) => {
                trace!("fast path produced an element");
                if on_item(item).is_break() {
                    debug!("consumer stopped iterating");
                    return Ok(());
                }
                continue;
            }
            Polled::Exhausted => {
                debug!("sequence exhausted on the fast path");
                return Ok(());
            }
            Polled::Pending => {}
        }

        let waited = tokio::select! {
            _ = cancel.cancelled() => return Err(SequenceError::Cancelled),
            waited = session.wait_next() => waited,
        };
        match waited? {
            Some(item) => {
                if on_item(item).is_break() {
                    debug!("consumer stopped iterating");
                    return Ok(());
                }
            }
            None => {
                debug!("sequence exhausted on the slow path");
                return Ok(());
            }
        }
    }
}
