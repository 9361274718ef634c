use async_stream::stream;
use futures::Stream;
use pullseq_protocol::Polled;
use pullseq_protocol::Result;
use pullseq_protocol::Session;
use tracing::warn;

/// Bridge a protocol session into a [`futures::Stream`].
///
/// The generator drains the fast path before every suspending wait and
/// disposes the session once the sequence ends; a production fault is
/// yielded as the final stream item, after disposal has run.
///
/// Dropping the stream before it ends falls back to the session's own
/// `Drop`, which releases what it can without suspending.
pub fn into_stream<S>(mut session: S) -> impl Stream<Item = Result<S::Item>>
where
    S: Session,
{
    stream! {
        let terminal = loop {
            match session.try_next() {
                Ok(Polled::Ready(item)) => {
                    yield Ok(item);
                    continue;
                }
                Ok(Polled::Exhausted) => break None,
                Ok(Polled::Pending) => {}
                Err(err) => break Some(err),
            }
            match session.wait_next().await {
                Ok(Some(item)) => yield Ok(item),
                Ok(None) => break None,
                Err(err) => break Some(err),
            }
        };
        if let Err(err) = session.dispose().await {
            warn!("session disposal failed, producer resources may leak: {err}");
        }
        if let Some(err) = terminal {
            yield Err(err);
        }
    }
}
