use async_trait::async_trait;
use pullseq_protocol::Polled;
use pullseq_protocol::Result;
use pullseq_protocol::Sequence;
use pullseq_protocol::SequenceError;
use pullseq_protocol::Session;
use pullseq_protocol::SessionState;
use pullseq_protocol::StateCell;

/// Sequence backed by a cloneable iterable. Every element is synchronously
/// ready, so consumers never leave the fast path.
#[derive(Debug, Clone)]
pub struct IterSequence<I> {
    source: I,
}

impl<I> IterSequence<I>
where
    I: IntoIterator + Clone,
{
    pub fn new(source: I) -> Self {
        Self { source }
    }
}

impl<I> Sequence for IterSequence<I>
where
    I: IntoIterator + Clone,
    I::IntoIter: Send,
    I::Item: Send,
{
    type Item = I::Item;
    type Session = IterSession<I::IntoIter>;

    fn create_session(&self) -> Result<Self::Session> {
        // Cloning the source is the only work done here; no element is
        // produced until the session is driven.
        Ok(IterSession {
            iter: self.source.clone().into_iter(),
            state: StateCell::new(),
        })
    }
}

/// Enumeration session over a cloned iterator. See [`IterSequence`].
#[derive(Debug)]
pub struct IterSession<It> {
    iter: It,
    state: StateCell,
}

#[async_trait]
impl<It> Session for IterSession<It>
where
    It: Iterator + Send,
    It::Item: Send,
{
    type Item = It::Item;

    fn try_next(&mut self) -> Result<Polled<It::Item>> {
        match self.state.get() {
            SessionState::Exhausted | SessionState::Disposed => return Ok(Polled::Exhausted),
            SessionState::Faulted => return Err(SequenceError::already_faulted()),
            _ => {}
        }
        match self.iter.next() {
            Some(item) => {
                self.state.note_ready();
                Ok(Polled::Ready(item))
            }
            None => {
                self.state.note_exhausted();
                Ok(Polled::Exhausted)
            }
        }
    }

    async fn wait_next(&mut self) -> Result<Option<It::Item>> {
        match self.try_next()? {
            Polled::Ready(item) => Ok(Some(item)),
            // An iterator is never pending, so anything else is exhaustion.
            Polled::Pending | Polled::Exhausted => Ok(None),
        }
    }

    async fn dispose(&mut self) -> Result<()> {
        self.state.note_disposed();
        Ok(())
    }

    fn state(&self) -> SessionState {
        self.state.get()
    }
}
