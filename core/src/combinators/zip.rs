use async_trait::async_trait;
use pullseq_protocol::Polled;
use pullseq_protocol::Result;
use pullseq_protocol::Sequence;
use pullseq_protocol::SequenceError;
use pullseq_protocol::Session;
use pullseq_protocol::SessionState;
use pullseq_protocol::StateCell;
use tracing::warn;

/// Pair two sequences element-wise.
///
/// The combined session prefers fast-path polls on both constituents before
/// suspending on whichever side has not yet produced its next element. The
/// pair is exhausted as soon as either side is, and disposing it always
/// disposes both constituents.
pub fn zip<A, B>(left: A, right: B) -> ZipSequence<A, B> {
    ZipSequence { left, right }
}

/// Handle produced by [`zip`].
#[derive(Debug)]
pub struct ZipSequence<A, B> {
    left: A,
    right: B,
}

impl<A, B> Sequence for ZipSequence<A, B>
where
    A: Sequence,
    B: Sequence,
    A::Item: Send,
    B::Item: Send,
{
    type Item = (A::Item, B::Item);
    type Session = ZipSession<A::Session, B::Session>;

    fn create_session(&self) -> Result<Self::Session> {
        Ok(ZipSession {
            left: self.left.create_session()?,
            right: self.right.create_session()?,
            left_slot: None,
            right_slot: None,
            state: StateCell::new(),
        })
    }
}

/// Enumeration session pairing two constituent sessions.
pub struct ZipSession<L, R>
where
    L: Session,
    R: Session,
{
    left: L,
    right: R,
    left_slot: Option<L::Item>,
    right_slot: Option<R::Item>,
    state: StateCell,
}

impl<L, R> ZipSession<L, R>
where
    L: Session,
    R: Session,
{
    fn fault_gate<T>(&mut self, polled: Result<T>) -> Result<T> {
        if polled.is_err() {
            self.state.note_fault();
        }
        polled
    }
}

#[async_trait]
impl<L, R> Session for ZipSession<L, R>
where
    L: Session,
    R: Session,
{
    type Item = (L::Item, R::Item);

    fn try_next(&mut self) -> Result<Polled<Self::Item>> {
        match self.state.get() {
            SessionState::Exhausted | SessionState::Disposed => return Ok(Polled::Exhausted),
            SessionState::Faulted => return Err(SequenceError::already_faulted()),
            _ => {}
        }
        if self.left_slot.is_none() {
            let polled = self.left.try_next();
            match self.fault_gate(polled)? {
                Polled::Ready(item) => self.left_slot = Some(item),
                Polled::Pending => {}
                Polled::Exhausted => {
                    self.state.note_exhausted();
                    return Ok(Polled::Exhausted);
                }
            }
        }
        if self.right_slot.is_none() {
            let polled = self.right.try_next();
            match self.fault_gate(polled)? {
                Polled::Ready(item) => self.right_slot = Some(item),
                Polled::Pending => {}
                Polled::Exhausted => {
                    self.state.note_exhausted();
                    return Ok(Polled::Exhausted);
                }
            }
        }
        match (self.left_slot.take(), self.right_slot.take()) {
            (Some(left), Some(right)) => {
                self.state.note_ready();
                Ok(Polled::Ready((left, right)))
            }
            (left_slot, right_slot) => {
                self.left_slot = left_slot;
                self.right_slot = right_slot;
                self.state.note_pending();
                Ok(Polled::Pending)
            }
        }
    }

    async fn wait_next(&mut self) -> Result<Option<Self::Item>> {
        loop {
            match self.try_next()? {
                Polled::Ready(pair) => return Ok(Some(pair)),
                Polled::Exhausted => return Ok(None),
                Polled::Pending => {}
            }
            // Suspend on whichever side still owes an element, left first.
            if self.left_slot.is_none() {
                self.state.begin_wait();
                match self.left.wait_next().await {
                    Ok(Some(item)) => self.left_slot = Some(item),
                    Ok(None) => {
                        self.state.note_exhausted();
                        return Ok(None);
                    }
                    Err(err) => {
                        self.state.note_fault();
                        return Err(err);
                    }
                }
            }
            if self.right_slot.is_none() {
                self.state.begin_wait();
                match self.right.wait_next().await {
                    Ok(Some(item)) => self.right_slot = Some(item),
                    Ok(None) => {
                        self.state.note_exhausted();
                        return Ok(None);
                    }
                    Err(err) => {
                        self.state.note_fault();
                        return Err(err);
                    }
                }
            }
        }
    }

    async fn dispose(&mut self) -> Result<()> {
        if self.state.get() == SessionState::Disposed {
            return Ok(());
        }
        // Both constituents are always disposed, even when the first
        // release fails.
        let left = self.left.dispose().await;
        let right = self.right.dispose().await;
        self.state.note_disposed();
        match (left, right) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Err(err), Err(second)) => {
                warn!("secondary constituent disposal also failed: {second}");
                Err(err)
            }
        }
    }

    fn state(&self) -> SessionState {
        self.state.get()
    }
}
