use std::sync::Mutex;

use async_trait::async_trait;
use pullseq_protocol::Polled;
use pullseq_protocol::Result;
use pullseq_protocol::Sequence;
use pullseq_protocol::SequenceError;
use pullseq_protocol::Session;
use pullseq_protocol::SessionState;
use pullseq_protocol::StateCell;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::debug;

/// Create a bounded channel-backed sequence.
///
/// Elements committed through the returned sender are observed by the
/// session in commit order. Dropping the sender exhausts the sequence;
/// [`SequenceSender::fail`] faults it instead.
pub fn channel<T>(capacity: usize) -> (SequenceSender<T>, ChannelSequence<T>) {
    let (tx, rx) = mpsc::channel::<Result<T>>(capacity);
    (
        SequenceSender { tx },
        ChannelSequence {
            receiver: Mutex::new(Some(rx)),
        },
    )
}

/// Producer half of [`channel`].
#[derive(Debug, Clone)]
pub struct SequenceSender<T> {
    tx: mpsc::Sender<Result<T>>,
}

impl<T> SequenceSender<T> {
    /// Commit the next element. Returns `false` once the consuming session
    /// has been disposed.
    pub async fn send(&self, item: T) -> bool {
        self.tx.send(Ok(item)).await.is_ok()
    }

    /// Commit a terminal production fault. The session observes it from
    /// whichever production call runs next.
    pub async fn fail(self, cause: anyhow::Error) {
        let _ = self.tx.send(Err(SequenceError::production(cause))).await;
    }
}

/// Handle half of [`channel`].
///
/// A channel cannot replay elements, so the handle supports exactly one
/// session; later `create_session` calls fail with `ResourceExhausted`. The
/// receiver slot is serialized internally, which keeps concurrent creation
/// attempts safe.
#[derive(Debug)]
pub struct ChannelSequence<T> {
    receiver: Mutex<Option<mpsc::Receiver<Result<T>>>>,
}

impl<T: Send> Sequence for ChannelSequence<T> {
    type Item = T;
    type Session = ChannelSession<T>;

    fn create_session(&self) -> Result<Self::Session> {
        let mut slot = self
            .receiver
            .lock()
            .map_err(|_| SequenceError::resource_exhausted("sequence handle lock poisoned"))?;
        match slot.take() {
            Some(rx) => Ok(ChannelSession {
                rx,
                state: StateCell::new(),
            }),
            None => Err(SequenceError::resource_exhausted(
                "channel sequence supports a single session",
            )),
        }
    }
}

/// Enumeration session over the receiving half of the channel.
#[derive(Debug)]
pub struct ChannelSession<T> {
    rx: mpsc::Receiver<Result<T>>,
    state: StateCell,
}

#[async_trait]
impl<T: Send> Session for ChannelSession<T> {
    type Item = T;

    fn try_next(&mut self) -> Result<Polled<T>> {
        match self.state.get() {
            SessionState::Exhausted | SessionState::Disposed => return Ok(Polled::Exhausted),
            SessionState::Faulted => return Err(SequenceError::already_faulted()),
            _ => {}
        }
        match self.rx.try_recv() {
            Ok(Ok(item)) => {
                self.state.note_ready();
                Ok(Polled::Ready(item))
            }
            Ok(Err(err)) => {
                self.state.note_fault();
                Err(err)
            }
            Err(TryRecvError::Empty) => {
                self.state.note_pending();
                Ok(Polled::Pending)
            }
            Err(TryRecvError::Disconnected) => {
                self.state.note_exhausted();
                Ok(Polled::Exhausted)
            }
        }
    }

    async fn wait_next(&mut self) -> Result<Option<T>> {
        match self.state.get() {
            SessionState::Exhausted | SessionState::Disposed => return Ok(None),
            SessionState::Faulted => return Err(SequenceError::already_faulted()),
            _ => {}
        }
        self.state.begin_wait();
        match self.rx.recv().await {
            Some(Ok(item)) => {
                self.state.note_ready();
                Ok(Some(item))
            }
            Some(Err(err)) => {
                self.state.note_fault();
                Err(err)
            }
            None => {
                self.state.note_exhausted();
                Ok(None)
            }
        }
    }

    async fn dispose(&mut self) -> Result<()> {
        if self.state.get() == SessionState::Disposed {
            return Ok(());
        }
        // Closing the receiver wakes the producer side; anything still in
        // flight is dropped.
        self.rx.close();
        self.state.note_disposed();
        debug!("channel session disposed");
        Ok(())
    }

    fn state(&self) -> SessionState {
        self.state.get()
    }
}
