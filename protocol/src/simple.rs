use async_trait::async_trait;

use crate::error::Result;
use crate::error::SequenceError;
use crate::session::Polled;
use crate::session::Session;
use crate::state::SessionState;
use crate::state::StateCell;

/// The ergonomic single-suspension surface: one suspending `advance` per
/// element, mirroring synchronous iteration.
///
/// Easier to hand-implement than [`Session`], at the cost of one
/// suspension-capable call per element unconditionally. The two adapters
/// below convert between the shapes in either direction, so combinators can
/// be written against [`Session`] alone.
#[async_trait]
pub trait SimpleSession: Send {
    type Item: Send;

    /// Advance to the next element. `true` means an element is available
    /// through [`take_current`](Self::take_current), `false` means the
    /// sequence is exhausted.
    async fn advance(&mut self) -> Result<bool>;

    /// Take the element made available by the last successful `advance`.
    /// `None` if it was already taken or no `advance` has succeeded yet.
    fn take_current(&mut self) -> Option<Self::Item>;

    /// See [`Session::dispose`].
    async fn dispose(&mut self) -> Result<()>;
}

/// Presents a dual-mode session through the simple surface by always taking
/// the slow path.
pub struct SimpleAdapter<S: Session> {
    inner: S,
    current: Option<S::Item>,
}

impl<S: Session> SimpleAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            current: None,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: Session> SimpleSession for SimpleAdapter<S> {
    type Item = S::Item;

    async fn advance(&mut self) -> Result<bool> {
        match self.inner.wait_next().await? {
            Some(item) => {
                self.current = Some(item);
                Ok(true)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }

    fn take_current(&mut self) -> Option<S::Item> {
        self.current.take()
    }

    async fn dispose(&mut self) -> Result<()> {
        self.inner.dispose().await
    }
}

/// Lifts a simple session into the dual-mode surface.
///
/// The simple shape has no non-blocking check to delegate to, so the fast
/// path always reports `Pending` and every element costs one suspending
/// `advance` plus one cheap failed poll.
#[derive(Debug)]
pub struct DualModeAdapter<S> {
    inner: S,
    state: StateCell,
}

impl<S> DualModeAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: StateCell::new(),
        }
    }
}

#[async_trait]
impl<S: SimpleSession> Session for DualModeAdapter<S> {
    type Item = S::Item;

    fn try_next(&mut self) -> Result<Polled<S::Item>> {
        match self.state.get() {
            SessionState::Exhausted | SessionState::Disposed => Ok(Polled::Exhausted),
            SessionState::Faulted => Err(SequenceError::already_faulted()),
            _ => {
                self.state.note_pending();
                Ok(Polled::Pending)
            }
        }
    }

    async fn wait_next(&mut self) -> Result<Option<S::Item>> {
        match self.state.get() {
            SessionState::Exhausted | SessionState::Disposed => return Ok(None),
            SessionState::Faulted => return Err(SequenceError::already_faulted()),
            _ => {}
        }
        self.state.begin_wait();
        match self.inner.advance().await {
            Ok(true) => match self.inner.take_current() {
                Some(item) => {
                    self.state.note_ready();
                    Ok(Some(item))
                }
                None => {
                    self.state.note_fault();
                    Err(SequenceError::production(anyhow::anyhow!(
                        "producer reported an element but none was available"
                    )))
                }
            },
            Ok(false) => {
                self.state.note_exhausted();
                Ok(None)
            }
            Err(err) => {
                self.state.note_fault();
                Err(err)
            }
        }
    }

    async fn dispose(&mut self) -> Result<()> {
        if self.state.get() == SessionState::Disposed {
            return Ok(());
        }
        let released = self.inner.dispose().await;
        self.state.note_disposed();
        released
    }

    fn state(&self) -> SessionState {
        self.state.get()
    }
}
