use async_trait::async_trait;

use crate::error::Result;
use crate::state::SessionState;

/// Outcome of a fast-path poll.
///
/// Faults travel on the `Err` arm of the surrounding `Result`, so the poll
/// itself stays a plain value and needs no side channel to distinguish
/// exhaustion from failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled<T> {
    /// The next element was synchronously available.
    Ready(T),
    /// Production requires a suspending wait.
    Pending,
    /// The producer has committed its last element.
    Exhausted,
}

/// Factory capability for independent enumeration sessions.
///
/// Creating a session allocates iteration state and nothing else: no element
/// is produced and the call never suspends. Each call yields a session with
/// its own independent state. Handles that share mutable state must
/// serialize internally so `create_session` stays safe to call from multiple
/// tasks.
pub trait Sequence {
    type Item;
    type Session: Session<Item = Self::Item>;

    /// Fails with [`SequenceError::ResourceExhausted`] when iteration state
    /// cannot be allocated; a failed call must not leave a partially
    /// initialized session behind.
    ///
    /// [`SequenceError::ResourceExhausted`]: crate::error::SequenceError::ResourceExhausted
    fn create_session(&self) -> Result<Self::Session>;
}

/// One pass over an asynchronous sequence.
///
/// The `&mut self` receivers encode the single-consumer discipline: no two
/// calls can overlap on the same session without external synchronization,
/// and an element handed out by a successful call is owned by the caller
/// from that point on.
#[async_trait]
pub trait Session: Send {
    type Item: Send;

    /// Fast path: attempt to advance without suspending.
    ///
    /// Never blocks the calling thread and never suspends the calling task.
    /// After `Exhausted` (or disposal) further calls keep reporting
    /// `Exhausted`; after a fault they replay a `ProductionFailed` error.
    fn try_next(&mut self) -> Result<Polled<Self::Item>>;

    /// Slow path: suspend until the next element is available (`Some`), the
    /// sequence is exhausted (`None`), or production fails.
    ///
    /// Together with [`dispose`](Self::dispose) this is the only operation
    /// permitted to suspend.
    async fn wait_next(&mut self) -> Result<Option<Self::Item>>;

    /// Release producer resources (handles, timers, nested sessions).
    ///
    /// Idempotent and legal from every state, including after a fault or
    /// exhaustion; later calls are no-ops. Must run before the session is
    /// discarded, on every early-exit path included.
    async fn dispose(&mut self) -> Result<()>;

    fn state(&self) -> SessionState;
}
