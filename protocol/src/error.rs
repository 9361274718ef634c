use thiserror::Error;

pub type Result<T> = std::result::Result<T, SequenceError>;

/// Failure taxonomy for the sequence protocol.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// Session creation could not allocate the required iteration state.
    /// Not retryable without external remediation.
    #[error("failed to allocate enumeration session: {reason}")]
    ResourceExhausted { reason: String },

    /// The producer failed while computing the next element. The session is
    /// faulted; only disposal remains legal.
    #[error("producer failed while computing the next element")]
    ProductionFailed {
        #[source]
        cause: anyhow::Error,
    },

    /// A suspension point was cancelled externally. The session must still
    /// be disposed.
    #[error("enumeration was cancelled")]
    Cancelled,

    /// Resource release failed. The session still counts as terminally
    /// disposed; callers must not retry disposal expecting success.
    #[error("failed to release session resources")]
    DisposalFailed {
        #[source]
        cause: anyhow::Error,
    },
}

impl SequenceError {
    pub fn resource_exhausted(reason: impl Into<String>) -> Self {
        Self::ResourceExhausted {
            reason: reason.into(),
        }
    }

    pub fn production(cause: anyhow::Error) -> Self {
        Self::ProductionFailed { cause }
    }

    pub fn disposal(cause: anyhow::Error) -> Self {
        Self::DisposalFailed { cause }
    }

    /// Error replayed by production calls on a session that already faulted.
    pub fn already_faulted() -> Self {
        Self::ProductionFailed {
            cause: anyhow::anyhow!("session previously faulted"),
        }
    }
}
