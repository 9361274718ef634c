#![deny(unreachable_pub)]

// Modules that make up the protocol surface.
pub mod error;
pub mod session;
pub mod simple;
pub mod state;

pub use error::Result;
pub use error::SequenceError;
pub use session::Polled;
pub use session::Sequence;
pub use session::Session;
pub use simple::DualModeAdapter;
pub use simple::SimpleAdapter;
pub use simple::SimpleSession;
pub use state::SessionState;
pub use state::StateCell;
