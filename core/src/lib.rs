#![deny(unreachable_pub)]

pub mod combinators;
pub mod drive;
pub mod producers;
pub mod stream;

pub use combinators::zip::ZipSequence;
pub use combinators::zip::ZipSession;
pub use combinators::zip::zip;
pub use drive::drive;
pub use drive::drive_session;
pub use producers::channel::ChannelSequence;
pub use producers::channel::ChannelSession;
pub use producers::channel::SequenceSender;
pub use producers::channel::channel;
pub use producers::iter::IterSequence;
pub use producers::iter::IterSession;
pub use stream::into_stream;
