
#[macro_use] extern crate bitflags;

pub mod buffer;
pub mod frame;
pub mod hpack;

pub use buffer::{DecodeBuffer, DecodeBufferSubset};
pub use frame::{ErrorCode, Flag, FrameDecoder, FrameHeader, FrameListener, Kind, StreamIdentifier};
pub use hpack::{HeaderHandler, HpackDecoder, HpackDecoderAdapter, HpackError, HpackListener};

/// Outcome of feeding bytes to one of the incremental decoders.
///
/// Every decoder in this crate is resumable: when a buffer runs out in the
/// middle of a logical unit the decoder returns `InProgress`, keeps its
/// state, and expects to be called again with the next buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecodeStatus {
    /// The current logical unit has been fully decoded.
    Done,
    /// The buffer was exhausted before the unit completed.
    InProgress,
    /// The input is invalid; the failure has been reported to the listener.
    Error,
}

impl DecodeStatus {
    pub fn is_done(&self) -> bool {
        *self == DecodeStatus::Done
    }
}
