use crate::buffer::DecodeBuffer;
use crate::DecodeStatus;

use super::entry_decoder::{HpackEntryDecoder, HpackEntryListener};
use super::error::HpackError;

/// Drives the entry decoder over the bytes of an HPACK block fragment,
/// entry after entry. When `decode` returns `InProgress` the buffer has
/// been fully consumed and an entry is suspended mid-way; the next
/// fragment resumes it.
#[derive(Debug)]
pub struct HpackBlockDecoder {
    entry_decoder: HpackEntryDecoder,
    /// True when the next byte (if any) is the first byte of an entry.
    before_entry: bool,
}

impl Default for HpackBlockDecoder {
    fn default() -> Self {
        HpackBlockDecoder {
            entry_decoder: HpackEntryDecoder::default(),
            before_entry: true,
        }
    }
}

impl HpackBlockDecoder {
    /// Call at the start of each HPACK block.
    pub fn reset(&mut self) {
        self.before_entry = true;
    }

    /// Positioned between entries, as opposed to suspended inside one?
    pub fn before_entry(&self) -> bool {
        self.before_entry
    }

    /// The varint error behind a `DecodeStatus::Error` return.
    pub fn error(&self) -> Option<HpackError> {
        self.entry_decoder.error()
    }

    pub fn decode<L: HpackEntryListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        if !self.before_entry {
            log::trace!("resume entry, remaining={}", buf.remaining());
            match self.entry_decoder.resume(buf, listener) {
                DecodeStatus::Done => self.before_entry = true,
                DecodeStatus::InProgress => {
                    debug_assert!(buf.is_empty());
                    return DecodeStatus::InProgress;
                }
                DecodeStatus::Error => return DecodeStatus::Error,
            }
        }
        debug_assert!(self.before_entry);
        while buf.has_data() {
            match self.entry_decoder.start(buf, listener) {
                DecodeStatus::Done => continue,
                DecodeStatus::InProgress => {
                    debug_assert!(buf.is_empty());
                    self.before_entry = false;
                    return DecodeStatus::InProgress;
                }
                DecodeStatus::Error => return DecodeStatus::Error,
            }
        }
        DecodeStatus::Done
    }
}
