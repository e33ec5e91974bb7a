use crate::buffer::DecodeBuffer;
use crate::DecodeStatus;

use super::block_decoder::HpackBlockDecoder;
use super::entry_decoder::HpackEntryListener;
use super::entry_type::HpackEntryType;
use super::error::HpackError;
use super::state::{HpackDecoderState, HpackListener};
use super::whole_entry::HpackWholeEntryBuffer;

/// Glues the entry decoder's piecewise callbacks to the whole-entry
/// buffer and on into the decoder state, all borrowed for the duration of
/// one decode call.
struct EntrySink<'a, L: HpackListener> {
    buffer: &'a mut HpackWholeEntryBuffer,
    state: &'a mut HpackDecoderState,
    listener: &'a mut L,
}

impl<'a, L: HpackListener> HpackEntryListener for EntrySink<'a, L> {
    fn on_indexed_header(&mut self, index: u32) {
        self.buffer.on_indexed_header(index, self.state, self.listener);
    }

    fn on_start_literal_header(&mut self, entry_type: HpackEntryType, maybe_name_index: u32) {
        self.buffer.on_start_literal_header(entry_type, maybe_name_index);
    }

    fn on_name_start(&mut self, huffman_encoded: bool, len: usize) {
        self.buffer
            .on_name_start(huffman_encoded, len, self.state, self.listener);
    }

    fn on_name_data(&mut self, data: &[u8]) {
        self.buffer.on_name_data(data, self.state, self.listener);
    }

    fn on_name_end(&mut self) {
        self.buffer.on_name_end(self.state, self.listener);
    }

    fn on_value_start(&mut self, huffman_encoded: bool, len: usize) {
        self.buffer
            .on_value_start(huffman_encoded, len, self.state, self.listener);
    }

    fn on_value_data(&mut self, data: &[u8]) {
        self.buffer.on_value_data(data, self.state, self.listener);
    }

    fn on_value_end(&mut self) {
        self.buffer.on_value_end(self.state, self.listener);
    }

    fn on_dynamic_table_size_update(&mut self, size: u32) {
        self.buffer
            .on_dynamic_table_size_update(size, self.state, self.listener);
    }
}

/// The assembled HPACK decoder: block decoding, whole-entry assembly, and
/// the table state, behind the three-call surface a session drives it
/// with (`start_decoding_block` / `decode_fragment` / `end_decoding_block`).
///
/// Errors latch: after the first one every call returns false without
/// touching the listener again.
#[derive(Debug)]
pub struct HpackDecoder {
    decoder_state: HpackDecoderState,
    entry_buffer: HpackWholeEntryBuffer,
    block_decoder: HpackBlockDecoder,
    error: Option<HpackError>,
}

impl Default for HpackDecoder {
    fn default() -> Self {
        HpackDecoder::new(super::DEFAULT_MAX_DECODE_BUFFER_SIZE)
    }
}

impl HpackDecoder {
    /// `max_string_size` bounds each name and value, on the wire and
    /// decoded; see RFC 7541 sections 5.1 and 5.2 on why a bound is
    /// needed at all.
    pub fn new(max_string_size: usize) -> HpackDecoder {
        HpackDecoder {
            decoder_state: HpackDecoderState::new(),
            entry_buffer: HpackWholeEntryBuffer::new(max_string_size),
            block_decoder: HpackBlockDecoder::default(),
            error: None,
        }
    }

    pub fn set_max_string_size(&mut self, max_string_size: usize) {
        self.entry_buffer.set_max_string_size(max_string_size);
    }

    /// See [`HpackDecoderState::apply_header_table_size_setting`].
    pub fn apply_header_table_size_setting(&mut self, limit: u32) {
        self.decoder_state.apply_header_table_size_setting(limit);
    }

    pub fn header_table_size_setting(&self) -> u32 {
        self.decoder_state.header_table_size_setting()
    }

    /// See [`HpackDecoderState::set_header_table_size`].
    pub fn set_header_table_size(&mut self, limit: u32) {
        self.decoder_state.set_header_table_size(limit);
    }

    pub fn dynamic_table_size(&self) -> usize {
        self.decoder_state.dynamic_table_size()
    }

    pub fn error(&self) -> Option<HpackError> {
        self.error
    }

    /// Prepares for a new HPACK block and announces it to the listener.
    /// Returns false if an earlier block left a latched error.
    pub fn start_decoding_block<L: HpackListener>(&mut self, listener: &mut L) -> bool {
        if self.detect_error() {
            return false;
        }
        self.block_decoder.reset();
        self.decoder_state.on_header_block_start(listener);
        true
    }

    /// Decodes one fragment (some or all of the rest) of the current
    /// block, reporting every entry it completes. Returns false if an
    /// error was detected, now or earlier.
    pub fn decode_fragment<L: HpackListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> bool {
        if self.detect_error() {
            return false;
        }
        let status = {
            let mut sink = EntrySink {
                buffer: &mut self.entry_buffer,
                state: &mut self.decoder_state,
                listener: &mut *listener,
            };
            self.block_decoder.decode(buf, &mut sink)
        };
        if status == DecodeStatus::Error {
            // A varint overflowed; everything else surfaces through the
            // decoder state.
            let error = self.block_decoder.error().unwrap_or(HpackError::IndexVarint);
            self.report_error(error, listener);
            return false;
        }
        if self.detect_error() {
            return false;
        }
        debug_assert_eq!(status == DecodeStatus::Done, self.block_decoder.before_entry());
        true
    }

    /// Ends the current block, checking it didn't stop mid-entry, and
    /// announces the end of the header list.
    pub fn end_decoding_block<L: HpackListener>(&mut self, listener: &mut L) -> bool {
        if self.detect_error() {
            return false;
        }
        if !self.block_decoder.before_entry() {
            self.report_error(HpackError::TruncatedBlock, listener);
            return false;
        }
        self.decoder_state.on_header_block_end(listener);
        !self.detect_error()
    }

    /// Reports `error` through the listener unless one is already
    /// latched. Also used by the adapter for its size budget errors.
    pub(super) fn report_error<L: HpackListener>(&mut self, error: HpackError, listener: &mut L) {
        if self.error.is_none() && self.decoder_state.error().is_none() {
            self.error = Some(error);
            listener.on_header_error_detected(error);
        } else {
            self.detect_error();
        }
    }

    /// Pulls up any error the decoder state latched (those are reported
    /// to the listener at the point of detection).
    fn detect_error(&mut self) -> bool {
        if self.error.is_none() {
            self.error = self.decoder_state.error();
        }
        self.error.is_some()
    }
}
