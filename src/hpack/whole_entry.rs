use super::entry_type::HpackEntryType;
use super::error::HpackError;
use super::state::{HpackDecoderState, HpackListener};
use super::string_buffer::HpackStringBuffer;

/// Sits between the entry decoder and the decoder state, assembling the
/// pieces of literal names and values into whole strings and enforcing
/// the configured per-string size limit. Indexed entries and size updates
/// pass straight through.
///
/// After the first error nothing further is forwarded, so a state machine
/// finishing out its current entry cannot leak callbacks to the
/// application.
#[derive(Debug)]
pub struct HpackWholeEntryBuffer {
    name: HpackStringBuffer,
    value: HpackStringBuffer,
    max_string_size: usize,
    entry_type: HpackEntryType,
    /// Zero means the entry carries a literal name.
    maybe_name_index: u32,
    error_detected: bool,
}

impl HpackWholeEntryBuffer {
    pub fn new(max_string_size: usize) -> HpackWholeEntryBuffer {
        HpackWholeEntryBuffer {
            name: HpackStringBuffer::default(),
            value: HpackStringBuffer::default(),
            max_string_size,
            entry_type: HpackEntryType::IndexedHeader,
            maybe_name_index: 0,
            error_detected: false,
        }
    }

    /// Largest acceptable on-wire or decoded string, a defense against
    /// absurd header sizes.
    pub fn set_max_string_size(&mut self, max_string_size: usize) {
        self.max_string_size = max_string_size;
    }

    pub fn error_detected(&self) -> bool {
        self.error_detected
    }

    pub fn on_indexed_header<L: HpackListener>(
        &mut self,
        index: u32,
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        if self.error_detected {
            return;
        }
        state.on_indexed_header(index, listener);
    }

    pub fn on_start_literal_header(&mut self, entry_type: HpackEntryType, maybe_name_index: u32) {
        if self.error_detected {
            return;
        }
        self.entry_type = entry_type;
        self.maybe_name_index = maybe_name_index;
    }

    pub fn on_name_start<L: HpackListener>(
        &mut self,
        huffman_encoded: bool,
        len: usize,
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        if self.error_detected {
            return;
        }
        debug_assert_eq!(self.maybe_name_index, 0);
        if len > self.max_string_size {
            log::debug!("name length {} above limit {}", len, self.max_string_size);
            self.report_error(HpackError::NameTooLong, state, listener);
            return;
        }
        self.name.reset();
        self.name.on_start(huffman_encoded, len);
    }

    pub fn on_name_data<L: HpackListener>(
        &mut self,
        data: &[u8],
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        if self.error_detected {
            return;
        }
        if !self.name.on_data(data) {
            self.report_error(HpackError::NameHuffman, state, listener);
            return;
        }
        // A Huffman string can inflate past the limit its wire length met.
        if self.name.decoded_len() > self.max_string_size {
            self.report_error(HpackError::NameTooLong, state, listener);
        }
    }

    pub fn on_name_end<L: HpackListener>(
        &mut self,
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        if self.error_detected {
            return;
        }
        if !self.name.on_end() {
            self.report_error(HpackError::NameHuffman, state, listener);
        }
    }

    pub fn on_value_start<L: HpackListener>(
        &mut self,
        huffman_encoded: bool,
        len: usize,
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        if self.error_detected {
            return;
        }
        if len > self.max_string_size {
            log::debug!("value length {} above limit {}", len, self.max_string_size);
            self.report_error(HpackError::ValueTooLong, state, listener);
            return;
        }
        self.value.reset();
        self.value.on_start(huffman_encoded, len);
    }

    pub fn on_value_data<L: HpackListener>(
        &mut self,
        data: &[u8],
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        if self.error_detected {
            return;
        }
        if !self.value.on_data(data) {
            self.report_error(HpackError::ValueHuffman, state, listener);
            return;
        }
        if self.value.decoded_len() > self.max_string_size {
            self.report_error(HpackError::ValueTooLong, state, listener);
        }
    }

    /// A complete literal entry: resolve it through the decoder state.
    pub fn on_value_end<L: HpackListener>(
        &mut self,
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        if self.error_detected {
            return;
        }
        if !self.value.on_end() {
            self.report_error(HpackError::ValueHuffman, state, listener);
            return;
        }
        if self.maybe_name_index == 0 {
            state.on_literal_name_and_value(
                self.entry_type,
                &mut self.name,
                &mut self.value,
                listener,
            );
        } else {
            state.on_name_index_and_literal_value(
                self.entry_type,
                self.maybe_name_index,
                &mut self.value,
                listener,
            );
        }
    }

    pub fn on_dynamic_table_size_update<L: HpackListener>(
        &mut self,
        size: u32,
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        if self.error_detected {
            return;
        }
        state.on_dynamic_table_size_update(size, listener);
    }

    fn report_error<L: HpackListener>(
        &mut self,
        error: HpackError,
        state: &mut HpackDecoderState,
        listener: &mut L,
    ) {
        self.error_detected = true;
        state.report_error(error, listener);
    }
}
