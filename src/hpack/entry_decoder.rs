use crate::buffer::DecodeBuffer;
use crate::DecodeStatus;

use super::entry_type::{HpackEntryType, HpackEntryTypeDecoder};
use super::error::HpackError;
use super::string_decoder::{HpackStringDecoder, HpackStringListener};

/// Receives the parts of HPACK entries as they are decoded: complete
/// indexed entries and size updates in one call, literal entries as a
/// start call followed by the name (if literal) and value strings in
/// pieces.
pub trait HpackEntryListener {
    fn on_indexed_header(&mut self, index: u32);

    /// `maybe_name_index` is zero when a literal name follows.
    fn on_start_literal_header(&mut self, entry_type: HpackEntryType, maybe_name_index: u32);

    fn on_name_start(&mut self, huffman_encoded: bool, len: usize);
    fn on_name_data(&mut self, data: &[u8]);
    fn on_name_end(&mut self);

    fn on_value_start(&mut self, huffman_encoded: bool, len: usize);
    fn on_value_data(&mut self, data: &[u8]);
    fn on_value_end(&mut self);

    fn on_dynamic_table_size_update(&mut self, size: u32);
}

/// Routes string decoder callbacks into the `on_name_*` side of an entry
/// listener.
struct NameSink<'a, L: HpackEntryListener>(&'a mut L);

impl<'a, L: HpackEntryListener> HpackStringListener for NameSink<'a, L> {
    fn on_string_start(&mut self, huffman_encoded: bool, len: usize) {
        self.0.on_name_start(huffman_encoded, len);
    }

    fn on_string_data(&mut self, data: &[u8]) {
        self.0.on_name_data(data);
    }

    fn on_string_end(&mut self) {
        self.0.on_name_end();
    }
}

/// Routes string decoder callbacks into the `on_value_*` side.
struct ValueSink<'a, L: HpackEntryListener>(&'a mut L);

impl<'a, L: HpackEntryListener> HpackStringListener for ValueSink<'a, L> {
    fn on_string_start(&mut self, huffman_encoded: bool, len: usize) {
        self.0.on_value_start(huffman_encoded, len);
    }

    fn on_string_data(&mut self, data: &[u8]) {
        self.0.on_value_data(data);
    }

    fn on_string_end(&mut self) {
        self.0.on_value_end();
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum EntryDecoderState {
    #[default]
    ResumeDecodingType,
    DecodedType,
    StartDecodingName,
    ResumeDecodingName,
    StartDecodingValue,
    ResumeDecodingValue,
}

/// Decodes one HPACK entry at a time, resumably. An entry is the type
/// byte and its varint, then, for the literal forms, a value string
/// preceded by a name string when the name index is zero.
#[derive(Debug, Default)]
pub struct HpackEntryDecoder {
    entry_type_decoder: HpackEntryTypeDecoder,
    string_decoder: HpackStringDecoder,
    state: EntryDecoderState,
    error: Option<HpackError>,
}

impl HpackEntryDecoder {
    /// Requires a non-empty buffer, positioned at the first byte of an
    /// entry.
    pub fn start<L: HpackEntryListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert!(buf.has_data());
        self.error = None;
        match self.entry_type_decoder.start(buf) {
            DecodeStatus::Done => {
                if self.entry_type_decoder.entry_type() == HpackEntryType::IndexedHeader {
                    // Nothing but the type and varint; much the most
                    // common entry in practice.
                    listener.on_indexed_header(self.entry_type_decoder.varint());
                    return DecodeStatus::Done;
                }
                self.state = EntryDecoderState::DecodedType;
                self.resume(buf, listener)
            }
            DecodeStatus::InProgress => {
                debug_assert!(buf.is_empty());
                self.state = EntryDecoderState::ResumeDecodingType;
                DecodeStatus::InProgress
            }
            DecodeStatus::Error => {
                self.error = Some(HpackError::IndexVarint);
                DecodeStatus::Error
            }
        }
    }

    pub fn resume<L: HpackEntryListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        loop {
            match self.state {
                EntryDecoderState::ResumeDecodingType => {
                    match self.entry_type_decoder.resume(buf) {
                        DecodeStatus::Done => self.state = EntryDecoderState::DecodedType,
                        DecodeStatus::InProgress => return DecodeStatus::InProgress,
                        DecodeStatus::Error => {
                            self.error = Some(HpackError::IndexVarint);
                            return DecodeStatus::Error;
                        }
                    }
                }
                EntryDecoderState::DecodedType => {
                    if self.dispatch_on_type(listener) {
                        return DecodeStatus::Done;
                    }
                }
                EntryDecoderState::StartDecodingName => {
                    let status = {
                        let mut sink = NameSink(&mut *listener);
                        self.string_decoder.start(buf, &mut sink)
                    };
                    match status {
                        DecodeStatus::Done => self.state = EntryDecoderState::StartDecodingValue,
                        DecodeStatus::InProgress => {
                            self.state = EntryDecoderState::ResumeDecodingName;
                            return DecodeStatus::InProgress;
                        }
                        DecodeStatus::Error => {
                            self.error = Some(HpackError::NameLengthVarint);
                            return DecodeStatus::Error;
                        }
                    }
                }
                EntryDecoderState::ResumeDecodingName => {
                    let status = {
                        let mut sink = NameSink(&mut *listener);
                        self.string_decoder.resume(buf, &mut sink)
                    };
                    match status {
                        DecodeStatus::Done => self.state = EntryDecoderState::StartDecodingValue,
                        DecodeStatus::InProgress => return DecodeStatus::InProgress,
                        DecodeStatus::Error => {
                            self.error = Some(HpackError::NameLengthVarint);
                            return DecodeStatus::Error;
                        }
                    }
                }
                EntryDecoderState::StartDecodingValue => {
                    let status = {
                        let mut sink = ValueSink(&mut *listener);
                        self.string_decoder.start(buf, &mut sink)
                    };
                    match status {
                        DecodeStatus::Done => return DecodeStatus::Done,
                        DecodeStatus::InProgress => {
                            self.state = EntryDecoderState::ResumeDecodingValue;
                            return DecodeStatus::InProgress;
                        }
                        DecodeStatus::Error => {
                            self.error = Some(HpackError::ValueLengthVarint);
                            return DecodeStatus::Error;
                        }
                    }
                }
                EntryDecoderState::ResumeDecodingValue => {
                    let status = {
                        let mut sink = ValueSink(&mut *listener);
                        self.string_decoder.resume(buf, &mut sink)
                    };
                    match status {
                        DecodeStatus::Done => return DecodeStatus::Done,
                        DecodeStatus::InProgress => return DecodeStatus::InProgress,
                        DecodeStatus::Error => {
                            self.error = Some(HpackError::ValueLengthVarint);
                            return DecodeStatus::Error;
                        }
                    }
                }
            }
        }
    }

    /// Which varint overflowed, when a decode returned `Error`.
    pub fn error(&self) -> Option<HpackError> {
        self.error
    }

    /// Acts on the decoded entry type; returns true if the entry is
    /// already complete.
    fn dispatch_on_type<L: HpackEntryListener>(&mut self, listener: &mut L) -> bool {
        let entry_type = self.entry_type_decoder.entry_type();
        let varint = self.entry_type_decoder.varint();
        match entry_type {
            HpackEntryType::IndexedHeader => {
                listener.on_indexed_header(varint);
                true
            }
            HpackEntryType::IndexedLiteralHeader
            | HpackEntryType::UnindexedLiteralHeader
            | HpackEntryType::NeverIndexedLiteralHeader => {
                listener.on_start_literal_header(entry_type, varint);
                self.state = if varint == 0 {
                    EntryDecoderState::StartDecodingName
                } else {
                    EntryDecoderState::StartDecodingValue
                };
                false
            }
            HpackEntryType::DynamicTableSizeUpdate => {
                listener.on_dynamic_table_size_update(varint);
                true
            }
        }
    }
}
