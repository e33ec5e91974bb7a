use crate::buffer::DecodeBuffer;
use crate::DecodeStatus;

use super::varint::HpackVarintDecoder;

/// The five forms an HPACK entry can take, told apart by the high bits of
/// its first byte (RFC 7541 section 6).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HpackEntryType {
    /// `1xxxxxxx`: a reference into the static or dynamic table.
    #[default]
    IndexedHeader,
    /// `01xxxxxx`: literal to be inserted into the dynamic table.
    IndexedLiteralHeader,
    /// `0000xxxx`: literal, not inserted.
    UnindexedLiteralHeader,
    /// `0001xxxx`: literal, not inserted, and intermediaries must not
    /// index it either.
    NeverIndexedLiteralHeader,
    /// `001xxxxx`: changes the dynamic table size limit.
    DynamicTableSizeUpdate,
}

/// Reads the first byte of an entry, classifying it and starting the
/// varint that shares that byte (the index, or the new table size).
#[derive(Debug, Default)]
pub struct HpackEntryTypeDecoder {
    varint_decoder: HpackVarintDecoder,
    entry_type: HpackEntryType,
}

impl HpackEntryTypeDecoder {
    /// Requires a non-empty buffer.
    pub fn start(&mut self, buf: &mut DecodeBuffer<'_>) -> DecodeStatus {
        debug_assert!(buf.has_data());
        let byte = buf.decode_u8();
        if byte & 0x80 == 0x80 {
            self.entry_type = HpackEntryType::IndexedHeader;
            self.varint_decoder.start(byte, 7, buf)
        } else if byte & 0x40 == 0x40 {
            self.entry_type = HpackEntryType::IndexedLiteralHeader;
            self.varint_decoder.start(byte, 6, buf)
        } else if byte & 0x20 == 0x20 {
            self.entry_type = HpackEntryType::DynamicTableSizeUpdate;
            self.varint_decoder.start(byte, 5, buf)
        } else if byte & 0x10 == 0x10 {
            self.entry_type = HpackEntryType::NeverIndexedLiteralHeader;
            self.varint_decoder.start(byte, 4, buf)
        } else {
            self.entry_type = HpackEntryType::UnindexedLiteralHeader;
            self.varint_decoder.start(byte, 4, buf)
        }
    }

    pub fn resume(&mut self, buf: &mut DecodeBuffer<'_>) -> DecodeStatus {
        self.varint_decoder.resume(buf)
    }

    pub fn entry_type(&self) -> HpackEntryType {
        self.entry_type
    }

    /// The index (or size, for a table size update) that accompanied the
    /// entry type. Valid once decoding returned `Done`.
    pub fn varint(&self) -> u32 {
        self.varint_decoder.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(input: &[u8]) -> (HpackEntryType, u32) {
        let mut decoder = HpackEntryTypeDecoder::default();
        let mut buf = DecodeBuffer::new(input);
        assert_eq!(decoder.start(&mut buf), DecodeStatus::Done);
        (decoder.entry_type(), decoder.varint())
    }

    #[test]
    fn test_classification() {
        assert_eq!(classify(&[0x82]), (HpackEntryType::IndexedHeader, 2));
        assert_eq!(classify(&[0x41]), (HpackEntryType::IndexedLiteralHeader, 1));
        assert_eq!(classify(&[0x04]), (HpackEntryType::UnindexedLiteralHeader, 4));
        assert_eq!(
            classify(&[0x10]),
            (HpackEntryType::NeverIndexedLiteralHeader, 0)
        );
        assert_eq!(
            classify(&[0x3f, 0x9a, 0x0a]),
            (HpackEntryType::DynamicTableSizeUpdate, 1337)
        );
    }
}
