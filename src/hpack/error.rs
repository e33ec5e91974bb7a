use std::fmt;

/// Everything that can go wrong while decoding an HPACK block. Any of
/// these ends the current block; whether the connection survives is the
/// session's call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HpackError {
    /// An index varint ran past the implementation limit.
    IndexVarint,
    /// The varint carrying a name length ran past the limit.
    NameLengthVarint,
    /// The varint carrying a value length ran past the limit.
    ValueLengthVarint,
    /// A name literal is longer than the configured maximum.
    NameTooLong,
    /// A value literal is longer than the configured maximum.
    ValueTooLong,
    /// The Huffman coding of a name is invalid.
    NameHuffman,
    /// The Huffman coding of a value is invalid.
    ValueHuffman,
    /// The block had to begin with a dynamic table size update and didn't.
    MissingDynamicTableSizeUpdate,
    /// An indexed header referenced a nonexistent table entry.
    InvalidIndex,
    /// A literal entry's name index referenced a nonexistent table entry.
    InvalidNameIndex,
    /// A size update appeared after the start of the block, or a third one
    /// appeared.
    DynamicTableSizeUpdateNotAllowed,
    /// The first size update of the block is above the lowest
    /// acknowledged table size.
    InitialDynamicTableSizeUpdateIsAboveLowWaterMark,
    /// A size update is above the acknowledged SETTINGS_HEADER_TABLE_SIZE.
    DynamicTableSizeUpdateIsAboveAcknowledgedSetting,
    /// The block ended in the middle of an entry.
    TruncatedBlock,
    /// One fragment was larger than the configured decode buffer limit.
    FragmentTooLong,
    /// The block's compressed size ran past the configured budget.
    CompressedHeaderSizeExceedsLimit,
}

impl HpackError {
    #[inline]
    pub fn description_str(&self) -> &'static str {
        match *self {
            HpackError::IndexVarint => "index varint beyond implementation limit",
            HpackError::NameLengthVarint => "name length varint beyond implementation limit",
            HpackError::ValueLengthVarint => "value length varint beyond implementation limit",
            HpackError::NameTooLong => "name length exceeds buffer limit",
            HpackError::ValueTooLong => "value length exceeds buffer limit",
            HpackError::NameHuffman => "name huffman encoding error",
            HpackError::ValueHuffman => "value huffman encoding error",
            HpackError::MissingDynamicTableSizeUpdate => "missing dynamic table size update",
            HpackError::InvalidIndex => "invalid index in indexed header field representation",
            HpackError::InvalidNameIndex => "invalid index in literal header field representation",
            HpackError::DynamicTableSizeUpdateNotAllowed => "dynamic table size update not allowed",
            HpackError::InitialDynamicTableSizeUpdateIsAboveLowWaterMark => {
                "initial dynamic table size update is above low water mark"
            }
            HpackError::DynamicTableSizeUpdateIsAboveAcknowledgedSetting => {
                "dynamic table size update is above acknowledged setting"
            }
            HpackError::TruncatedBlock => "block ends in the middle of an instruction",
            HpackError::FragmentTooLong => "fragment exceeds decode buffer limit",
            HpackError::CompressedHeaderSizeExceedsLimit => {
                "compressed header size exceeds limit"
            }
        }
    }
}

impl fmt::Display for HpackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description_str())
    }
}
