use h2parse::hpack::{HpackBlockBuilder, HpackEntryType, HpackVarintDecoder};
use h2parse::{DecodeBuffer, DecodeStatus, HeaderHandler, HpackDecoderAdapter, HpackError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    BlockStart,
    Header(Vec<u8>, Vec<u8>),
    BlockEnd(usize, usize),
    Error(HpackError),
}

fn header(name: &str, value: &str) -> Event {
    Event::Header(name.as_bytes().to_vec(), value.as_bytes().to_vec())
}

#[derive(Default)]
struct Collector {
    events: Vec<Event>,
}

impl HeaderHandler for Collector {
    fn on_header_block_start(&mut self) {
        self.events.push(Event::BlockStart);
    }

    fn on_header(&mut self, name: &[u8], value: &[u8]) {
        self.events
            .push(Event::Header(name.to_vec(), value.to_vec()));
    }

    fn on_header_block_end(&mut self, total_uncompressed: usize, total_compressed: usize) {
        self.events
            .push(Event::BlockEnd(total_uncompressed, total_compressed));
    }

    fn on_header_error(&mut self, error: HpackError) {
        self.events.push(Event::Error(error));
    }
}

fn decode_block(adapter: &mut HpackDecoderAdapter, block: &[u8]) -> Vec<Event> {
    let mut collector = Collector::default();
    assert!(adapter.decode_fragment(block, &mut collector));
    assert!(adapter.end_block(&mut collector));
    collector.events
}

fn hex(s: &str) -> Vec<u8> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .as_bytes()
        .chunks(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16).unwrap())
        .collect()
}

// RFC 7541 C.2.4: a single indexed header.
#[test]
fn test_indexed_header() {
    let mut adapter = HpackDecoderAdapter::new();
    let events = decode_block(&mut adapter, &[0x82]);
    assert_eq!(
        events,
        vec![
            Event::BlockStart,
            header(":method", "GET"),
            Event::BlockEnd(10, 1),
        ]
    );
    assert_eq!(adapter.dynamic_table_size(), 0);
}

// RFC 7541 C.2.2: literal value with an indexed name, without indexing.
#[test]
fn test_unindexed_literal_not_inserted() {
    let mut adapter = HpackDecoderAdapter::new();
    let block = hex("04 0c 2f73 616d 706c 652f 7061 7468");
    let events = decode_block(&mut adapter, &block);
    assert_eq!(
        events,
        vec![
            Event::BlockStart,
            header(":path", "/sample/path"),
            Event::BlockEnd(17, 14),
        ]
    );
    assert_eq!(adapter.dynamic_table_size(), 0);
}

// RFC 7541 C.4.1 (the :authority entry): Huffman coded value, inserted.
#[test]
fn test_huffman_value_inserted() {
    let mut adapter = HpackDecoderAdapter::new();
    let block = hex("418c f1e3 c2e5 f23a 6ba0 ab90 f4ff");
    let events = decode_block(&mut adapter, &block);
    assert_eq!(
        events,
        vec![
            Event::BlockStart,
            header(":authority", "www.example.com"),
            Event::BlockEnd(25, 14),
        ]
    );
    // 32 + len(":authority") + len("www.example.com")
    assert_eq!(adapter.dynamic_table_size(), 57);
}

// RFC 7541 C.5.1 then C.5.2: eviction under a 256 byte table.
#[test]
fn test_response_examples_with_eviction() {
    let mut adapter = HpackDecoderAdapter::new();
    adapter.set_header_table_size(256);

    let first = hex(
        "4803 3330 3258 0770 7269 7661 7465 611d \
         4d6f 6e2c 2032 3120 4f63 7420 3230 3133 \
         2032 303a 3133 3a32 3120 474d 546e 1768 \
         7474 7073 3a2f 2f77 7777 2e65 7861 6d70 \
         6c65 2e63 6f6d",
    );
    let events = decode_block(&mut adapter, &first);
    assert_eq!(
        events,
        vec![
            Event::BlockStart,
            header(":status", "302"),
            header("cache-control", "private"),
            header("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            header("location", "https://www.example.com"),
            Event::BlockEnd(10 + 20 + 33 + 31, first.len()),
        ]
    );
    assert_eq!(adapter.dynamic_table_size(), 222);

    // :status: 307 evicts :status: 302, everything else is indexed.
    let second = hex("4803 3330 37c1 c0bf");
    let events = decode_block(&mut adapter, &second);
    assert_eq!(
        events,
        vec![
            Event::BlockStart,
            header(":status", "307"),
            header("cache-control", "private"),
            header("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            header("location", "https://www.example.com"),
            Event::BlockEnd(10 + 20 + 33 + 31, second.len()),
        ]
    );
    assert_eq!(adapter.dynamic_table_size(), 222);

    // Probe the table order, newest first, through plain indexed entries.
    let probe = [0xbe, 0xbf, 0xc0, 0xc1];
    let events = decode_block(&mut adapter, &probe);
    assert_eq!(
        events,
        vec![
            Event::BlockStart,
            header(":status", "307"),
            header("location", "https://www.example.com"),
            header("date", "Mon, 21 Oct 2013 20:13:21 GMT"),
            header("cache-control", "private"),
            Event::BlockEnd(10 + 31 + 33 + 20, 4),
        ]
    );
}

// A size update entry with prefix 5 and extension bytes; value 1337.
#[test]
fn test_dynamic_table_size_update_entry() {
    let mut adapter = HpackDecoderAdapter::new();
    let events = decode_block(&mut adapter, &[0x3f, 0x9a, 0x0a]);
    assert_eq!(events, vec![Event::BlockStart, Event::BlockEnd(0, 3)]);
    assert!(adapter.error().is_none());
}

// A size update above the acknowledged setting is rejected without any
// header callbacks.
#[test]
fn test_size_update_above_acknowledged_setting() {
    let mut adapter = HpackDecoderAdapter::new();
    adapter.apply_header_table_size_setting(200);
    adapter.apply_header_table_size_setting(300);

    let mut builder = HpackBlockBuilder::new();
    builder.append_dynamic_table_size_update(400);
    builder.append_indexed_header(2);

    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(builder.buffer(), &mut collector));
    assert_eq!(
        collector.events,
        vec![
            Event::BlockStart,
            Event::Error(HpackError::DynamicTableSizeUpdateIsAboveAcknowledgedSetting),
        ]
    );
    assert_eq!(
        adapter.error(),
        Some(HpackError::DynamicTableSizeUpdateIsAboveAcknowledgedSetting)
    );
}

// The first update must honor the lowest acknowledged value, not just the
// final one.
#[test]
fn test_initial_size_update_above_low_water_mark() {
    let mut adapter = HpackDecoderAdapter::new();
    adapter.apply_header_table_size_setting(100);
    adapter.apply_header_table_size_setting(4096);

    let mut builder = HpackBlockBuilder::new();
    builder.append_dynamic_table_size_update(200);

    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(builder.buffer(), &mut collector));
    assert_eq!(
        collector.events,
        vec![
            Event::BlockStart,
            Event::Error(HpackError::InitialDynamicTableSizeUpdateIsAboveLowWaterMark),
        ]
    );
}

#[test]
fn test_missing_required_size_update() {
    let mut adapter = HpackDecoderAdapter::new();
    adapter.apply_header_table_size_setting(100);

    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(&[0x82], &mut collector));
    assert_eq!(
        collector.events,
        vec![
            Event::BlockStart,
            Event::Error(HpackError::MissingDynamicTableSizeUpdate),
        ]
    );
}

#[test]
fn test_shrink_then_grow_flow() {
    let mut adapter = HpackDecoderAdapter::new();
    adapter.apply_header_table_size_setting(100);
    adapter.apply_header_table_size_setting(4096);

    let mut builder = HpackBlockBuilder::new();
    builder.append_dynamic_table_size_update(50);
    builder.append_dynamic_table_size_update(4096);
    builder.append_indexed_header(2);
    let events = decode_block(&mut adapter, builder.buffer());
    assert_eq!(
        events,
        vec![
            Event::BlockStart,
            header(":method", "GET"),
            Event::BlockEnd(10, builder.len()),
        ]
    );

    // The next block needs no update.
    let events = decode_block(&mut adapter, &[0x82]);
    assert_eq!(
        events,
        vec![Event::BlockStart, header(":method", "GET"), Event::BlockEnd(10, 1)]
    );
}

#[test]
fn test_third_size_update_rejected() {
    let mut adapter = HpackDecoderAdapter::new();
    let mut builder = HpackBlockBuilder::new();
    builder.append_dynamic_table_size_update(100);
    builder.append_dynamic_table_size_update(200);
    builder.append_dynamic_table_size_update(300);

    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(builder.buffer(), &mut collector));
    assert_eq!(
        collector.events,
        vec![
            Event::BlockStart,
            Event::Error(HpackError::DynamicTableSizeUpdateNotAllowed),
        ]
    );
}

#[test]
fn test_size_update_after_header_rejected() {
    let mut adapter = HpackDecoderAdapter::new();
    let mut builder = HpackBlockBuilder::new();
    builder.append_indexed_header(2);
    builder.append_dynamic_table_size_update(100);

    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(builder.buffer(), &mut collector));
    assert_eq!(
        collector.events,
        vec![
            Event::BlockStart,
            header(":method", "GET"),
            Event::Error(HpackError::DynamicTableSizeUpdateNotAllowed),
        ]
    );
}

#[test]
fn test_invalid_indices() {
    // Index 0 is reserved.
    let mut adapter = HpackDecoderAdapter::new();
    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(&[0x80], &mut collector));
    assert_eq!(adapter.error(), Some(HpackError::InvalidIndex));

    // Beyond the static table with an empty dynamic table.
    let mut adapter = HpackDecoderAdapter::new();
    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(&[0xbe], &mut collector));
    assert_eq!(adapter.error(), Some(HpackError::InvalidIndex));

    // A literal value whose name index is out of range.
    let mut adapter = HpackDecoderAdapter::new();
    let mut builder = HpackBlockBuilder::new();
    builder.append_name_index_and_value(HpackEntryType::UnindexedLiteralHeader, 80, false, b"v");
    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(builder.buffer(), &mut collector));
    assert_eq!(adapter.error(), Some(HpackError::InvalidNameIndex));
}

#[test]
fn test_error_latches_across_calls() {
    let mut adapter = HpackDecoderAdapter::new();
    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(&[0x80], &mut collector));
    assert!(!adapter.end_block(&mut collector));
    assert!(!adapter.decode_fragment(&[0x82], &mut collector));
    // One error report, nothing after it.
    assert_eq!(
        collector.events,
        vec![Event::BlockStart, Event::Error(HpackError::InvalidIndex)]
    );
}

#[test]
fn test_truncated_block() {
    let mut adapter = HpackDecoderAdapter::new();
    let mut collector = Collector::default();
    // A literal entry cut off inside its name.
    assert!(adapter.decode_fragment(&[0x40, 0x0a, b'c'], &mut collector));
    assert!(!adapter.end_block(&mut collector));
    assert_eq!(
        collector.events,
        vec![Event::BlockStart, Event::Error(HpackError::TruncatedBlock)]
    );
}

#[test]
fn test_fragment_too_long() {
    let mut adapter = HpackDecoderAdapter::new();
    adapter.set_max_decode_buffer_size(8);
    let mut collector = Collector::default();
    let fragment = [0u8; 9];
    assert!(!adapter.decode_fragment(&fragment, &mut collector));
    assert_eq!(adapter.error(), Some(HpackError::FragmentTooLong));
}

#[test]
fn test_compressed_size_budget() {
    let mut adapter = HpackDecoderAdapter::new();
    adapter.set_max_header_block_size(6);
    let mut collector = Collector::default();
    assert!(adapter.decode_fragment(&[0x82, 0x86, 0x84], &mut collector));
    assert!(!adapter.decode_fragment(&[0x82, 0x86, 0x84, 0x82], &mut collector));
    assert_eq!(
        adapter.error(),
        Some(HpackError::CompressedHeaderSizeExceedsLimit)
    );
}

#[test]
fn test_name_and_value_size_limits() {
    let mut adapter = HpackDecoderAdapter::new();
    adapter.set_max_string_size(8);
    let mut builder = HpackBlockBuilder::new();
    builder.append_literal_name_and_value(
        HpackEntryType::UnindexedLiteralHeader,
        false,
        b"much-too-long-a-name",
        false,
        b"v",
    );
    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(builder.buffer(), &mut collector));
    assert_eq!(adapter.error(), Some(HpackError::NameTooLong));

    let mut adapter = HpackDecoderAdapter::new();
    adapter.set_max_string_size(8);
    let mut builder = HpackBlockBuilder::new();
    builder.append_name_index_and_value(
        HpackEntryType::UnindexedLiteralHeader,
        2,
        false,
        b"much-too-long-a-value",
    );
    let mut collector = Collector::default();
    assert!(!adapter.decode_fragment(builder.buffer(), &mut collector));
    assert_eq!(adapter.error(), Some(HpackError::ValueTooLong));
}

// Invariant: any split of a block into fragments produces the same events
// as decoding it whole.
#[test]
fn test_byte_conservation_across_fragmentation() {
    let mut builder = HpackBlockBuilder::new();
    builder.append_indexed_header(2);
    builder.append_literal_name_and_value(
        HpackEntryType::IndexedLiteralHeader,
        false,
        b"custom-key",
        true,
        b"custom-value with some length to it",
    );
    builder.append_name_index_and_value(
        HpackEntryType::NeverIndexedLiteralHeader,
        32,
        true,
        b"secret=value",
    );
    builder.append_indexed_header(62);
    let block = builder.buffer().to_vec();

    let mut reference = HpackDecoderAdapter::new();
    let expected = decode_block(&mut reference, &block);
    assert_eq!(expected.len(), 2 + 4);

    for chunk in [1usize, 2, 3, 5, 7, 11] {
        let mut adapter = HpackDecoderAdapter::new();
        let mut collector = Collector::default();
        for fragment in block.chunks(chunk) {
            assert!(adapter.decode_fragment(fragment, &mut collector));
        }
        assert!(adapter.end_block(&mut collector));
        assert_eq!(collector.events, expected, "chunk size {}", chunk);
    }
}

// Invariant: varint round trip for every supported prefix.
#[test]
fn test_varint_round_trip() {
    let interesting = [
        0u32,
        1,
        6,
        7,
        14,
        15,
        30,
        31,
        62,
        63,
        126,
        127,
        128,
        1337,
        16_383,
        16_384,
        (1 << 21) - 3,
        1 << 24,
    ];
    for prefix_length in 4u8..=7 {
        // The decoder's ceiling: the prefix plus four full extension
        // bytes.
        let max_value = ((1u32 << prefix_length) - 1) + ((1 << 28) - 1);
        for &value in interesting.iter().chain(std::iter::once(&max_value)) {
            let mut builder = HpackBlockBuilder::new();
            builder.append_varint(0x00, prefix_length, value);
            let bytes = builder.take();

            let mut decoder = HpackVarintDecoder::default();
            let mut buf = DecodeBuffer::new(&bytes);
            let first = buf.decode_u8();
            assert_eq!(
                decoder.start(first, prefix_length, &mut buf),
                DecodeStatus::Done,
                "prefix={} value={}",
                prefix_length,
                value
            );
            assert_eq!(decoder.value(), value);
            assert!(buf.is_empty(), "prefix={} value={}", prefix_length, value);
        }
    }
}

// Invariant: Huffman round trip on a deterministically scrambled buffer.
#[test]
fn test_huffman_round_trip_large() {
    use h2parse::hpack::huffman::{huffman_encode, HuffmanDecoder};

    let mut data = Vec::with_capacity(4096);
    let mut x: u32 = 0x2545_f491;
    for _ in 0..4096 {
        // xorshift keeps the sample reproducible.
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        data.push(x as u8);
    }
    let mut encoded = Vec::new();
    huffman_encode(&data, &mut encoded);
    let mut decoder = HuffmanDecoder::new();
    let mut decoded = Vec::new();
    assert!(decoder.decode(&encoded, &mut decoded));
    assert!(decoder.input_properly_terminated());
    assert_eq!(decoded, data);
}
