use crate::buffer::DecodeBuffer;
use crate::DecodeStatus;

/// Largest extension-byte shift; five extension bytes at seven bits each.
const MAX_OFFSET: u32 = 28;

/// Decodes the variable length unsigned integers of RFC 7541 section 5.1,
/// resumably. Call `start` with the byte holding the prefix, then `resume`
/// whenever it returned `InProgress`, then read `value`.
///
/// Up to 5 extension bytes are accepted, which accommodates naive encoders
/// that always emit full-length encodings of small numbers; the maximum
/// decodable value is 268,435,582 (2^28 + 127 - 1). Longer encodings, or a
/// fifth extension byte contributing beyond that range, are an error.
#[derive(Debug, Default)]
pub struct HpackVarintDecoder {
    value: u32,
    offset: u32,
}

impl HpackVarintDecoder {
    /// `prefix_value` is the byte containing the prefix; bits above
    /// `prefix_length` (3..=7) are ignored.
    pub fn start(
        &mut self,
        prefix_value: u8,
        prefix_length: u8,
        buf: &mut DecodeBuffer<'_>,
    ) -> DecodeStatus {
        debug_assert!((3..=7).contains(&prefix_length));
        let prefix_mask = (1u8 << prefix_length) - 1;
        self.value = (prefix_value & prefix_mask) as u32;
        if self.value < prefix_mask as u32 {
            return DecodeStatus::Done;
        }
        self.offset = 0;
        self.resume(buf)
    }

    /// For callers that already know the prefix bits were all ones.
    pub fn start_extended(&mut self, prefix_length: u8, buf: &mut DecodeBuffer<'_>) -> DecodeStatus {
        debug_assert!((3..=7).contains(&prefix_length));
        self.value = ((1u8 << prefix_length) - 1) as u32;
        self.offset = 0;
        self.resume(buf)
    }

    pub fn resume(&mut self, buf: &mut DecodeBuffer<'_>) -> DecodeStatus {
        loop {
            if buf.is_empty() {
                return DecodeStatus::InProgress;
            }
            let byte = buf.decode_u8();
            if self.offset == MAX_OFFSET && byte != 0 {
                break;
            }
            self.value += ((byte & 0x7f) as u32) << self.offset;
            if byte & 0x80 == 0 {
                return DecodeStatus::Done;
            }
            self.offset += 7;
            if self.offset > MAX_OFFSET {
                break;
            }
        }
        log::debug!(
            "varint encoding too long or too large: value={} offset={}",
            self.value,
            self.offset
        );
        DecodeStatus::Error
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Shortcut for the no-extension-byte case handled by the caller.
    pub fn set_value(&mut self, value: u32) {
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(prefix_value: u8, prefix_length: u8, rest: &[u8]) -> Result<u32, DecodeStatus> {
        let mut decoder = HpackVarintDecoder::default();
        let mut buf = DecodeBuffer::new(rest);
        match decoder.start(prefix_value, prefix_length, &mut buf) {
            DecodeStatus::Done => Ok(decoder.value()),
            other => Err(other),
        }
    }

    #[test]
    fn test_fits_in_prefix() {
        assert_eq!(decode(0x0a, 5, &[]), Ok(10));
        assert_eq!(decode(0xfa, 5, &[]), Ok(26));
        assert_eq!(decode(0x7e, 7, &[]), Ok(126));
    }

    #[test]
    fn test_extension_bytes() {
        // RFC 7541 C.1.2: 1337 with a 5-bit prefix.
        assert_eq!(decode(0x1f, 5, &[0x9a, 0x0a]), Ok(1337));
        // All-ones prefix plus zero extension.
        assert_eq!(decode(0x1f, 5, &[0x00]), Ok(31));
    }

    #[test]
    fn test_maximum_value() {
        // Four full extension bytes plus a terminating empty fifth; the
        // largest encoding a naive encoder can produce.
        let max = decode(0x7f, 7, &[0xff, 0xff, 0xff, 0xff, 0x00]);
        assert_eq!(max, Ok(127 + 127 * (1 + (1 << 7) + (1 << 14) + (1 << 21))));
    }

    #[test]
    fn test_too_long_is_error() {
        // Sixth extension byte required.
        assert_eq!(
            decode(0x1f, 5, &[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]),
            Err(DecodeStatus::Error)
        );
        // Fifth extension byte pushes beyond the range.
        assert_eq!(
            decode(0x1f, 5, &[0xff, 0xff, 0xff, 0xff, 0x10]),
            Err(DecodeStatus::Error)
        );
    }

    #[test]
    fn test_resumable_at_every_split() {
        let rest = [0x9a, 0x0a];
        for split in 0..=rest.len() {
            let mut decoder = HpackVarintDecoder::default();
            let mut first = DecodeBuffer::new(&rest[..split]);
            let status = decoder.start(0x1f, 5, &mut first);
            if split == rest.len() {
                assert_eq!(status, DecodeStatus::Done);
            } else {
                assert_eq!(status, DecodeStatus::InProgress);
                let mut second = DecodeBuffer::new(&rest[split..]);
                assert_eq!(decoder.resume(&mut second), DecodeStatus::Done);
            }
            assert_eq!(decoder.value(), 1337);
        }
    }
}
