//! Incremental decoding of strings compressed with the static Huffman
//! table of RFC 7541 Appendix B.
//!
//! Incremental means `decode` does not need the whole string at once: it
//! accepts fragments as they arrive, holding any bits that do not yet
//! form a complete code in a bit buffer between calls.

use std::collections::HashMap;

use lazy_static::lazy_static;

const MIN_CODE_LENGTH: usize = 5;
const MAX_CODE_LENGTH: usize = 30;

/// The end-of-string symbol. Its code is thirty one-bits; it must never be
/// explicitly encoded, only its prefix may pad out the final byte.
const EOS_SYMBOL: u16 = 256;

/// Holds the leading edge of bits to be decoded; the high-order bit of the
/// accumulator is the next bit. A 64-bit accumulator has room for the
/// longest code plus a whole byte, so refilling never has to juggle
/// partial bytes.
#[derive(Debug, Default)]
pub struct HuffmanBitBuffer {
    accumulator: u64,
    count: usize,
}

impl HuffmanBitBuffer {
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.count = 0;
    }

    /// Appends as many whole bytes from `input` as fit, returning how many
    /// were taken.
    pub fn append_bytes(&mut self, input: &[u8]) -> usize {
        let mut appended = 0;
        while self.free_count() >= 8 && appended < input.len() {
            let byte = input[appended] as u64;
            self.accumulator |= byte << (64 - 8 - self.count);
            self.count += 8;
            appended += 1;
        }
        appended
    }

    pub fn value(&self) -> u64 {
        self.accumulator
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn free_count(&self) -> usize {
        64 - self.count
    }

    /// Drops the leading `code_length` bits, i.e. the code just decoded.
    pub fn consume_bits(&mut self, code_length: usize) {
        debug_assert!(code_length <= self.count);
        self.accumulator <<= code_length;
        self.count -= code_length;
    }

    /// Valid at the end of an encoded string? At most 7 bits may remain
    /// and every one of them must be 1 (the prefix of EOS).
    pub fn input_properly_terminated(&self) -> bool {
        if self.count > 7 {
            return false;
        }
        if self.count == 0 {
            return true;
        }
        let expected = !0u64 << (64 - self.count);
        self.accumulator & expected == expected
    }
}

#[derive(Debug, Default)]
pub struct HuffmanDecoder {
    bit_buffer: HuffmanBitBuffer,
}

impl HuffmanDecoder {
    pub fn new() -> HuffmanDecoder {
        HuffmanDecoder::default()
    }

    /// Prepare for a new string.
    pub fn reset(&mut self) {
        self.bit_buffer.reset();
    }

    /// Decodes the portion of a Huffman coded string in `input`, appending
    /// the decoded octets to `output`. Returns false if the coding is
    /// invalid (the EOS symbol appears); otherwise true, with any
    /// incomplete trailing code buffered for the next call. After the last
    /// fragment, check `input_properly_terminated`.
    pub fn decode(&mut self, mut input: &[u8], output: &mut Vec<u8>) -> bool {
        loop {
            let appended = self.bit_buffer.append_bytes(input);
            input = &input[appended..];
            match self.next_symbol() {
                Some((symbol, code_length)) => {
                    if symbol == EOS_SYMBOL {
                        log::debug!("EOS explicitly encoded in huffman string");
                        return false;
                    }
                    output.push(symbol as u8);
                    self.bit_buffer.consume_bits(code_length);
                }
                None => {
                    if input.is_empty() {
                        return true;
                    }
                    // More bits get appended on the next pass.
                }
            }
        }
    }

    pub fn input_properly_terminated(&self) -> bool {
        self.bit_buffer.input_properly_terminated()
    }

    /// Looks for a whole code in the leading bits. The table is keyed by
    /// (code, length) and HPACK codes are prefix free, so probing each
    /// length from shortest to longest finds the unique match.
    fn next_symbol(&self) -> Option<(u16, usize)> {
        let limit = MAX_CODE_LENGTH.min(self.bit_buffer.count());
        for len in MIN_CODE_LENGTH..=limit {
            let code = (self.bit_buffer.value() >> (64 - len)) as u32;
            if let Some(&symbol) = HUFFMAN_CODE_MAP.get(&(code, len as u8)) {
                return Some((symbol, len));
            }
        }
        None
    }
}

/// Huffman-encodes `src` onto the end of `dst`, padding the final byte
/// with the EOS prefix. Used for building test inputs; decoding never
/// calls this.
pub fn huffman_encode(src: &[u8], dst: &mut Vec<u8>) {
    let mut current: u64 = 0;
    let mut bits: u32 = 0;
    for &byte in src {
        let (code, code_length) = HUFFMAN_CODE_ARRAY[byte as usize];
        current = (current << code_length) | code as u64;
        bits += code_length as u32;
        while bits >= 8 {
            bits -= 8;
            dst.push((current >> bits) as u8);
        }
    }
    if bits > 0 {
        let pad = 8 - bits;
        dst.push(((current << pad) as u8) | ((1u16 << pad) - 1) as u8);
    }
}

/// The exact number of bytes `huffman_encode` will produce for `src`.
pub fn huffman_encoded_size(src: &[u8]) -> usize {
    let bits: usize = src
        .iter()
        .map(|&byte| HUFFMAN_CODE_ARRAY[byte as usize].1 as usize)
        .sum();
    (bits + 7) / 8
}

// The (code, bit length) for each of the 256 octets followed by EOS, in
// symbol order; see RFC 7541 Appendix B for the characters behind them.
static HUFFMAN_CODE_ARRAY: &'static [(u32, u8)] = &[
    (0x1ff8, 13),
    (0x7fffd8, 23),
    (0xfffffe2, 28),
    (0xfffffe3, 28),
    (0xfffffe4, 28),
    (0xfffffe5, 28),
    (0xfffffe6, 28),
    (0xfffffe7, 28),
    (0xfffffe8, 28),
    (0xffffea, 24),
    (0x3ffffffc, 30),
    (0xfffffe9, 28),
    (0xfffffea, 28),
    (0x3ffffffd, 30),
    (0xfffffeb, 28),
    (0xfffffec, 28),
    (0xfffffed, 28),
    (0xfffffee, 28),
    (0xfffffef, 28),
    (0xffffff0, 28),
    (0xffffff1, 28),
    (0xffffff2, 28),
    (0x3ffffffe, 30),
    (0xffffff3, 28),
    (0xffffff4, 28),
    (0xffffff5, 28),
    (0xffffff6, 28),
    (0xffffff7, 28),
    (0xffffff8, 28),
    (0xffffff9, 28),
    (0xffffffa, 28),
    (0xffffffb, 28),
    (0x14, 6),
    (0x3f8, 10),
    (0x3f9, 10),
    (0xffa, 12),
    (0x1ff9, 13),
    (0x15, 6),
    (0xf8, 8),
    (0x7fa, 11),
    (0x3fa, 10),
    (0x3fb, 10),
    (0xf9, 8),
    (0x7fb, 11),
    (0xfa, 8),
    (0x16, 6),
    (0x17, 6),
    (0x18, 6),
    (0x0, 5), //b'0'
    (0x1, 5),
    (0x2, 5),
    (0x19, 6),
    (0x1a, 6),
    (0x1b, 6),
    (0x1c, 6),
    (0x1d, 6),
    (0x1e, 6),
    (0x1f, 6),
    (0x5c, 7),
    (0xfb, 8),
    (0x7ffc, 15),
    (0x20, 6),
    (0xffb, 12),
    (0x3fc, 10),
    (0x1ffa, 13),
    (0x21, 6), //b'A'
    (0x5d, 7), //b'B'
    (0x5e, 7), //b'C'
    (0x5f, 7), //b'D'
    (0x60, 7), //b'E'
    (0x61, 7),
    (0x62, 7),
    (0x63, 7),
    (0x64, 7),
    (0x65, 7),
    (0x66, 7),
    (0x67, 7),
    (0x68, 7), //b'M'
    (0x69, 7),
    (0x6a, 7),
    (0x6b, 7),
    (0x6c, 7),
    (0x6d, 7),
    (0x6e, 7),
    (0x6f, 7),
    (0x70, 7),
    (0x71, 7),
    (0x72, 7),
    (0xfc, 8),
    (0x73, 7),
    (0xfd, 8), //b'Z'
    (0x1ffb, 13),
    (0x7fff0, 19),
    (0x1ffc, 13),
    (0x3ffc, 14),
    (0x22, 6),
    (0x7ffd, 15),
    (0x3, 5),  //'a'
    (0x23, 6),
    (0x4, 5),
    (0x24, 6),
    (0x5, 5),
    (0x25, 6),
    (0x26, 6),
    (0x27, 6),
    (0x6, 5),
    (0x74, 7), //b'j',
    (0x75, 7),
    (0x28, 6),
    (0x29, 6),
    (0x2a, 6),
    (0x7, 5),
    (0x2b, 6),
    (0x76, 7),
    (0x2c, 6),
    (0x8, 5),
    (0x9, 5),
    (0x2d, 6),
    (0x77, 7),
    (0x78, 7),
    (0x79, 7),
    (0x7a, 7),
    (0x7b, 7), //b'z'
    (0x7ffe, 15),
    (0x7fc, 11),
    (0x3ffd, 14),
    (0x1ffd, 13),
    (0xffffffc, 28),
    (0xfffe6, 20),
    (0x3fffd2, 22),
    (0xfffe7, 20),
    (0xfffe8, 20),
    (0x3fffd3, 22),
    (0x3fffd4, 22),
    (0x3fffd5, 22),
    (0x7fffd9, 23),
    (0x3fffd6, 22),
    (0x7fffda, 23),
    (0x7fffdb, 23),
    (0x7fffdc, 23),
    (0x7fffdd, 23),
    (0x7fffde, 23),
    (0xffffeb, 24),
    (0x7fffdf, 23),
    (0xffffec, 24),
    (0xffffed, 24),
    (0x3fffd7, 22),
    (0x7fffe0, 23),
    (0xffffee, 24),
    (0x7fffe1, 23),
    (0x7fffe2, 23),
    (0x7fffe3, 23),
    (0x7fffe4, 23),
    (0x1fffdc, 21),
    (0x3fffd8, 22),
    (0x7fffe5, 23),
    (0x3fffd9, 22),
    (0x7fffe6, 23),
    (0x7fffe7, 23),
    (0xffffef, 24),
    (0x3fffda, 22),
    (0x1fffdd, 21),
    (0xfffe9, 20),
    (0x3fffdb, 22),
    (0x3fffdc, 22),
    (0x7fffe8, 23),
    (0x7fffe9, 23),
    (0x1fffde, 21),
    (0x7fffea, 23),
    (0x3fffdd, 22),
    (0x3fffde, 22),
    (0xfffff0, 24),
    (0x1fffdf, 21),
    (0x3fffdf, 22),
    (0x7fffeb, 23),
    (0x7fffec, 23),
    (0x1fffe0, 21),
    (0x1fffe1, 21),
    (0x3fffe0, 22),
    (0x1fffe2, 21),
    (0x7fffed, 23),
    (0x3fffe1, 22),
    (0x7fffee, 23),
    (0x7fffef, 23),
    (0xfffea, 20),
    (0x3fffe2, 22),
    (0x3fffe3, 22),
    (0x3fffe4, 22),
    (0x7ffff0, 23),
    (0x3fffe5, 22),
    (0x3fffe6, 22),
    (0x7ffff1, 23),
    (0x3ffffe0, 26),
    (0x3ffffe1, 26),
    (0xfffeb, 20),
    (0x7fff1, 19),
    (0x3fffe7, 22),
    (0x7ffff2, 23),
    (0x3fffe8, 22),
    (0x1ffffec, 25),
    (0x3ffffe2, 26),
    (0x3ffffe3, 26),
    (0x3ffffe4, 26),
    (0x7ffffde, 27),
    (0x7ffffdf, 27),
    (0x3ffffe5, 26),
    (0xfffff1, 24),
    (0x1ffffed, 25),
    (0x7fff2, 19),
    (0x1fffe3, 21),
    (0x3ffffe6, 26),
    (0x7ffffe0, 27),
    (0x7ffffe1, 27),
    (0x3ffffe7, 26),
    (0x7ffffe2, 27),
    (0xfffff2, 24),
    (0x1fffe4, 21),
    (0x1fffe5, 21),
    (0x3ffffe8, 26),
    (0x3ffffe9, 26),
    (0xffffffd, 28),
    (0x7ffffe3, 27),
    (0x7ffffe4, 27),
    (0x7ffffe5, 27),
    (0xfffec, 20),
    (0xfffff3, 24),
    (0xfffed, 20),
    (0x1fffe6, 21),
    (0x3fffe9, 22),
    (0x1fffe7, 21),
    (0x1fffe8, 21),
    (0x7ffff3, 23),
    (0x3fffea, 22),
    (0x3fffeb, 22),
    (0x1ffffee, 25),
    (0x1ffffef, 25),
    (0xfffff4, 24),
    (0xfffff5, 24),
    (0x3ffffea, 26),
    (0x7ffff4, 23),
    (0x3ffffeb, 26),
    (0x7ffffe6, 27),
    (0x3ffffec, 26),
    (0x3ffffed, 26),
    (0x7ffffe7, 27),
    (0x7ffffe8, 27),
    (0x7ffffe9, 27),
    (0x7ffffea, 27),
    (0x7ffffeb, 27),
    (0xffffffe, 28),
    (0x7ffffec, 27),
    (0x7ffffed, 27),
    (0x7ffffee, 27),
    (0x7ffffef, 27),
    (0x7fffff0, 27),
    (0x3ffffee, 26),
    (0x3fffffff, 30),
];

lazy_static! {
    static ref HUFFMAN_CODE_MAP: HashMap<(u32, u8), u16> = {
        let mut m = HashMap::<(u32, u8), u16>::new();
        for (symbol, &(code, code_len)) in HUFFMAN_CODE_ARRAY.iter().enumerate() {
            m.insert((code, code_len), symbol as u16);
        }
        m
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_www_example_com() {
        // RFC 7541 C.4.1, the Huffman coded authority value.
        let input = [
            0xf1, 0xe3, 0xc2, 0xe5, 0xf2, 0x3a, 0x6b, 0xa0, 0xab, 0x90, 0xf4, 0xff,
        ];
        let mut decoder = HuffmanDecoder::new();
        let mut output = Vec::new();
        assert!(decoder.decode(&input, &mut output));
        assert!(decoder.input_properly_terminated());
        assert_eq!(output, b"www.example.com");
    }

    #[test]
    fn test_decode_across_fragments() {
        let input = [
            0xf1, 0xe3, 0xc2, 0xe5, 0xf2, 0x3a, 0x6b, 0xa0, 0xab, 0x90, 0xf4, 0xff,
        ];
        for split in 0..=input.len() {
            let mut decoder = HuffmanDecoder::new();
            let mut output = Vec::new();
            assert!(decoder.decode(&input[..split], &mut output));
            assert!(decoder.decode(&input[split..], &mut output));
            assert!(decoder.input_properly_terminated());
            assert_eq!(output, b"www.example.com");
        }
    }

    #[test]
    fn test_round_trip() {
        let samples: &[&[u8]] = &[
            b"",
            b"a",
            b"no-cache",
            b"Mon, 21 Oct 2013 20:13:21 GMT",
            b"\x00\x01\xfe\xff odd bytes \x80",
        ];
        for sample in samples {
            let mut encoded = Vec::new();
            huffman_encode(sample, &mut encoded);
            assert_eq!(encoded.len(), huffman_encoded_size(sample));
            let mut decoder = HuffmanDecoder::new();
            let mut output = Vec::new();
            assert!(decoder.decode(&encoded, &mut output));
            assert!(decoder.input_properly_terminated());
            assert_eq!(&output, sample);
        }
    }

    #[test]
    fn test_bad_termination() {
        // A whole byte of padding can't be valid.
        let mut encoded = Vec::new();
        huffman_encode(b"0", &mut encoded);
        encoded.push(0xff);
        let mut decoder = HuffmanDecoder::new();
        let mut output = Vec::new();
        assert!(decoder.decode(&encoded, &mut output));
        assert!(!decoder.input_properly_terminated());
    }

    #[test]
    fn test_padding_with_zero_bits_rejected() {
        // '0' is code 00000 (5 bits); pad the rest of the byte with zeros
        // instead of the EOS prefix.
        let encoded = [0x00u8];
        let mut decoder = HuffmanDecoder::new();
        let mut output = Vec::new();
        assert!(decoder.decode(&encoded, &mut output));
        assert_eq!(output, b"0");
        assert!(!decoder.input_properly_terminated());
    }

    #[test]
    fn test_explicit_eos_rejected() {
        // EOS (30 one-bits) followed by two more set bits.
        let encoded = [0xff, 0xff, 0xff, 0xff];
        let mut decoder = HuffmanDecoder::new();
        let mut output = Vec::new();
        assert!(!decoder.decode(&encoded, &mut output));
    }
}
