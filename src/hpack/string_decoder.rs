use crate::buffer::DecodeBuffer;
use crate::DecodeStatus;

use super::varint::HpackVarintDecoder;

/// Receives the pieces of one HPACK string literal: the header (Huffman
/// bit and on-wire length), the bytes as they arrive, and the end.
pub trait HpackStringListener {
    fn on_string_start(&mut self, huffman_encoded: bool, len: usize);
    fn on_string_data(&mut self, data: &[u8]);
    fn on_string_end(&mut self);
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum StringDecoderState {
    #[default]
    StartDecodingLength,
    DecodingString,
    ResumeDecodingLength,
}

/// Decodes a string literal: the high bit of the first byte is the H
/// (Huffman) bit, the rest starts a 7-bit-prefix varint length, then that
/// many bytes of string follow. Identifying is all this does; Huffman
/// decompression is the listener's business.
///
/// Call `start` at the first byte; while it returns `InProgress` call
/// `resume` with more input.
#[derive(Debug, Default)]
pub struct HpackStringDecoder {
    length_decoder: HpackVarintDecoder,
    remaining: usize,
    state: StringDecoderState,
    huffman_encoded: bool,
}

impl HpackStringDecoder {
    pub fn start<S: HpackStringListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        cb: &mut S,
    ) -> DecodeStatus {
        // Fast path: a one-byte length whose string is wholly in the
        // buffer; most strings on real connections are like this, and
        // nothing needs to be saved in the decoder.
        if let Some(first) = buf.peek() {
            if first & 0x7f != 0x7f {
                let h_and_prefix = buf.decode_u8();
                let length = (h_and_prefix & 0x7f) as usize;
                let huffman_encoded = h_and_prefix & 0x80 == 0x80;
                cb.on_string_start(huffman_encoded, length);
                if length <= buf.remaining() {
                    if length > 0 {
                        cb.on_string_data(&buf.chunk()[..length]);
                        buf.advance(length);
                    }
                    cb.on_string_end();
                    return DecodeStatus::Done;
                }
                self.huffman_encoded = huffman_encoded;
                self.remaining = length;
                self.state = StringDecoderState::DecodingString;
                return self.resume(buf, cb);
            }
        }
        self.state = StringDecoderState::StartDecodingLength;
        self.resume(buf, cb)
    }

    pub fn resume<S: HpackStringListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        cb: &mut S,
    ) -> DecodeStatus {
        loop {
            match self.state {
                StringDecoderState::StartDecodingLength => {
                    if buf.is_empty() {
                        return DecodeStatus::InProgress;
                    }
                    let h_and_prefix = buf.decode_u8();
                    self.huffman_encoded = h_and_prefix & 0x80 == 0x80;
                    match self.length_decoder.start(h_and_prefix, 7, buf) {
                        DecodeStatus::Done => {
                            self.on_length_done(cb);
                            self.state = StringDecoderState::DecodingString;
                        }
                        DecodeStatus::InProgress => {
                            self.state = StringDecoderState::ResumeDecodingLength;
                            return DecodeStatus::InProgress;
                        }
                        DecodeStatus::Error => return DecodeStatus::Error,
                    }
                }
                StringDecoderState::ResumeDecodingLength => {
                    match self.length_decoder.resume(buf) {
                        DecodeStatus::Done => {
                            self.on_length_done(cb);
                            self.state = StringDecoderState::DecodingString;
                        }
                        other => return other,
                    }
                }
                StringDecoderState::DecodingString => return self.decode_string(buf, cb),
            }
        }
    }

    fn on_length_done<S: HpackStringListener>(&mut self, cb: &mut S) {
        self.remaining = self.length_decoder.value() as usize;
        cb.on_string_start(self.huffman_encoded, self.remaining);
    }

    /// Hands over whatever portion of the string is available, signalling
    /// the end when the last byte has been seen.
    fn decode_string<S: HpackStringListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        cb: &mut S,
    ) -> DecodeStatus {
        let len = self.remaining.min(buf.remaining());
        if len > 0 {
            cb.on_string_data(&buf.chunk()[..len]);
            buf.advance(len);
            self.remaining -= len;
        }
        if self.remaining == 0 {
            cb.on_string_end();
            return DecodeStatus::Done;
        }
        self.state = StringDecoderState::DecodingString;
        DecodeStatus::InProgress
    }
}
