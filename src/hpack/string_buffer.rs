use super::huffman::HuffmanDecoder;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    Reset,
    Collecting,
    Complete,
}

/// Collects one HPACK string literal (a name or a value) as its bytes
/// arrive, decompressing on the fly when the string is Huffman coded. The
/// collected bytes are owned, so nothing here ever points back into a
/// transport buffer, no matter how the string was split across fragments.
#[derive(Debug, Default)]
pub struct HpackStringBuffer {
    buffer: Vec<u8>,
    huffman: HuffmanDecoder,

    /// Bytes of the on-wire string not yet seen.
    remaining_len: usize,
    is_huffman_encoded: bool,
    state: State,
}

impl HpackStringBuffer {
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.remaining_len = 0;
        self.is_huffman_encoded = false;
        self.state = State::Reset;
    }

    /// Note that for Huffman coded strings `len` is the on-wire length;
    /// the decoded string is usually longer.
    pub fn on_start(&mut self, huffman_encoded: bool, len: usize) {
        debug_assert_eq!(self.state, State::Reset);
        self.buffer.clear();
        self.is_huffman_encoded = huffman_encoded;
        self.remaining_len = len;
        self.state = State::Collecting;
        if huffman_encoded {
            self.huffman.reset();
        } else {
            self.buffer.reserve(len);
        }
    }

    /// Returns false on a Huffman coding error.
    pub fn on_data(&mut self, data: &[u8]) -> bool {
        debug_assert_eq!(self.state, State::Collecting);
        debug_assert!(data.len() <= self.remaining_len);
        self.remaining_len -= data.len();
        if self.is_huffman_encoded {
            self.huffman.decode(data, &mut self.buffer)
        } else {
            self.buffer.extend_from_slice(data);
            true
        }
    }

    /// Returns false if a Huffman coded string was improperly terminated.
    pub fn on_end(&mut self) -> bool {
        debug_assert_eq!(self.state, State::Collecting);
        debug_assert_eq!(self.remaining_len, 0);
        self.state = State::Complete;
        if self.is_huffman_encoded {
            self.huffman.input_properly_terminated()
        } else {
            true
        }
    }

    /// The collected string; valid once `on_end` has returned true.
    pub fn str(&self) -> &[u8] {
        debug_assert_eq!(self.state, State::Complete);
        &self.buffer
    }

    /// The decoded length so far, used for enforcing string size limits
    /// while a Huffman string is still inflating.
    pub fn decoded_len(&self) -> usize {
        self.buffer.len()
    }

    /// Hands the collected string over and resets for the next one.
    pub fn release(&mut self) -> Vec<u8> {
        debug_assert_eq!(self.state, State::Complete);
        let out = std::mem::take(&mut self.buffer);
        self.reset();
        out
    }
}
