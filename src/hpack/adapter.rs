use crate::buffer::DecodeBuffer;

use super::decoder::HpackDecoder;
use super::error::HpackError;
use super::state::HpackListener;
use super::DEFAULT_MAX_DECODE_BUFFER_SIZE;

/// The session-facing view of a decoded header block: plain name/value
/// pairs plus the byte totals for the block.
pub trait HeaderHandler {
    fn on_header_block_start(&mut self) {}

    fn on_header(&mut self, name: &[u8], value: &[u8]);

    /// `total_uncompressed` sums the name and value lengths of every
    /// header in the block; `total_compressed` sums the HPACK bytes that
    /// produced them.
    fn on_header_block_end(&mut self, total_uncompressed: usize, total_compressed: usize) {
        let _ = (total_uncompressed, total_compressed);
    }

    fn on_header_error(&mut self, error: HpackError) {
        let _ = error;
    }
}

struct ListenerAdapter<'a, H: HeaderHandler> {
    handler: &'a mut H,
    total_uncompressed: &'a mut usize,
    total_compressed: usize,
}

impl<'a, H: HeaderHandler> HpackListener for ListenerAdapter<'a, H> {
    fn on_header_list_start(&mut self) {
        *self.total_uncompressed = 0;
        self.handler.on_header_block_start();
    }

    fn on_header(&mut self, name: &[u8], value: &[u8]) {
        *self.total_uncompressed += name.len() + value.len();
        self.handler.on_header(name, value);
    }

    fn on_header_list_end(&mut self) {
        self.handler
            .on_header_block_end(*self.total_uncompressed, self.total_compressed);
    }

    fn on_header_error_detected(&mut self, error: HpackError) {
        self.handler.on_header_error(error);
    }
}

/// Wraps [`HpackDecoder`] for driving straight from frame callbacks:
/// hand every `on_hpack_fragment` slice to `decode_fragment` and call
/// `end_block` at the frame carrying END_HEADERS. Enforces the fragment
/// and whole-block size budgets and keeps the running byte totals that
/// `on_header_block_end` reports.
#[derive(Debug)]
pub struct HpackDecoderAdapter {
    decoder: HpackDecoder,
    /// Largest fragment acceptable in one call.
    max_decode_buffer_size: usize,
    /// Compressed-byte budget for a whole block; zero means unlimited.
    max_header_block_size: usize,
    total_hpack_bytes: usize,
    total_uncompressed_bytes: usize,
    block_started: bool,
}

impl Default for HpackDecoderAdapter {
    fn default() -> Self {
        HpackDecoderAdapter::new()
    }
}

impl HpackDecoderAdapter {
    pub fn new() -> HpackDecoderAdapter {
        HpackDecoderAdapter {
            decoder: HpackDecoder::default(),
            max_decode_buffer_size: DEFAULT_MAX_DECODE_BUFFER_SIZE,
            max_header_block_size: 0,
            total_hpack_bytes: 0,
            total_uncompressed_bytes: 0,
            block_started: false,
        }
    }

    /// Also lowers the per-string limit, since no string can be larger
    /// than the buffer that carries it.
    pub fn set_max_decode_buffer_size(&mut self, size: usize) {
        self.max_decode_buffer_size = size;
        self.decoder.set_max_string_size(size);
    }

    /// Cumulative compressed-byte budget per block; zero disables the
    /// check.
    pub fn set_max_header_block_size(&mut self, size: usize) {
        self.max_header_block_size = size;
    }

    /// Bound on each name and value by itself, separable from the
    /// fragment budget.
    pub fn set_max_string_size(&mut self, size: usize) {
        self.decoder.set_max_string_size(size);
    }

    pub fn apply_header_table_size_setting(&mut self, limit: u32) {
        self.decoder.apply_header_table_size_setting(limit);
    }

    pub fn set_header_table_size(&mut self, limit: u32) {
        self.decoder.set_header_table_size(limit);
    }

    pub fn dynamic_table_size(&self) -> usize {
        self.decoder.dynamic_table_size()
    }

    pub fn error(&self) -> Option<HpackError> {
        self.decoder.error()
    }

    /// Feeds the next fragment of the current block, starting a new block
    /// if none is open. Returns false on any error, latched from then on.
    pub fn decode_fragment<H: HeaderHandler>(&mut self, fragment: &[u8], handler: &mut H) -> bool {
        log::trace!("hpack fragment, len={}", fragment.len());
        if !self.block_started {
            self.total_hpack_bytes = 0;
            let mut listener = ListenerAdapter {
                handler: &mut *handler,
                total_uncompressed: &mut self.total_uncompressed_bytes,
                total_compressed: self.total_hpack_bytes,
            };
            if !self.decoder.start_decoding_block(&mut listener) {
                return false;
            }
            self.block_started = true;
        }
        if fragment.len() > self.max_decode_buffer_size {
            self.report_error(HpackError::FragmentTooLong, handler);
            return false;
        }
        self.total_hpack_bytes += fragment.len();
        if self.max_header_block_size != 0 && self.total_hpack_bytes > self.max_header_block_size {
            self.report_error(HpackError::CompressedHeaderSizeExceedsLimit, handler);
            return false;
        }
        let mut buf = DecodeBuffer::new(fragment);
        let mut listener = ListenerAdapter {
            handler: &mut *handler,
            total_uncompressed: &mut self.total_uncompressed_bytes,
            total_compressed: self.total_hpack_bytes,
        };
        let ok = self.decoder.decode_fragment(&mut buf, &mut listener);
        debug_assert!(!ok || buf.is_empty());
        ok
    }

    /// Ends the current block; the handler's `on_header_block_end` fires
    /// from here with the final totals.
    pub fn end_block<H: HeaderHandler>(&mut self, handler: &mut H) -> bool {
        let mut listener = ListenerAdapter {
            handler: &mut *handler,
            total_uncompressed: &mut self.total_uncompressed_bytes,
            total_compressed: self.total_hpack_bytes,
        };
        let ok = self.decoder.end_decoding_block(&mut listener);
        self.block_started = false;
        ok
    }

    fn report_error<H: HeaderHandler>(&mut self, error: HpackError, handler: &mut H) {
        let mut listener = ListenerAdapter {
            handler: &mut *handler,
            total_uncompressed: &mut self.total_uncompressed_bytes,
            total_compressed: self.total_hpack_bytes,
        };
        self.decoder.report_error(error, &mut listener);
    }
}
