use super::{
    ErrorCode, FrameHeader, GoAwayFields, PingFields, PriorityFields, PriorityUpdateFields,
    PushPromiseFields, SettingFields,
};

/// Receives everything the frame decoder finds, in wire order. For every
/// frame exactly one `on_*_start`-style callback precedes any payload
/// callbacks, and exactly one `on_*_end`-style callback follows, unless an
/// error callback aborts the frame.
///
/// Payload callbacks hand out slices borrowed from the decode buffer of
/// the current call; implementations must copy anything they want to keep.
///
/// Every method has a no-op default so that implementations only spell out
/// the events they care about.
pub trait FrameListener {
    /// Called when a frame header has been decoded, before any payload is
    /// processed. Returning false rejects the frame; its payload is then
    /// consumed and discarded without further callbacks.
    fn on_frame_header(&mut self, header: &FrameHeader) -> bool {
        let _ = header;
        true
    }

    /// A frame whose payload length is incompatible with its type, e.g. a
    /// PING that isn't exactly 8 bytes. The rest of the payload will be
    /// discarded.
    fn on_frame_size_error(&mut self, header: &FrameHeader) {
        let _ = header;
    }

    /// The declared padding doesn't fit in the payload. `missing_length`
    /// is how many bytes the declaration overshoots by.
    fn on_padding_too_long(&mut self, header: &FrameHeader, missing_length: usize) {
        let _ = (header, missing_length);
    }

    fn on_pad_length(&mut self, pad_length: u8) {
        let _ = pad_length;
    }

    /// Trailing padding bytes; their values are not inspected.
    fn on_padding(&mut self, padding: &[u8]) {
        let _ = padding;
    }

    fn on_data_start(&mut self, header: &FrameHeader) {
        let _ = header;
    }

    fn on_data_payload(&mut self, data: &[u8]) {
        let _ = data;
    }

    fn on_data_end(&mut self) {}

    fn on_headers_start(&mut self, header: &FrameHeader) {
        let _ = header;
    }

    fn on_headers_priority(&mut self, priority: &PriorityFields) {
        let _ = priority;
    }

    /// A piece of an HPACK block, from HEADERS, PUSH_PROMISE or
    /// CONTINUATION. Feed these to an [`crate::HpackDecoderAdapter`] in
    /// order to get header name/value pairs back out.
    fn on_hpack_fragment(&mut self, data: &[u8]) {
        let _ = data;
    }

    fn on_headers_end(&mut self) {}

    fn on_priority_frame(&mut self, header: &FrameHeader, priority: &PriorityFields) {
        let _ = (header, priority);
    }

    fn on_continuation_start(&mut self, header: &FrameHeader) {
        let _ = header;
    }

    fn on_continuation_end(&mut self) {}

    fn on_rst_stream(&mut self, header: &FrameHeader, error_code: ErrorCode) {
        let _ = (header, error_code);
    }

    fn on_settings_start(&mut self, header: &FrameHeader) {
        let _ = header;
    }

    fn on_setting(&mut self, setting: &SettingFields) {
        let _ = setting;
    }

    fn on_settings_end(&mut self) {}

    fn on_settings_ack(&mut self, header: &FrameHeader) {
        let _ = header;
    }

    /// `total_padding` counts the Pad Length byte itself, so it is zero
    /// for an unpadded frame and pad-length + 1 otherwise.
    fn on_push_promise_start(
        &mut self,
        header: &FrameHeader,
        promise: &PushPromiseFields,
        total_padding: usize,
    ) {
        let _ = (header, promise, total_padding);
    }

    fn on_push_promise_end(&mut self) {}

    fn on_ping(&mut self, header: &FrameHeader, ping: &PingFields) {
        let _ = (header, ping);
    }

    fn on_ping_ack(&mut self, header: &FrameHeader, ping: &PingFields) {
        let _ = (header, ping);
    }

    fn on_goaway_start(&mut self, header: &FrameHeader, goaway: &GoAwayFields) {
        let _ = (header, goaway);
    }

    fn on_goaway_opaque_data(&mut self, data: &[u8]) {
        let _ = data;
    }

    fn on_goaway_end(&mut self) {}

    fn on_window_update(&mut self, header: &FrameHeader, window_size_increment: u32) {
        let _ = (header, window_size_increment);
    }

    fn on_altsvc_start(&mut self, header: &FrameHeader, origin_length: usize, value_length: usize) {
        let _ = (header, origin_length, value_length);
    }

    fn on_altsvc_origin_data(&mut self, data: &[u8]) {
        let _ = data;
    }

    fn on_altsvc_value_data(&mut self, data: &[u8]) {
        let _ = data;
    }

    fn on_altsvc_end(&mut self) {}

    fn on_priority_update_start(&mut self, header: &FrameHeader, fields: &PriorityUpdateFields) {
        let _ = (header, fields);
    }

    fn on_priority_update_payload(&mut self, data: &[u8]) {
        let _ = data;
    }

    fn on_priority_update_end(&mut self) {}

    fn on_unknown_start(&mut self, header: &FrameHeader) {
        let _ = header;
    }

    fn on_unknown_payload(&mut self, data: &[u8]) {
        let _ = data;
    }

    fn on_unknown_end(&mut self) {}
}
