use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener};
use crate::DecodeStatus;

/// Frames of a type this implementation does not know are skipped without
/// interpretation, per RFC 7540 section 4.1; the callbacks let an observer
/// count or log them.
#[derive(Debug, Default)]
pub struct UnknownPayloadDecoder;

impl UnknownPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert!(buf.remaining() <= state.frame_header().length as usize);
        state.initialize_remainders();
        listener.on_unknown_start(state.frame_header());
        self.resume_payload(state, buf, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let avail = state.available_payload(buf);
        if avail > 0 {
            listener.on_unknown_payload(&buf.chunk()[..avail]);
            buf.advance(avail);
            state.consume_payload(avail);
        }
        if state.remaining_payload() == 0 {
            listener.on_unknown_end();
            return DecodeStatus::Done;
        }
        DecodeStatus::InProgress
    }
}
