use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind};
use crate::DecodeStatus;

/// CONTINUATION carries nothing but the next fragment of an HPACK block.
#[derive(Debug, Default)]
pub struct ContinuationPayloadDecoder;

impl ContinuationPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let header = *state.frame_header();
        debug_assert_eq!(header.kind, Kind::Continuation);
        debug_assert!(buf.remaining() <= header.length as usize);

        state.initialize_remainders();
        listener.on_continuation_start(&header);
        self.resume_payload(state, buf, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Continuation);
        let avail = buf.remaining();
        debug_assert!(avail <= state.remaining_payload() as usize);
        if avail > 0 {
            listener.on_hpack_fragment(&buf.chunk()[..avail]);
            buf.advance(avail);
            state.consume_payload(avail);
        }
        if state.remaining_payload() == 0 {
            listener.on_continuation_end();
            return DecodeStatus::Done;
        }
        DecodeStatus::InProgress
    }
}
