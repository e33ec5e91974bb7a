use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind, PriorityFields};
use crate::DecodeStatus;

/// PRIORITY is exactly the 5-byte priority fields; anything longer or
/// shorter is a frame size error.
#[derive(Debug, Default)]
pub struct PriorityPayloadDecoder {
    priority_fields: PriorityFields,
}

impl PriorityPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Priority);
        debug_assert!(buf.remaining() <= state.frame_header().length as usize);

        state.initialize_remainders();
        let status =
            state.start_decoding_structure_in_payload(&mut self.priority_fields, buf, listener);
        self.handle_status(state, status, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Priority);
        let status =
            state.resume_decoding_structure_in_payload(&mut self.priority_fields, buf, listener);
        self.handle_status(state, status, listener)
    }

    fn handle_status<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        status: DecodeStatus,
        listener: &mut L,
    ) -> DecodeStatus {
        if status == DecodeStatus::Done {
            if state.remaining_payload() == 0 {
                listener.on_priority_frame(state.frame_header(), &self.priority_fields);
                return DecodeStatus::Done;
            }
            // Payload is too long.
            return state.report_frame_size_error(listener);
        }
        status
    }
}
