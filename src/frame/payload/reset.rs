use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind, RstStreamFields};
use crate::DecodeStatus;

/// RST_STREAM is exactly a 4-byte error code.
#[derive(Debug, Default)]
pub struct ResetPayloadDecoder {
    rst_stream_fields: RstStreamFields,
}

impl ResetPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Reset);
        debug_assert!(buf.remaining() <= state.frame_header().length as usize);

        state.initialize_remainders();
        let status =
            state.start_decoding_structure_in_payload(&mut self.rst_stream_fields, buf, listener);
        self.handle_status(state, status, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Reset);
        let status =
            state.resume_decoding_structure_in_payload(&mut self.rst_stream_fields, buf, listener);
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
                listener.on_rst_stream(state.frame_header(), self.rst_stream_fields.error_code);
                return DecodeStatus::Done;
            }
            return state.report_frame_size_error(listener);
        }
        status
    }
}
