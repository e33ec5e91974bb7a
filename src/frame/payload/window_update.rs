use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind, WindowUpdateFields, WireStructure};
use crate::DecodeStatus;

/// WINDOW_UPDATE is exactly a 4-byte window size increment. A zero
/// increment is left for the session layer to judge.
#[derive(Debug, Default)]
pub struct WindowUpdatePayloadDecoder {
    window_update_fields: WindowUpdateFields,
}

impl WindowUpdatePayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let header = *state.frame_header();
        debug_assert_eq!(header.kind, Kind::WindowUpdate);
        debug_assert!(buf.remaining() <= header.length as usize);

        if buf.remaining() == WindowUpdateFields::WIRE_SIZE
            && header.length as usize == WindowUpdateFields::WIRE_SIZE
        {
            let fields = WindowUpdateFields::decode(buf);
            listener.on_window_update(&header, fields.window_size_increment);
            return DecodeStatus::Done;
        }
        state.initialize_remainders();
        let status = state.start_decoding_structure_in_payload(
            &mut self.window_update_fields,
            buf,
            listener,
        );
        self.handle_status(state, status, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::WindowUpdate);
        let status = state.resume_decoding_structure_in_payload(
            &mut self.window_update_fields,
            buf,
            listener,
        );
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
                let increment = self.window_update_fields.window_size_increment;
                listener.on_window_update(state.frame_header(), increment);
                return DecodeStatus::Done;
            }
            return state.report_frame_size_error(listener);
        }
        status
    }
}
