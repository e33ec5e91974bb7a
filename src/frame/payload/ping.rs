use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind, PingFields, WireStructure};
use crate::DecodeStatus;

/// PING is exactly 8 opaque bytes; the ACK flag picks which callback the
/// listener gets.
#[derive(Debug, Default)]
pub struct PingPayloadDecoder {
    ping_fields: PingFields,
}

impl PingPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let header = *state.frame_header();
        debug_assert_eq!(header.kind, Kind::Ping);
        debug_assert!(buf.remaining() <= header.length as usize);

        if buf.remaining() == PingFields::WIRE_SIZE && header.length as usize == PingFields::WIRE_SIZE
        {
            let fields = PingFields::decode(buf);
            if header.is_ack() {
                listener.on_ping_ack(&header, &fields);
            } else {
                listener.on_ping(&header, &fields);
            }
            return DecodeStatus::Done;
        }
        state.initialize_remainders();
        let status = state.start_decoding_structure_in_payload(&mut self.ping_fields, buf, listener);
        self.handle_status(state, status, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Ping);
        let status =
            state.resume_decoding_structure_in_payload(&mut self.ping_fields, buf, listener);
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
                let header = *state.frame_header();
                if header.is_ack() {
                    listener.on_ping_ack(&header, &self.ping_fields);
                } else {
                    listener.on_ping(&header, &self.ping_fields);
                }
                return DecodeStatus::Done;
            }
            return state.report_frame_size_error(listener);
        }
        status
    }
}
