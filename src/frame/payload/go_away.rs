use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, GoAwayFields, Kind};
use crate::DecodeStatus;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum PayloadState {
    #[default]
    StartDecodingFixedFields,
    ResumeDecodingFixedFields,
    ReadOpaqueData,
}

/// GOAWAY payload: 8 fixed bytes (last stream id + error code), then any
/// amount of opaque debug data.
#[derive(Debug, Default)]
pub struct GoAwayPayloadDecoder {
    state: PayloadState,
    goaway_fields: GoAwayFields,
}

impl GoAwayPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::GoAway);
        debug_assert!(buf.remaining() <= state.frame_header().length as usize);

        state.initialize_remainders();
        self.state = PayloadState::StartDecodingFixedFields;
        self.resume_payload(state, buf, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::GoAway);
        loop {
            match self.state {
                PayloadState::StartDecodingFixedFields => {
                    let status = state.start_decoding_structure_in_payload(
                        &mut self.goaway_fields,
                        buf,
                        listener,
                    );
                    if status != DecodeStatus::Done {
                        self.state = PayloadState::ResumeDecodingFixedFields;
                        return status;
                    }
                    listener.on_goaway_start(state.frame_header(), &self.goaway_fields);
                    self.state = PayloadState::ReadOpaqueData;
                }
                PayloadState::ResumeDecodingFixedFields => {
                    let status = state.resume_decoding_structure_in_payload(
                        &mut self.goaway_fields,
                        buf,
                        listener,
                    );
                    if status != DecodeStatus::Done {
                        return status;
                    }
                    listener.on_goaway_start(state.frame_header(), &self.goaway_fields);
                    self.state = PayloadState::ReadOpaqueData;
                }
                PayloadState::ReadOpaqueData => {
                    let avail = state.available_payload(buf);
                    if avail > 0 {
                        listener.on_goaway_opaque_data(&buf.chunk()[..avail]);
                        buf.advance(avail);
                        state.consume_payload(avail);
                    }
                    if state.remaining_payload() > 0 {
                        return DecodeStatus::InProgress;
                    }
                    listener.on_goaway_end();
                    return DecodeStatus::Done;
                }
            }
        }
    }
}
