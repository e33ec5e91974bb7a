use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind, PriorityUpdateFields};
use crate::DecodeStatus;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum PayloadState {
    #[default]
    StartDecodingFixedFields,
    ResumeDecodingFixedFields,
    ReadPriorityFieldValue,
}

/// PRIORITY_UPDATE payload: the 4-byte prioritized stream id, then the
/// priority field value taking up the rest of the payload.
#[derive(Debug, Default)]
pub struct PriorityUpdatePayloadDecoder {
    state: PayloadState,
    priority_update_fields: PriorityUpdateFields,
}

impl PriorityUpdatePayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::PriorityUpdate);
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
        debug_assert_eq!(state.frame_header().kind, Kind::PriorityUpdate);
        loop {
            match self.state {
                PayloadState::StartDecodingFixedFields => {
                    let status = state.start_decoding_structure_in_payload(
                        &mut self.priority_update_fields,
                        buf,
                        listener,
                    );
                    if status != DecodeStatus::Done {
                        self.state = PayloadState::ResumeDecodingFixedFields;
                        return status;
                    }
                    listener
                        .on_priority_update_start(state.frame_header(), &self.priority_update_fields);
                    self.state = PayloadState::ReadPriorityFieldValue;
                }
                PayloadState::ResumeDecodingFixedFields => {
                    let status = state.resume_decoding_structure_in_payload(
                        &mut self.priority_update_fields,
                        buf,
                        listener,
                    );
                    if status != DecodeStatus::Done {
                        return status;
                    }
                    listener
                        .on_priority_update_start(state.frame_header(), &self.priority_update_fields);
                    self.state = PayloadState::ReadPriorityFieldValue;
                }
                PayloadState::ReadPriorityFieldValue => {
                    let avail = state.available_payload(buf);
                    if avail > 0 {
                        listener.on_priority_update_payload(&buf.chunk()[..avail]);
                        buf.advance(avail);
                        state.consume_payload(avail);
                    }
                    if state.remaining_payload() > 0 {
                        return DecodeStatus::InProgress;
                    }
                    listener.on_priority_update_end();
                    return DecodeStatus::Done;
                }
            }
        }
    }
}
