use crate::buffer::DecodeBuffer;
use crate::frame::{AltSvcFields, FrameDecoderState, FrameListener, Kind, WireStructure};
use crate::DecodeStatus;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum PayloadState {
    #[default]
    StartDecodingStruct,
    ResumeDecodingStruct,
    DecodingStrings,
}

/// ALTSVC payload: a 2-byte origin length, the origin, then the value
/// taking up whatever is left of the payload.
#[derive(Debug, Default)]
pub struct AltSvcPayloadDecoder {
    state: PayloadState,
    altsvc_fields: AltSvcFields,
}

impl AltSvcPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::AltSvc);
        debug_assert!(buf.remaining() <= state.frame_header().length as usize);

        state.initialize_remainders();
        self.state = PayloadState::StartDecodingStruct;
        self.resume_payload(state, buf, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::AltSvc);
        loop {
            let status = match self.state {
                PayloadState::StartDecodingStruct => {
                    state.start_decoding_structure_in_payload(&mut self.altsvc_fields, buf, listener)
                }
                PayloadState::ResumeDecodingStruct => state.resume_decoding_structure_in_payload(
                    &mut self.altsvc_fields,
                    buf,
                    listener,
                ),
                PayloadState::DecodingStrings => return self.decode_strings(state, buf, listener),
            };
            match status {
                DecodeStatus::Done => {
                    let origin_length = self.altsvc_fields.origin_length as u32;
                    if origin_length > state.remaining_payload() {
                        // The origin can't fit in the payload.
                        return state.report_frame_size_error(listener);
                    }
                    let origin_and_value_length = state.remaining_payload() as usize;
                    listener.on_altsvc_start(
                        state.frame_header(),
                        origin_length as usize,
                        origin_and_value_length - origin_length as usize,
                    );
                    self.state = PayloadState::DecodingStrings;
                }
                DecodeStatus::InProgress => {
                    self.state = PayloadState::ResumeDecodingStruct;
                    return DecodeStatus::InProgress;
                }
                DecodeStatus::Error => return DecodeStatus::Error,
            }
        }
    }

    /// The origin's end isn't tracked explicitly; it is recovered from how
    /// much payload remains relative to the value's (fixed) length.
    fn decode_strings<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let origin_length = self.altsvc_fields.origin_length as usize;
        let value_length =
            state.frame_header().length as usize - origin_length - AltSvcFields::WIRE_SIZE;
        if state.remaining_payload() as usize > value_length {
            let remaining_origin = state.remaining_payload() as usize - value_length;
            let avail = buf.min_length_remaining(remaining_origin);
            if avail > 0 {
                listener.on_altsvc_origin_data(&buf.chunk()[..avail]);
                buf.advance(avail);
                state.consume_payload(avail);
            }
            if remaining_origin > avail {
                return DecodeStatus::InProgress;
            }
        }
        // All that is left of the payload is the value.
        let avail = state.available_payload(buf);
        if avail > 0 {
            listener.on_altsvc_value_data(&buf.chunk()[..avail]);
            buf.advance(avail);
            state.consume_payload(avail);
        }
        if state.remaining_payload() > 0 {
            return DecodeStatus::InProgress;
        }
        listener.on_altsvc_end();
        DecodeStatus::Done
    }
}
