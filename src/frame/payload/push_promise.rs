use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind, PushPromiseFields};
use crate::DecodeStatus;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum PayloadState {
    #[default]
    ReadPadLength,
    StartDecodingPushPromiseFields,
    ResumeDecodingPushPromiseFields,
    ReadPayload,
    SkipPadding,
}

/// PUSH_PROMISE payload: optional Pad Length, the 4-byte Promised Stream
/// Id, then an HPACK block fragment, then padding. The start callback is
/// held back until the promised id is fully decoded.
#[derive(Debug, Default)]
pub struct PushPromisePayloadDecoder {
    state: PayloadState,
    push_promise_fields: PushPromiseFields,
}

impl PushPromisePayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let header = *state.frame_header();
        debug_assert_eq!(header.kind, Kind::PushPromise);
        debug_assert!(buf.remaining() <= header.length as usize);

        self.state = if header.is_padded() {
            PayloadState::ReadPadLength
        } else {
            PayloadState::StartDecodingPushPromiseFields
        };
        state.initialize_remainders();
        self.resume_payload(state, buf, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::PushPromise);
        loop {
            match self.state {
                PayloadState::ReadPadLength => {
                    // Suppress the pad length callback; the total padding
                    // is reported through on_push_promise_start once the
                    // promised stream id is known.
                    let status = state.read_pad_length(buf, false, listener);
                    if status != DecodeStatus::Done {
                        return status;
                    }
                    self.state = PayloadState::StartDecodingPushPromiseFields;
                }
                PayloadState::StartDecodingPushPromiseFields => {
                    let status = state.start_decoding_structure_in_payload(
                        &mut self.push_promise_fields,
                        buf,
                        listener,
                    );
                    if status != DecodeStatus::Done {
                        self.state = PayloadState::ResumeDecodingPushPromiseFields;
                        return status;
                    }
                    self.report_push_promise(state, listener);
                    self.state = PayloadState::ReadPayload;
                }
                PayloadState::ResumeDecodingPushPromiseFields => {
                    let status = state.resume_decoding_structure_in_payload(
                        &mut self.push_promise_fields,
                        buf,
                        listener,
                    );
                    if status != DecodeStatus::Done {
                        return status;
                    }
                    self.report_push_promise(state, listener);
                    self.state = PayloadState::ReadPayload;
                }
                PayloadState::ReadPayload => {
                    let avail = state.available_payload(buf);
                    if avail > 0 {
                        listener.on_hpack_fragment(&buf.chunk()[..avail]);
                        buf.advance(avail);
                        state.consume_payload(avail);
                    }
                    if state.remaining_payload() > 0 {
                        return DecodeStatus::InProgress;
                    }
                    self.state = PayloadState::SkipPadding;
                }
                PayloadState::SkipPadding => {
                    if state.skip_padding(buf, listener) {
                        listener.on_push_promise_end();
                        return DecodeStatus::Done;
                    }
                    return DecodeStatus::InProgress;
                }
            }
        }
    }

    fn report_push_promise<L: FrameListener>(
        &self,
        state: &FrameDecoderState,
        listener: &mut L,
    ) {
        let total_padding = if state.frame_header().is_padded() {
            1 + state.remaining_padding() as usize
        } else {
            0
        };
        listener.on_push_promise_start(
            state.frame_header(),
            &self.push_promise_fields,
            total_padding,
        );
    }
}
