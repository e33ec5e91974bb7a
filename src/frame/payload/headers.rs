use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind, PriorityFields};
use crate::DecodeStatus;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum PayloadState {
    #[default]
    ReadPadLength,
    StartDecodingPriorityFields,
    ResumeDecodingPriorityFields,
    ReadPayload,
    SkipPadding,
}

/// HEADERS payload: optional Pad Length, optional priority fields, then an
/// HPACK block fragment, then padding.
#[derive(Debug, Default)]
pub struct HeadersPayloadDecoder {
    state: PayloadState,
    priority_fields: PriorityFields,
}

impl HeadersPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let header = *state.frame_header();
        debug_assert_eq!(header.kind, Kind::Headers);
        debug_assert!(buf.remaining() <= header.length as usize);

        if !header.is_padded() && !header.has_priority() {
            // Most HEADERS frames are just the HPACK fragment; when it is
            // wholly in this buffer there is no state to keep.
            if buf.remaining() == header.length as usize {
                listener.on_headers_start(&header);
                if header.length > 0 {
                    listener.on_hpack_fragment(buf.chunk());
                    buf.advance(header.length as usize);
                }
                listener.on_headers_end();
                return DecodeStatus::Done;
            }
            self.state = PayloadState::ReadPayload;
        } else if header.is_padded() {
            self.state = PayloadState::ReadPadLength;
        } else {
            debug_assert!(header.has_priority());
            self.state = PayloadState::StartDecodingPriorityFields;
        }
        state.initialize_remainders();
        listener.on_headers_start(&header);
        self.resume_payload(state, buf, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Headers);
        loop {
            match self.state {
                PayloadState::ReadPadLength => {
                    let status = state.read_pad_length(buf, true, listener);
                    if status != DecodeStatus::Done {
                        return status;
                    }
                    self.state = if state.frame_header().has_priority() {
                        PayloadState::StartDecodingPriorityFields
                    } else {
                        PayloadState::ReadPayload
                    };
                }
                PayloadState::StartDecodingPriorityFields => {
                    let status = state.start_decoding_structure_in_payload(
                        &mut self.priority_fields,
                        buf,
                        listener,
                    );
                    if status != DecodeStatus::Done {
                        self.state = PayloadState::ResumeDecodingPriorityFields;
                        return status;
                    }
                    listener.on_headers_priority(&self.priority_fields);
                    self.state = PayloadState::ReadPayload;
                }
                PayloadState::ResumeDecodingPriorityFields => {
                    let status = state.resume_decoding_structure_in_payload(
                        &mut self.priority_fields,
                        buf,
                        listener,
                    );
                    if status != DecodeStatus::Done {
                        return status;
                    }
                    listener.on_headers_priority(&self.priority_fields);
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
                        listener.on_headers_end();
                        return DecodeStatus::Done;
                    }
                    return DecodeStatus::InProgress;
                }
            }
        }
    }
}
