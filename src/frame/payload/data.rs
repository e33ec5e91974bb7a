use crate::buffer::DecodeBuffer;
use crate::frame::{FrameDecoderState, FrameListener, Kind};
use crate::DecodeStatus;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum PayloadState {
    #[default]
    ReadPadLength,
    ReadPayload,
    SkipPadding,
}

/// DATA frames carry a stream of opaque bytes, possibly padded.
#[derive(Debug, Default)]
pub struct DataPayloadDecoder {
    state: PayloadState,
}

impl DataPayloadDecoder {
    pub fn start_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let header = *state.frame_header();
        debug_assert_eq!(header.kind, Kind::Data);
        debug_assert!(buf.remaining() <= header.length as usize);

        // Hoped-for common case: unpadded and wholly in this buffer.
        if !header.is_padded() && buf.remaining() == header.length as usize {
            listener.on_data_start(&header);
            if header.length > 0 {
                listener.on_data_payload(buf.chunk());
                buf.advance(header.length as usize);
            }
            listener.on_data_end();
            return DecodeStatus::Done;
        }

        state.initialize_remainders();
        listener.on_data_start(&header);
        self.state = if header.is_padded() {
            PayloadState::ReadPadLength
        } else {
            PayloadState::ReadPayload
        };
        self.resume_payload(state, buf, listener)
    }

    pub fn resume_payload<L: FrameListener>(
        &mut self,
        state: &mut FrameDecoderState,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert_eq!(state.frame_header().kind, Kind::Data);
        loop {
            match self.state {
                PayloadState::ReadPadLength => {
                    let status = state.read_pad_length(buf, true, listener);
                    if status != DecodeStatus::Done {
                        return status;
                    }
                    self.state = PayloadState::ReadPayload;
                }
                PayloadState::ReadPayload => {
                    let avail = state.available_payload(buf);
                    if avail > 0 {
                        listener.on_data_payload(&buf.chunk()[..avail]);
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
                        listener.on_data_end();
                        return DecodeStatus::Done;
                    }
                    return DecodeStatus::InProgress;
                }
            }
        }
    }
}
