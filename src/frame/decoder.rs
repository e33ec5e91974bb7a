// Copyright 2022 - 2024 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh
// -----
// Created Date: 2024/03/13 11:26:40

use crate::buffer::{DecodeBuffer, DecodeBufferSubset};
use crate::DecodeStatus;

use super::payload::{
    AltSvcPayloadDecoder, ContinuationPayloadDecoder, DataPayloadDecoder, GoAwayPayloadDecoder,
    HeadersPayloadDecoder, PingPayloadDecoder, PriorityPayloadDecoder,
    PriorityUpdatePayloadDecoder, PushPromisePayloadDecoder, ResetPayloadDecoder,
    SettingsPayloadDecoder, UnknownPayloadDecoder, WindowUpdatePayloadDecoder,
};
use super::{Flag, FrameDecoderState, FrameListener, Kind, MAX_MAX_FRAME_SIZE};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum State {
    /// The next byte of input is the first byte of a frame header.
    #[default]
    StartDecodingHeader,
    /// The frame header was split across buffers.
    ResumeDecodingHeader,
    /// The header is done; the payload decoder for the frame's type needs
    /// more input.
    ResumeDecodingPayload,
    /// The payload failed; what's left of it is consumed and dropped, then
    /// decoding picks up at the next frame header.
    DiscardPayload,
}

/// Splits a stream of transport buffers into HTTP/2 frames, decodes each
/// payload according to its type, and reports everything to a
/// [`FrameListener`]. Tolerates buffer boundaries anywhere, including
/// inside the frame header.
///
/// `decode_frame` handles at most one frame per call; when it returns
/// [`DecodeStatus::Done`] with bytes still left in the buffer, call it
/// again for the next frame.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    state: State,
    frame_state: FrameDecoderState,
    maximum_payload_size: Option<u32>,
    priority_update_enabled: bool,

    data_decoder: DataPayloadDecoder,
    headers_decoder: HeadersPayloadDecoder,
    priority_decoder: PriorityPayloadDecoder,
    reset_decoder: ResetPayloadDecoder,
    settings_decoder: SettingsPayloadDecoder,
    push_promise_decoder: PushPromisePayloadDecoder,
    ping_decoder: PingPayloadDecoder,
    go_away_decoder: GoAwayPayloadDecoder,
    window_update_decoder: WindowUpdatePayloadDecoder,
    continuation_decoder: ContinuationPayloadDecoder,
    alt_svc_decoder: AltSvcPayloadDecoder,
    priority_update_decoder: PriorityUpdatePayloadDecoder,
    unknown_decoder: UnknownPayloadDecoder,
}

impl FrameDecoder {
    pub fn new() -> FrameDecoder {
        FrameDecoder::default()
    }

    /// Frames declaring a payload longer than this are rejected with
    /// `on_frame_size_error` and discarded. The transport-level limit is
    /// `2^24 - 1`; a session will usually lower this to the value of its
    /// SETTINGS_MAX_FRAME_SIZE.
    pub fn set_maximum_payload_size(&mut self, size: u32) {
        debug_assert!(size <= MAX_MAX_FRAME_SIZE);
        self.maximum_payload_size = Some(size);
    }

    /// The PRIORITY_UPDATE code point is not settled across drafts, so it
    /// is only parsed when asked for; otherwise those frames take the
    /// unknown-frame path. Do not toggle while a frame is mid-decode.
    pub fn set_priority_update_enabled(&mut self, enabled: bool) {
        self.priority_update_enabled = enabled;
    }

    /// The header of the frame currently being decoded. Meaningful once a
    /// listener callback for the frame has fired.
    pub fn frame_header(&self) -> &super::FrameHeader {
        self.frame_state.frame_header()
    }

    pub fn is_discarding_payload(&self) -> bool {
        self.state == State::DiscardPayload
    }

    /// Decodes at most one frame out of `buf`. Returns `Done` when a frame
    /// completed, `InProgress` when the buffer ran out first, and `Error`
    /// when the current frame failed; after an error the decoder discards
    /// the rest of that frame's payload on subsequent calls and then
    /// recovers at the next frame boundary.
    pub fn decode_frame<L: FrameListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        match self.state {
            State::StartDecodingHeader => {
                if self.frame_state.start_decoding_frame_header(buf) {
                    self.start_decoding_payload(buf, listener)
                } else {
                    self.state = State::ResumeDecodingHeader;
                    DecodeStatus::InProgress
                }
            }
            State::ResumeDecodingHeader => {
                if self.frame_state.resume_decoding_frame_header(buf) {
                    self.start_decoding_payload(buf, listener)
                } else {
                    DecodeStatus::InProgress
                }
            }
            State::ResumeDecodingPayload => self.resume_decoding_payload(buf, listener),
            State::DiscardPayload => self.discard_payload(buf),
        }
    }

    fn start_decoding_payload<L: FrameListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let header = *self.frame_state.frame_header();
        log::trace!("decoding frame {}", header);

        if !listener.on_frame_header(&header) {
            log::debug!("listener rejected frame, discarding: {}", header);
            self.state = State::DiscardPayload;
            self.frame_state.initialize_remainders();
            return DecodeStatus::Error;
        }
        if let Some(max) = self.maximum_payload_size {
            if header.length > max {
                log::debug!("payload length {} above limit {}", header.length, max);
                self.state = State::DiscardPayload;
                self.frame_state.initialize_remainders();
                listener.on_frame_size_error(&header);
                return DecodeStatus::Error;
            }
        }

        // The buffer may extend across many frames; the payload decoder
        // must not see past the end of this one.
        let status = {
            let mut subset = DecodeBufferSubset::new(buf, header.length as usize);
            self.dispatch_start(&mut subset, listener)
        };
        self.transition(status)
    }

    fn resume_decoding_payload<L: FrameListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let remaining = self.frame_state.remaining_total_payload();
        debug_assert!(remaining <= self.frame_state.frame_header().length);
        let status = {
            let mut subset = DecodeBufferSubset::new(buf, remaining as usize);
            self.dispatch_resume(&mut subset, listener)
        };
        self.transition(status)
    }

    fn transition(&mut self, status: DecodeStatus) -> DecodeStatus {
        self.state = match status {
            DecodeStatus::Done => State::StartDecodingHeader,
            DecodeStatus::InProgress => State::ResumeDecodingPayload,
            DecodeStatus::Error => State::DiscardPayload,
        };
        status
    }

    fn dispatch_start<L: FrameListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let kind = self.frame_state.frame_header().kind;
        match kind {
            // Unknown frames keep their raw flags for the observer.
            Kind::Unknown(_) => {}
            Kind::PriorityUpdate if !self.priority_update_enabled => {}
            _ => self.frame_state.retain_flags(Flag::allowed_for(kind)),
        }
        match kind {
            Kind::Data => self
                .data_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::Headers => self
                .headers_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::Priority => self
                .priority_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::Reset => self
                .reset_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::Settings => self
                .settings_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::PushPromise => self
                .push_promise_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::Ping => self
                .ping_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::GoAway => self
                .go_away_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::WindowUpdate => self
                .window_update_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::Continuation => self
                .continuation_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::AltSvc => self
                .alt_svc_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            Kind::PriorityUpdate if self.priority_update_enabled => self
                .priority_update_decoder
                .start_payload(&mut self.frame_state, buf, listener),
            _ => self
                .unknown_decoder
                .start_payload(&mut self.frame_state, buf, listener),
        }
    }

    fn dispatch_resume<L: FrameListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        match self.frame_state.frame_header().kind {
            Kind::Data => self
                .data_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::Headers => self
                .headers_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::Priority => self
                .priority_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::Reset => self
                .reset_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::Settings => self
                .settings_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::PushPromise => self
                .push_promise_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::Ping => self
                .ping_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::GoAway => self
                .go_away_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::WindowUpdate => self
                .window_update_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::Continuation => self
                .continuation_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::AltSvc => self
                .alt_svc_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            Kind::PriorityUpdate if self.priority_update_enabled => self
                .priority_update_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
            _ => self
                .unknown_decoder
                .resume_payload(&mut self.frame_state, buf, listener),
        }
    }

    fn discard_payload(&mut self, buf: &mut DecodeBuffer<'_>) -> DecodeStatus {
        // Fold any padding back into the payload count; it is all getting
        // dropped either way.
        self.frame_state.add_padding_to_payload();
        let avail = self.frame_state.available_payload(buf);
        if avail > 0 {
            buf.advance(avail);
            self.frame_state.consume_payload(avail);
        }
        if self.frame_state.remaining_payload() == 0 {
            self.state = State::StartDecodingHeader;
            return DecodeStatus::Done;
        }
        DecodeStatus::InProgress
    }
}
