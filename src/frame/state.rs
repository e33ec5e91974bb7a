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
// Created Date: 2024/03/12 14:08:51

use crate::buffer::DecodeBuffer;
use crate::DecodeStatus;

use super::{FrameHeader, FrameListener, StructureDecoder, WireStructure};

/// State shared by all of the payload decoders: the current frame header
/// and the two counters tracking how much of the payload and of the
/// trailing padding is still to be consumed.
#[derive(Debug, Default)]
pub struct FrameDecoderState {
    frame_header: FrameHeader,

    /// Payload bytes not yet decoded; excludes the trailing padding once
    /// the Pad Length field has been read.
    remaining_payload: u32,

    /// Trailing padding bytes not yet skipped. Stays zero for frames
    /// without padding.
    remaining_padding: u32,

    structure_decoder: StructureDecoder,
}

impl FrameDecoderState {
    pub fn frame_header(&self) -> &FrameHeader {
        &self.frame_header
    }

    pub fn remaining_payload(&self) -> u32 {
        self.remaining_payload
    }

    pub fn remaining_padding(&self) -> u32 {
        debug_assert!(self.frame_header.kind.is_paddable());
        self.remaining_padding
    }

    /// Payload plus padding still to be consumed.
    pub fn remaining_total_payload(&self) -> u32 {
        debug_assert!(self.frame_header.kind.is_paddable() || self.remaining_padding == 0);
        self.remaining_payload + self.remaining_padding
    }

    /// How many bytes of the remaining payload are in `buf`?
    pub fn available_payload(&self, buf: &DecodeBuffer<'_>) -> usize {
        buf.min_length_remaining(self.remaining_payload as usize)
    }

    fn available_padding(&self, buf: &DecodeBuffer<'_>) -> usize {
        debug_assert_eq!(self.remaining_payload, 0);
        buf.min_length_remaining(self.remaining_padding as usize)
    }

    pub fn initialize_remainders(&mut self) {
        self.remaining_payload = self.frame_header.length;
        self.remaining_padding = 0;
    }

    /// Reduces `remaining_payload` after a variable length portion of the
    /// payload has been handed to the listener; fixed structures and
    /// padding are accounted for automatically.
    pub fn consume_payload(&mut self, amount: usize) {
        debug_assert!(amount as u32 <= self.remaining_payload);
        self.remaining_payload -= amount as u32;
    }

    pub(super) fn start_decoding_frame_header(&mut self, buf: &mut DecodeBuffer<'_>) -> bool {
        self.structure_decoder.start(&mut self.frame_header, buf)
    }

    pub(super) fn resume_decoding_frame_header(&mut self, buf: &mut DecodeBuffer<'_>) -> bool {
        self.structure_decoder.resume(&mut self.frame_header, buf)
    }

    /// Decodes a fixed structure inside the payload, keeping
    /// `remaining_payload` in step. Running out of payload before the
    /// structure completes is a frame size error, reported here.
    pub fn start_decoding_structure_in_payload<S: WireStructure, L: FrameListener>(
        &mut self,
        out: &mut S,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        let status =
            self.structure_decoder
                .start_in_payload(out, buf, &mut self.remaining_payload);
        if status != DecodeStatus::Error {
            return status;
        }
        self.report_frame_size_error(listener)
    }

    pub fn resume_decoding_structure_in_payload<S: WireStructure, L: FrameListener>(
        &mut self,
        out: &mut S,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> DecodeStatus {
        if self
            .structure_decoder
            .resume_in_payload(out, buf, &mut self.remaining_payload)
        {
            DecodeStatus::Done
        } else if self.remaining_payload > 0 {
            DecodeStatus::InProgress
        } else {
            self.report_frame_size_error(listener)
        }
    }

    /// Reads the Pad Length field, which is always the first byte of a
    /// padded payload, and splits the payload length into payload and
    /// padding. If the declared padding cannot fit, reports
    /// `on_padding_too_long` and fails the frame.
    pub fn read_pad_length<L: FrameListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        report_pad_length: bool,
        listener: &mut L,
    ) -> DecodeStatus {
        debug_assert!(self.frame_header.kind.is_paddable());
        debug_assert!(self.frame_header.is_padded());
        let total_payload = self.frame_header.length;
        debug_assert_eq!(total_payload, self.remaining_payload);
        debug_assert_eq!(0, self.remaining_padding);

        if buf.has_data() {
            let pad_length = buf.decode_u8() as u32;
            let total_padding = pad_length + 1;
            if total_padding <= total_payload {
                self.remaining_padding = pad_length;
                self.remaining_payload = total_payload - total_padding;
                if report_pad_length {
                    listener.on_pad_length(pad_length as u8);
                }
                return DecodeStatus::Done;
            }
            let missing_length = total_padding - total_payload;
            // Record what is left of the (invalid) payload so that the
            // discard path can still skip past it.
            self.remaining_payload = total_payload - 1;
            self.remaining_padding = 0;
            listener.on_padding_too_long(&self.frame_header, missing_length as usize);
            return DecodeStatus::Error;
        }

        if total_payload == 0 {
            // No room for even the Pad Length byte.
            self.remaining_payload = 0;
            self.remaining_padding = 0;
            listener.on_padding_too_long(&self.frame_header, 1);
            return DecodeStatus::Error;
        }
        DecodeStatus::InProgress
    }

    /// Skips trailing padding, reporting the skipped bytes without looking
    /// at them. Only call once `remaining_payload` is zero. Returns true
    /// when all padding has been consumed.
    pub fn skip_padding<L: FrameListener>(
        &mut self,
        buf: &mut DecodeBuffer<'_>,
        listener: &mut L,
    ) -> bool {
        debug_assert_eq!(self.remaining_payload, 0);
        debug_assert!(self.remaining_padding == 0 || self.frame_header.is_padded());
        let avail = self.available_padding(buf);
        if avail > 0 {
            listener.on_padding(&buf.chunk()[..avail]);
            buf.advance(avail);
            self.remaining_padding -= avail as u32;
        }
        self.remaining_padding == 0
    }

    pub fn report_frame_size_error<L: FrameListener>(&mut self, listener: &mut L) -> DecodeStatus {
        log::debug!(
            "frame size error: remaining_payload={} header={}",
            self.remaining_payload,
            self.frame_header
        );
        listener.on_frame_size_error(&self.frame_header);
        DecodeStatus::Error
    }

    pub(super) fn retain_flags(&mut self, valid: super::Flag) {
        self.frame_header.retain_flags(valid);
    }

    pub(super) fn add_padding_to_payload(&mut self) {
        self.remaining_payload += self.remaining_padding;
        self.remaining_padding = 0;
    }
}
