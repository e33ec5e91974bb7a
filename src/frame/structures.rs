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
// Created Date: 2024/03/11 10:40:28

use std::fmt;

use crate::buffer::DecodeBuffer;

use super::{ErrorCode, Flag, Kind, StreamIdentifier, FRAME_HEADER_BYTES};

/// A fixed-size structure of the HTTP/2 wire format. `decode` consumes
/// exactly `WIRE_SIZE` bytes; the caller must have checked that at least
/// that much remains in the buffer.
pub trait WireStructure: Default {
    const WIRE_SIZE: usize;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self;
}

/// The 9-byte header that precedes every frame's payload.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    /// Length of the payload, at most 2^24 - 1 by encoding. Whether that
    /// length is acceptable for the frame type is checked by the payload
    /// decoder of that type, not here.
    pub length: u32,
    pub kind: Kind,
    pub flag: Flag,
    pub id: StreamIdentifier,
}

impl FrameHeader {
    pub fn new(kind: Kind, flag: Flag, id: StreamIdentifier) -> FrameHeader {
        FrameHeader {
            length: 0,
            kind,
            flag,
            id,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn stream_id(&self) -> StreamIdentifier {
        self.id
    }

    pub fn flag(&self) -> Flag {
        self.flag
    }

    pub fn is_padded(&self) -> bool {
        self.flag.is_padded()
    }

    pub fn is_ack(&self) -> bool {
        self.flag.is_ack()
    }

    pub fn is_end_headers(&self) -> bool {
        self.flag.is_end_headers()
    }

    pub fn has_priority(&self) -> bool {
        self.flag.is_priority()
    }

    /// Drops every flag bit not in `valid`, leaving only the bits that
    /// mean something for this frame's type.
    pub fn retain_flags(&mut self, valid: Flag) {
        self.flag = Flag::load(self.flag.bits() & valid.bits());
    }
}

impl WireStructure for FrameHeader {
    const WIRE_SIZE: usize = FRAME_HEADER_BYTES;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        let length = buf.decode_u24();
        let kind = Kind::new(buf.decode_u8());
        let flag = Flag::load(buf.decode_u8());
        let id = StreamIdentifier::parse(buf);
        FrameHeader {
            length,
            kind,
            flag,
            id,
        }
    }
}

impl fmt::Display for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}(length={}, flags=0x{:02x}, stream_id={})",
            self.kind,
            self.length,
            self.flag.bits(),
            self.id
        )
    }
}

/// The 5-byte body of a PRIORITY frame, also present in HEADERS when the
/// PRIORITY flag is set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PriorityFields {
    pub stream_dependency: StreamIdentifier,
    /// On the wire the weight is stored minus one; the decoded value is in
    /// 1..=256.
    pub weight: u16,
    pub is_exclusive: bool,
}

impl WireStructure for PriorityFields {
    const WIRE_SIZE: usize = 5;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        let raw = buf.decode_u32();
        let stream_dependency = StreamIdentifier(raw & crate::buffer::MASK_U31);
        PriorityFields {
            stream_dependency,
            is_exclusive: raw != stream_dependency.0,
            weight: buf.decode_u8() as u16 + 1,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RstStreamFields {
    pub error_code: ErrorCode,
}

impl WireStructure for RstStreamFields {
    const WIRE_SIZE: usize = 4;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        RstStreamFields {
            error_code: ErrorCode::parse(buf),
        }
    }
}

/// One parameter record out of a SETTINGS payload. Unknown identifiers are
/// kept raw; `setting()` maps the defined ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingFields {
    pub param: u16,
    pub value: u32,
}

impl SettingFields {
    pub fn setting(&self) -> Option<Setting> {
        Setting::from_id(self.param, self.value)
    }
}

impl WireStructure for SettingFields {
    const WIRE_SIZE: usize = 6;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        SettingFields {
            param: buf.decode_u16(),
            value: buf.decode_u32(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Setting {
    HeaderTableSize(u32),
    EnablePush(u32),
    MaxConcurrentStreams(u32),
    InitialWindowSize(u32),
    MaxFrameSize(u32),
    MaxHeaderListSize(u32),
    EnableConnectProtocol(u32),
}

impl Setting {
    /// Creates a new `Setting` with the correct variant corresponding to the
    /// given setting id, based on the settings IDs defined in section
    /// 6.5.2.
    pub fn from_id(id: u16, val: u32) -> Option<Setting> {
        use self::Setting::*;

        match id {
            1 => Some(HeaderTableSize(val)),
            2 => Some(EnablePush(val)),
            3 => Some(MaxConcurrentStreams(val)),
            4 => Some(InitialWindowSize(val)),
            5 => Some(MaxFrameSize(val)),
            6 => Some(MaxHeaderListSize(val)),
            8 => Some(EnableConnectProtocol(val)),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PushPromiseFields {
    pub promised_stream_id: StreamIdentifier,
}

impl WireStructure for PushPromiseFields {
    const WIRE_SIZE: usize = 4;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        PushPromiseFields {
            promised_stream_id: StreamIdentifier::parse(buf),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PingFields {
    pub opaque_bytes: [u8; 8],
}

impl WireStructure for PingFields {
    const WIRE_SIZE: usize = 8;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        let mut opaque_bytes = [0u8; 8];
        opaque_bytes.copy_from_slice(&buf.chunk()[..8]);
        buf.advance(8);
        PingFields { opaque_bytes }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GoAwayFields {
    pub last_stream_id: StreamIdentifier,
    pub error_code: ErrorCode,
}

impl WireStructure for GoAwayFields {
    const WIRE_SIZE: usize = 8;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        GoAwayFields {
            last_stream_id: StreamIdentifier::parse(buf),
            error_code: ErrorCode::parse(buf),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowUpdateFields {
    pub window_size_increment: u32,
}

impl WireStructure for WindowUpdateFields {
    const WIRE_SIZE: usize = 4;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        WindowUpdateFields {
            window_size_increment: buf.decode_u31(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AltSvcFields {
    pub origin_length: u16,
}

impl WireStructure for AltSvcFields {
    const WIRE_SIZE: usize = 2;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        AltSvcFields {
            origin_length: buf.decode_u16(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PriorityUpdateFields {
    pub prioritized_stream_id: StreamIdentifier,
}

impl WireStructure for PriorityUpdateFields {
    const WIRE_SIZE: usize = 4;

    fn decode(buf: &mut DecodeBuffer<'_>) -> Self {
        PriorityUpdateFields {
            prioritized_stream_id: StreamIdentifier::parse(buf),
        }
    }
}
