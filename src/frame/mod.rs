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
// Created Date: 2024/03/11 09:21:44

mod decoder;
mod flag;
mod kind;
mod listener;
pub mod payload;
mod state;
mod structure_decoder;
mod structures;

use std::cmp::Ordering;
use std::fmt;

use crate::buffer::DecodeBuffer;

pub use self::decoder::FrameDecoder;
pub use self::flag::Flag;
pub use self::kind::Kind;
pub use self::listener::FrameListener;
pub use self::state::FrameDecoderState;
pub use self::structure_decoder::StructureDecoder;
pub use self::structures::{
    AltSvcFields, FrameHeader, GoAwayFields, PingFields, PriorityFields, PriorityUpdateFields,
    PushPromiseFields, RstStreamFields, Setting, SettingFields, WindowUpdateFields, WireStructure,
};

pub const FRAME_HEADER_BYTES: usize = 9;

/// 默认的header最大长度值
pub const DEFAULT_SETTINGS_HEADER_TABLE_SIZE: usize = 4_096;

/// 最大的单帧大小
pub const MAX_MAX_FRAME_SIZE: u32 = (1 << 24) - 1;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StreamIdentifier(pub u32);

impl StreamIdentifier {
    /// Reads a 31-bit stream id, dropping the reserved high bit.
    /// Caller must have checked that 4 bytes remain.
    pub fn parse(buf: &mut DecodeBuffer<'_>) -> StreamIdentifier {
        StreamIdentifier(buf.decode_u31())
    }

    pub fn zero() -> StreamIdentifier {
        StreamIdentifier(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for StreamIdentifier {
    fn from(value: u32) -> Self {
        StreamIdentifier(value)
    }
}

impl Ord for StreamIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for StreamIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StreamIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An HTTP/2 error code, e.g. from RST_STREAM or GOAWAY. The fourteen
/// codes of RFC 7540 section 7 get named constants; anything else the peer
/// sends is kept as-is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    pub const NO_ERROR: ErrorCode = ErrorCode(0);
    pub const PROTOCOL_ERROR: ErrorCode = ErrorCode(1);
    pub const INTERNAL_ERROR: ErrorCode = ErrorCode(2);
    pub const FLOW_CONTROL_ERROR: ErrorCode = ErrorCode(3);
    pub const SETTINGS_TIMEOUT: ErrorCode = ErrorCode(4);
    pub const STREAM_CLOSED: ErrorCode = ErrorCode(5);
    pub const FRAME_SIZE_ERROR: ErrorCode = ErrorCode(6);
    pub const REFUSED_STREAM: ErrorCode = ErrorCode(7);
    pub const CANCEL: ErrorCode = ErrorCode(8);
    pub const COMPRESSION_ERROR: ErrorCode = ErrorCode(9);
    pub const CONNECT_ERROR: ErrorCode = ErrorCode(10);
    pub const ENHANCE_YOUR_CALM: ErrorCode = ErrorCode(11);
    pub const INADEQUATE_SECURITY: ErrorCode = ErrorCode(12);
    pub const HTTP_1_1_REQUIRED: ErrorCode = ErrorCode(13);

    pub fn parse(buf: &mut DecodeBuffer<'_>) -> ErrorCode {
        ErrorCode(buf.decode_u32())
    }

    pub fn description_str(&self) -> &'static str {
        match self.0 {
            0 => "no error",
            1 => "protocol error",
            2 => "internal error",
            3 => "flow control error",
            4 => "settings timeout",
            5 => "stream closed",
            6 => "frame size error",
            7 => "refused stream",
            8 => "cancel",
            9 => "compression error",
            10 => "connect error",
            11 => "enhance your calm",
            12 => "inadequate security",
            13 => "http/1.1 required",
            _ => "unknown error code",
        }
    }
}

impl From<u32> for ErrorCode {
    fn from(value: u32) -> Self {
        ErrorCode(value)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description_str())
    }
}
