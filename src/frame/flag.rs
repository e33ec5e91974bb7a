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
// Created Date: 2024/03/11 10:02:17

use super::Kind;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Flag: u8 {
        const END_STREAM = 0x1;
        const ACK = 0x1;
        const END_HEADERS = 0x4;
        const PADDED = 0x8;
        const PRIORITY = 0x20;
    }
}

impl Flag {
    pub fn zero() -> Flag {
        Flag::default()
    }

    /// Wraps the raw flags byte without dropping any bits; which bits
    /// actually mean something depends on the frame type, see
    /// [`Flag::allowed_for`].
    pub fn load(byte: u8) -> Flag {
        Flag::from_bits_retain(byte)
    }

    /// The flag bits that RFC 7540 defines for the given frame type; the
    /// payload decoders mask the header flags down to this set before
    /// interpreting anything.
    pub fn allowed_for(kind: Kind) -> Flag {
        match kind {
            Kind::Data => Flag::END_STREAM | Flag::PADDED,
            Kind::Headers => Flag::END_STREAM | Flag::END_HEADERS | Flag::PADDED | Flag::PRIORITY,
            Kind::Settings | Kind::Ping => Flag::ACK,
            Kind::PushPromise => Flag::END_HEADERS | Flag::PADDED,
            Kind::Continuation => Flag::END_HEADERS,
            _ => Flag::zero(),
        }
    }

    pub fn ack() -> Flag {
        Flag::ACK
    }

    pub fn is_ack(&self) -> bool {
        self.contains(Flag::ACK)
    }

    pub fn end_stream() -> Flag {
        Flag::END_STREAM
    }

    pub fn is_end_stream(&self) -> bool {
        self.contains(Flag::END_STREAM)
    }

    pub fn end_headers() -> Flag {
        Flag::END_HEADERS
    }

    pub fn is_end_headers(&self) -> bool {
        self.contains(Flag::END_HEADERS)
    }

    pub fn set_end_headers(&mut self) {
        self.set(Flag::END_HEADERS, true)
    }

    pub fn padded() -> Flag {
        Flag::PADDED
    }

    pub fn is_padded(&self) -> bool {
        self.contains(Flag::PADDED)
    }

    pub fn set_padded(&mut self) {
        self.set(Flag::PADDED, true)
    }

    pub fn priority() -> Flag {
        Flag::PRIORITY
    }

    pub fn is_priority(&self) -> bool {
        self.contains(Flag::PRIORITY)
    }

    pub fn set_priority(&mut self) {
        self.set(Flag::PRIORITY, true)
    }

    pub fn set_end_stream(&mut self) {
        self.set(Flag::END_STREAM, true)
    }
}

impl Default for Flag {
    fn default() -> Self {
        Flag::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_keeps_undefined_bits() {
        let flag = Flag::load(0xff);
        assert_eq!(flag.bits(), 0xff);
        assert!(flag.is_padded());
    }

    #[test]
    fn test_allowed_for_masks() {
        assert_eq!(Flag::allowed_for(Kind::WindowUpdate), Flag::zero());
        assert_eq!(Flag::allowed_for(Kind::Data), Flag::END_STREAM | Flag::PADDED);
        assert_eq!(Flag::allowed_for(Kind::Continuation), Flag::END_HEADERS);
    }
}
