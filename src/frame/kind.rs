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
// Created Date: 2024/03/11 09:47:02

/// The frame type tag from the frame header. Values the protocol does not
/// define are preserved in `Unknown` so that the payload can still be
/// routed (and discarded) per RFC 7540 section 4.1.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Kind {
    #[default]
    Data,
    Headers,
    Priority,
    Reset,
    Settings,
    PushPromise,
    Ping,
    GoAway,
    WindowUpdate,
    Continuation,
    AltSvc,
    PriorityUpdate,
    Unknown(u8),
}

impl Kind {
    pub fn new(byte: u8) -> Kind {
        match byte {
            0 => Kind::Data,
            1 => Kind::Headers,
            2 => Kind::Priority,
            3 => Kind::Reset,
            4 => Kind::Settings,
            5 => Kind::PushPromise,
            6 => Kind::Ping,
            7 => Kind::GoAway,
            8 => Kind::WindowUpdate,
            9 => Kind::Continuation,
            10 => Kind::AltSvc,
            16 => Kind::PriorityUpdate,
            other => Kind::Unknown(other),
        }
    }

    pub fn encode(&self) -> u8 {
        match *self {
            Kind::Data => 0,
            Kind::Headers => 1,
            Kind::Priority => 2,
            Kind::Reset => 3,
            Kind::Settings => 4,
            Kind::PushPromise => 5,
            Kind::Ping => 6,
            Kind::GoAway => 7,
            Kind::WindowUpdate => 8,
            Kind::Continuation => 9,
            Kind::AltSvc => 10,
            Kind::PriorityUpdate => 16,
            Kind::Unknown(v) => v,
        }
    }

    /// The frame types whose payload may carry padding.
    pub fn is_paddable(&self) -> bool {
        matches!(self, Kind::Data | Kind::Headers | Kind::PushPromise)
    }
}
