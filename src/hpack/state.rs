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
// Created Date: 2024/03/14 16:31:22

use crate::frame::DEFAULT_SETTINGS_HEADER_TABLE_SIZE;

use super::entry_type::HpackEntryType;
use super::error::HpackError;
use super::header_index::HeaderIndex;
use super::string_buffer::HpackStringBuffer;

/// Receives fully resolved headers, i.e. after indices have been looked
/// up in the static and dynamic tables. A name that maps to several
/// values arrives as several calls; no joining happens at this level.
pub trait HpackListener {
    fn on_header_list_start(&mut self) {}

    fn on_header(&mut self, name: &[u8], value: &[u8]);

    fn on_header_list_end(&mut self) {}

    /// Reported at most once per block; no further callbacks follow it.
    fn on_header_error_detected(&mut self, error: HpackError) {
        let _ = error;
    }
}

/// The HPACK decompressor state proper: the tables, and the bookkeeping
/// for the dynamic-table-size-update rules of RFC 7541 section 4.2.
#[derive(Debug)]
pub struct HpackDecoderState {
    tables: HeaderIndex,

    /// The most recent SETTINGS_HEADER_TABLE_SIZE the peer acknowledged.
    final_limit: u32,

    /// The lowest acknowledged value since the last HPACK block; the
    /// first size update of a block must come down to at least this.
    lowest_limit: u32,

    /// Must the next (first) entry be a dynamic table size update?
    require_size_update: bool,

    /// May the next (first or second) entry be a size update?
    allow_size_update: bool,

    /// Seen one size update already in this block?
    saw_size_update: bool,

    error: Option<HpackError>,
}

impl Default for HpackDecoderState {
    fn default() -> Self {
        HpackDecoderState {
            tables: HeaderIndex::new(),
            final_limit: DEFAULT_SETTINGS_HEADER_TABLE_SIZE as u32,
            lowest_limit: DEFAULT_SETTINGS_HEADER_TABLE_SIZE as u32,
            require_size_update: false,
            allow_size_update: false,
            saw_size_update: false,
            error: None,
        }
    }
}

impl HpackDecoderState {
    pub fn new() -> HpackDecoderState {
        HpackDecoderState::default()
    }

    /// Call once per acknowledged SETTINGS_HEADER_TABLE_SIZE value, in
    /// the order the values were sent, between decoding the SETTINGS ACK
    /// and the next HPACK block. Both the lowest and the final value are
    /// tracked; the size-update rules need both.
    pub fn apply_header_table_size_setting(&mut self, limit: u32) {
        self.lowest_limit = self.lowest_limit.min(limit);
        self.final_limit = limit;
    }

    pub fn header_table_size_setting(&self) -> u32 {
        self.final_limit
    }

    /// Out-of-band configuration of the dynamic table limit, for the case
    /// where both endpoints agreed on a size before any HPACK traffic
    /// (e.g. our initial SETTINGS). Adjusts the table directly; no size
    /// update entry is demanded of the encoder.
    pub fn set_header_table_size(&mut self, limit: u32) {
        self.tables.size_update(limit as usize);
        self.final_limit = limit;
        self.lowest_limit = limit;
    }

    pub fn dynamic_table_size(&self) -> usize {
        self.tables.current_size()
    }

    pub fn error(&self) -> Option<HpackError> {
        self.error
    }

    pub fn on_header_block_start<L: HpackListener>(&mut self, listener: &mut L) {
        // An errored instance can't be reused; the encoder's and our
        // notion of the dynamic table are no longer in sync.
        debug_assert!(self.error.is_none());
        debug_assert!(self.lowest_limit <= self.final_limit);
        self.allow_size_update = true;
        self.saw_size_update = false;
        // If the peer acknowledged a size below what the table currently
        // allows, it must prove it has shrunk the table.
        self.require_size_update = (self.lowest_limit as usize) < self.tables.size_limit()
            || (self.final_limit as usize) < self.tables.size_limit();
        listener.on_header_list_start();
    }

    pub fn on_indexed_header<L: HpackListener>(&mut self, index: u32, listener: &mut L) {
        if self.error.is_some() {
            return;
        }
        if self.require_size_update {
            self.report_error(HpackError::MissingDynamicTableSizeUpdate, listener);
            return;
        }
        self.allow_size_update = false;
        match self.tables.lookup(index as usize) {
            Some((name, value)) => listener.on_header(name, value),
            None => self.report_error(HpackError::InvalidIndex, listener),
        }
    }

    pub fn on_name_index_and_literal_value<L: HpackListener>(
        &mut self,
        entry_type: HpackEntryType,
        name_index: u32,
        value_buffer: &mut HpackStringBuffer,
        listener: &mut L,
    ) {
        if self.error.is_some() {
            return;
        }
        if self.require_size_update {
            self.report_error(HpackError::MissingDynamicTableSizeUpdate, listener);
            return;
        }
        self.allow_size_update = false;
        let name = match self.tables.lookup(name_index as usize) {
            Some((name, _)) => name.to_vec(),
            None => {
                self.report_error(HpackError::InvalidNameIndex, listener);
                return;
            }
        };
        let value = value_buffer.release();
        listener.on_header(&name, &value);
        if entry_type == HpackEntryType::IndexedLiteralHeader {
            self.tables.insert(name, value);
        }
    }

    pub fn on_literal_name_and_value<L: HpackListener>(
        &mut self,
        entry_type: HpackEntryType,
        name_buffer: &mut HpackStringBuffer,
        value_buffer: &mut HpackStringBuffer,
        listener: &mut L,
    ) {
        if self.error.is_some() {
            return;
        }
        if self.require_size_update {
            self.report_error(HpackError::MissingDynamicTableSizeUpdate, listener);
            return;
        }
        self.allow_size_update = false;
        let name = name_buffer.release();
        let value = value_buffer.release();
        listener.on_header(&name, &value);
        if entry_type == HpackEntryType::IndexedLiteralHeader {
            self.tables.insert(name, value);
        }
    }

    pub fn on_dynamic_table_size_update<L: HpackListener>(&mut self, size: u32, listener: &mut L) {
        if self.error.is_some() {
            return;
        }
        if !self.allow_size_update {
            // Either past the initial run of updates, or a third one.
            self.report_error(HpackError::DynamicTableSizeUpdateNotAllowed, listener);
            return;
        }
        if size > self.final_limit {
            self.report_error(
                HpackError::DynamicTableSizeUpdateIsAboveAcknowledgedSetting,
                listener,
            );
            return;
        }
        if self.require_size_update {
            // The first update must come down to the low water mark.
            if size > self.lowest_limit {
                self.report_error(
                    HpackError::InitialDynamicTableSizeUpdateIsAboveLowWaterMark,
                    listener,
                );
                return;
            }
            self.require_size_update = false;
        }
        self.tables.size_update(size as usize);
        if self.saw_size_update {
            self.allow_size_update = false;
        } else {
            self.saw_size_update = true;
        }
        // The low water mark only binds until a block has seen it.
        self.lowest_limit = self.final_limit;
    }

    pub fn on_header_block_end<L: HpackListener>(&mut self, listener: &mut L) {
        if self.error.is_some() {
            return;
        }
        if self.require_size_update {
            // A required size update never arrived.
            self.report_error(HpackError::MissingDynamicTableSizeUpdate, listener);
            return;
        }
        listener.on_header_list_end();
    }

    pub fn report_error<L: HpackListener>(&mut self, error: HpackError, listener: &mut L) {
        if self.error.is_none() {
            log::debug!("hpack decode error: {}", error);
            self.error = Some(error);
            listener.on_header_error_detected(error);
        }
    }
}
