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
// Created Date: 2024/03/14 15:55:09

use std::collections::VecDeque;

use crate::frame::DEFAULT_SETTINGS_HEADER_TABLE_SIZE;

/// The fixed table of RFC 7541 Appendix A; one-based indices 1..=61.
pub static STATIC_TABLE: &[(&str, &str)] = &[
    (":authority", ""),
    (":method", "GET"),
    (":method", "POST"),
    (":path", "/"),
    (":path", "/index.html"),
    (":scheme", "http"),
    (":scheme", "https"),
    (":status", "200"),
    (":status", "204"),
    (":status", "206"),
    (":status", "304"),
    (":status", "400"),
    (":status", "404"),
    (":status", "500"),
    ("accept-charset", ""),
    ("accept-encoding", "gzip, deflate"),
    ("accept-language", ""),
    ("accept-ranges", ""),
    ("accept", ""),
    ("access-control-allow-origin", ""),
    ("age", ""),
    ("allow", ""),
    ("authorization", ""),
    ("cache-control", ""),
    ("content-disposition", ""),
    ("content-encoding", ""),
    ("content-language", ""),
    ("content-length", ""),
    ("content-location", ""),
    ("content-range", ""),
    ("content-type", ""),
    ("cookie", ""),
    ("date", ""),
    ("etag", ""),
    ("expect", ""),
    ("expires", ""),
    ("from", ""),
    ("host", ""),
    ("if-match", ""),
    ("if-modified-since", ""),
    ("if-none-match", ""),
    ("if-range", ""),
    ("if-unmodified-since", ""),
    ("last-modified", ""),
    ("link", ""),
    ("location", ""),
    ("max-forwards", ""),
    ("proxy-authenticate", ""),
    ("proxy-authorization", ""),
    ("range", ""),
    ("referer", ""),
    ("refresh", ""),
    ("retry-after", ""),
    ("server", ""),
    ("set-cookie", ""),
    ("strict-transport-security", ""),
    ("transfer-encoding", ""),
    ("user-agent", ""),
    ("vary", ""),
    ("via", ""),
    ("www-authenticate", ""),
];

/// Index of the most recently inserted dynamic entry.
pub const FIRST_DYNAMIC_INDEX: usize = 62;

/// Per RFC 7541 section 4.1 every entry costs its name and value lengths
/// plus 32 bytes of overhead.
const ENTRY_OVERHEAD: usize = 32;

fn entry_size(name: &[u8], value: &[u8]) -> usize {
    name.len() + value.len() + ENTRY_OVERHEAD
}

/// The decoder's view of the HPACK index address space: the static table
/// at indices 1..=61 and the FIFO dynamic table behind it, newest first.
/// Also owns the size accounting and eviction.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    table: VecDeque<(Vec<u8>, Vec<u8>)>,
    size: usize,
    size_limit: usize,
}

impl Default for HeaderIndex {
    fn default() -> Self {
        HeaderIndex::new()
    }
}

impl HeaderIndex {
    pub fn new() -> HeaderIndex {
        HeaderIndex::with_size_limit(DEFAULT_SETTINGS_HEADER_TABLE_SIZE)
    }

    fn with_size_limit(size_limit: usize) -> HeaderIndex {
        HeaderIndex {
            table: VecDeque::new(),
            size: 0,
            size_limit,
        }
    }

    /// Resolves a one-based index against the static then dynamic table.
    /// Index 0 is reserved by the encoding and yields `None`.
    pub fn lookup(&self, index: usize) -> Option<(&[u8], &[u8])> {
        if index == 0 {
            return None;
        }
        if index < FIRST_DYNAMIC_INDEX {
            let (name, value) = STATIC_TABLE[index - 1];
            Some((name.as_bytes(), value.as_bytes()))
        } else {
            self.table
                .get(index - FIRST_DYNAMIC_INDEX)
                .map(|(name, value)| (name.as_slice(), value.as_slice()))
        }
    }

    /// Current size of the dynamic table in octets, as defined by the
    /// IETF HPACK spec.
    pub fn current_size(&self) -> usize {
        self.size
    }

    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    /// Number of dynamic entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Applies a dynamic table size update, evicting from the back until
    /// the table fits.
    pub fn size_update(&mut self, size_limit: usize) {
        self.evict_down_to(size_limit);
        self.size_limit = size_limit;
    }

    /// Inserts at the front, evicting as needed. An entry that by itself
    /// exceeds the size limit empties the table and is not inserted,
    /// which per RFC 7541 section 4.4 is not an error.
    pub fn insert(&mut self, name: Vec<u8>, value: Vec<u8>) {
        let entry_size = entry_size(&name, &value);
        if entry_size > self.size_limit {
            self.table.clear();
            self.size = 0;
            return;
        }
        self.evict_down_to(self.size_limit - entry_size);
        self.size += entry_size;
        self.table.push_front((name, value));
    }

    fn evict_down_to(&mut self, limit: usize) {
        while self.size > limit {
            let (name, value) = self
                .table
                .pop_back()
                .unwrap_or_else(|| unreachable!("table size nonzero but no entries"));
            self.size -= entry_size(&name, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(index: &mut HeaderIndex, name: &str, value: &str) {
        index.insert(name.as_bytes().to_vec(), value.as_bytes().to_vec());
    }

    #[test]
    fn test_static_lookup() {
        let index = HeaderIndex::new();
        assert_eq!(index.lookup(0), None);
        assert_eq!(index.lookup(2), Some((&b":method"[..], &b"GET"[..])));
        assert_eq!(index.lookup(61), Some((&b"www-authenticate"[..], &b""[..])));
        assert_eq!(index.lookup(62), None);
    }

    #[test]
    fn test_dynamic_lookup_newest_first() {
        let mut index = HeaderIndex::new();
        insert(&mut index, "a", "1");
        insert(&mut index, "b", "2");
        assert_eq!(index.lookup(62), Some((&b"b"[..], &b"2"[..])));
        assert_eq!(index.lookup(63), Some((&b"a"[..], &b"1"[..])));
        assert_eq!(index.lookup(64), None);
        assert_eq!(index.current_size(), 2 * (32 + 2));
    }

    #[test]
    fn test_eviction_on_insert() {
        let mut index = HeaderIndex::new();
        index.size_update(2 * 34);
        insert(&mut index, "a", "1");
        insert(&mut index, "b", "2");
        insert(&mut index, "c", "3");
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup(62), Some((&b"c"[..], &b"3"[..])));
        assert_eq!(index.lookup(63), Some((&b"b"[..], &b"2"[..])));
    }

    #[test]
    fn test_oversized_entry_clears_table() {
        let mut index = HeaderIndex::new();
        index.size_update(40);
        insert(&mut index, "a", "1");
        assert_eq!(index.len(), 1);
        insert(&mut index, "name", "much too large for the table");
        assert!(index.is_empty());
        assert_eq!(index.current_size(), 0);
    }

    #[test]
    fn test_size_update_evicts() {
        let mut index = HeaderIndex::new();
        insert(&mut index, "a", "1");
        insert(&mut index, "b", "2");
        index.size_update(34);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(62), Some((&b"b"[..], &b"2"[..])));
        index.size_update(0);
        assert!(index.is_empty());
    }
}
