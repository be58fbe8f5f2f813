// Copyright 2019 The Statelog Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Codec for the index file.
//!
//! Layout: an 8 byte big-endian count header followed by fixed-width
//! 16 byte records. Each record holds the entry key and the exclusive
//! offset in the data file where the entry payload ends. Bytes past the
//! last record are reserved padding and never interpreted.

use byteorder::{BigEndian, ByteOrder};

/// Size in bytes of the count header.
pub const COUNT_SIZE: u64 = 8;
/// Size in bytes of a single `(key, end_offset)` record.
pub const RECORD_SIZE: u64 = 16;

/// Number of committed entries, from the count header.
pub fn read_count(view: &[u8]) -> u64 {
	BigEndian::read_u64(&view[..COUNT_SIZE as usize])
}

/// Overwrites the count header. This is the commit point of an append and
/// must happen after the record itself has been written.
pub fn write_count(view: &mut [u8], count: u64) {
	BigEndian::write_u64(&mut view[..COUNT_SIZE as usize], count);
}

/// Key and exclusive data-file end offset of the record at `pos`.
pub fn read_record(view: &[u8], pos: u64) -> (u64, u64) {
	let offset = (COUNT_SIZE + pos * RECORD_SIZE) as usize;
	let key = BigEndian::read_u64(&view[offset..offset + 8]);
	let end_offset = BigEndian::read_u64(&view[offset + 8..offset + 16]);
	(key, end_offset)
}

/// Writes the record at `pos` in place.
pub fn write_record(view: &mut [u8], pos: u64, key: u64, end_offset: u64) {
	let offset = (COUNT_SIZE + pos * RECORD_SIZE) as usize;
	BigEndian::write_u64(&mut view[offset..offset + 8], key);
	BigEndian::write_u64(&mut view[offset + 8..offset + 16], end_offset);
}

/// Binary search over the first `count` records for `key`.
/// Record keys are strictly increasing so the search is by key only;
/// callers do not need an insertion position for absent keys.
pub fn search(view: &[u8], count: u64, key: u64) -> Option<u64> {
	let mut lo = 0;
	let mut hi = count;
	while lo < hi {
		let mid = lo + (hi - lo) / 2;
		let (mid_key, _) = read_record(view, mid);
		if mid_key < key {
			lo = mid + 1;
		} else {
			hi = mid;
		}
	}
	if lo < count && read_record(view, lo).0 == key {
		Some(lo)
	} else {
		None
	}
}
