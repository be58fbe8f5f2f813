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

//! The log engine. Coordinates the growth policy, the mmap-backed file
//! pair and the index codec under a single reader/writer lock.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::u64;

use crate::error::{Error, ErrorKind};
use crate::growth;
use crate::index;
use crate::types::MmapFile;

/// Entry key with a fixed eight byte big-endian representation on disk.
///
/// Implemented for `u64`; callers that want type-safe keys can implement
/// it for a newtype wrapper without changing the wire format.
pub trait Key: Copy + Ord {
	/// Raw value written to the index file.
	fn to_u64(self) -> u64;
	/// Rebuilds the key from its on-disk value.
	fn from_u64(raw: u64) -> Self;
}

impl Key for u64 {
	fn to_u64(self) -> u64 {
		self
	}

	fn from_u64(raw: u64) -> u64 {
		raw
	}
}

/// Options accepted when opening a state log.
#[derive(Clone, Copy, Debug)]
pub struct Options {
	/// Accept appended keys that skip values instead of requiring each key
	/// to be exactly one above the previous one.
	pub allow_gaps: bool,
	/// Hard cap in bytes on the data file length. Opening fails when the
	/// data file already exceeds it, appends fail with `NotEnoughSpace`
	/// when no sufficient growth fits under it.
	pub max_size: u64,
}

impl Default for Options {
	fn default() -> Options {
		Options {
			allow_gaps: false,
			max_size: u64::MAX,
		}
	}
}

#[derive(Debug)]
struct Inner {
	data: MmapFile,
	index: MmapFile,
}

/// An append-only log of `(key, payload)` entries over two mmapped files:
/// payload bytes concatenated in the data file, `(key, end_offset)`
/// records behind a count header in the index file.
///
/// All operations are thread-safe. Appends and compaction take the writer
/// side of one lock, lookups the reader side; a lookup visitor runs under
/// the shared lock, so a long-running visitor blocks writers.
#[derive(Debug)]
pub struct StateLog<K> {
	path: PathBuf,
	options: Options,
	inner: RwLock<Inner>,
	_marker: PhantomData<K>,
}

impl<K> StateLog<K>
where
	K: Key,
{
	/// Open (or create) the state log at the provided path on disk. The
	/// parallel index file lives next to it at the same path with an
	/// `.idx` suffix.
	pub fn open<P>(path: P, options: Options) -> Result<StateLog<K>, Error>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();

		let data = MmapFile::open(path, 1, 1)?;
		if data.len() > options.max_size {
			return Err(ErrorKind::NotEnoughSpace.into());
		}

		let mut index_path = path.as_os_str().to_os_string();
		index_path.push(".idx");
		let index = MmapFile::open(Path::new(&index_path), 16, 8)?;

		let count = index::read_count(index.as_slice());
		debug!(
			"state log {:?}: opened with {} entries, {} data bytes mapped",
			path,
			count,
			data.len()
		);

		Ok(StateLog {
			path: path.to_path_buf(),
			options,
			inner: RwLock::new(Inner { data, index }),
			_marker: PhantomData,
		})
	}

	/// Appends an entry. Keys must be strictly increasing and, unless the
	/// log was opened with `allow_gaps`, consecutive. Grows the backing
	/// files per the growth policy when the payload or the new index
	/// record do not fit into the reserved tail bytes.
	pub fn append(&self, key: K, data: &[u8]) -> Result<(), Error> {
		let mut inner = self.inner.write().unwrap();

		let count = index::read_count(inner.index.as_slice());
		let mut last_end = 0;
		if count > 0 {
			let (last_key, end) = index::read_record(inner.index.as_slice(), count - 1);
			if key.to_u64() <= last_key {
				return Err(ErrorKind::IndexMustBeIncreasing.into());
			}
			if !self.options.allow_gaps && key.to_u64() != last_key + 1 {
				return Err(ErrorKind::IndexGapsAreNotAllowed.into());
			}
			last_end = end;
		}

		// The data file grows even on an exact fit, the byte at last_end
		// counts as spoken for in this accounting.
		let available = inner.data.len() - last_end;
		if available <= data.len() as u64 {
			let new_size = growth::next_size(
				inner.data.len(),
				available,
				data.len() as u64,
				self.options.max_size,
			)?;
			trace!(
				"state log {:?}: growing data file to {} bytes",
				self.path, new_size
			);
			inner.data.resize(new_size)?;
		}

		// The index file grows under its own unbounded policy.
		let index_used = index::COUNT_SIZE + count * index::RECORD_SIZE;
		let index_available = inner.index.len() - index_used;
		if index_available < index::RECORD_SIZE {
			let new_size =
				growth::next_size(inner.index.len(), index_available, index::RECORD_SIZE, u64::MAX)?;
			trace!(
				"state log {:?}: growing index file to {} bytes",
				self.path, new_size
			);
			inner.index.resize(new_size)?;
		}

		{
			let mut map = inner.data.map_mut()?;
			map[last_end as usize..last_end as usize + data.len()].copy_from_slice(data);
		}

		let new_end = last_end + data.len() as u64;

		// Commit point: the record bytes land before the count header
		// moves, so no reader can ever observe a half-written record.
		let mut map = inner.index.map_mut()?;
		index::write_record(&mut map, count, key.to_u64(), new_end);
		index::write_count(&mut map, count + 1);

		Ok(())
	}

	/// Looks the entry up by key and passes its payload bytes to the
	/// visitor without copying them. The slice borrows from the mapping
	/// and is only valid for the duration of the call; the visitor result
	/// is propagated.
	pub fn read<T, F>(&self, key: K, visitor: F) -> Result<T, Error>
	where
		F: FnOnce(&[u8]) -> Result<T, Error>,
	{
		let inner = self.inner.read().unwrap();

		let view = inner.index.as_slice();
		let count = index::read_count(view);

		let pos = match index::search(view, count, key.to_u64()) {
			Some(pos) => pos,
			None => return Err(ErrorKind::NotFound.into()),
		};

		let (_, end) = index::read_record(view, pos);
		let start = if pos == 0 {
			0
		} else {
			index::read_record(view, pos - 1).1
		};

		visitor(&inner.data.as_slice()[start as usize..end as usize])
	}

	/// Whether the log holds no entries.
	pub fn is_empty(&self) -> bool {
		self.count() == 0
	}

	/// Number of entries in the log.
	pub fn count(&self) -> u64 {
		let inner = self.inner.read().unwrap();
		index::read_count(inner.index.as_slice())
	}

	/// Key of the first entry, or the `u64::MAX` sentinel when the log is
	/// empty.
	pub fn first_key(&self) -> K {
		let inner = self.inner.read().unwrap();
		let view = inner.index.as_slice();
		if index::read_count(view) == 0 {
			return K::from_u64(u64::MAX);
		}
		K::from_u64(index::read_record(view, 0).0)
	}

	/// Key of the last entry, or the `u64::MAX` sentinel when the log is
	/// empty.
	pub fn last_key(&self) -> K {
		let inner = self.inner.read().unwrap();
		let view = inner.index.as_slice();
		let count = index::read_count(view);
		if count == 0 {
			return K::from_u64(u64::MAX);
		}
		K::from_u64(index::read_record(view, count - 1).0)
	}

	/// Truncates both files to their minimal size, releasing all reserved
	/// tail bytes so the log can be archived without padding. Entries and
	/// count are unchanged and the log stays fully usable, subsequent
	/// appends simply re-grow the files.
	pub fn compact(&self) -> Result<(), Error> {
		let mut inner = self.inner.write().unwrap();

		let count = index::read_count(inner.index.as_slice());

		// Keep the 1 byte floor, zero-length mappings are invalid on some
		// platforms.
		let used_data = if count == 0 {
			1
		} else {
			index::read_record(inner.index.as_slice(), count - 1).1
		};
		if inner.data.len() > used_data {
			inner.data.resize(used_data)?;
		}

		let used_index = index::COUNT_SIZE + count * index::RECORD_SIZE;
		if inner.index.len() > used_index {
			inner.index.resize(used_index)?;
		}

		debug!(
			"state log {:?}: compacted to {} data bytes, {} index bytes",
			self.path, used_data, used_index
		);

		Ok(())
	}

	/// Syncs both backing files to disk (fsync). The log itself never
	/// initiates a flush; durability is whatever the OS page cache plus
	/// this explicit call provide.
	pub fn sync(&self) -> Result<(), Error> {
		let inner = self.inner.read().unwrap();
		inner.data.sync()?;
		inner.index.sync()?;
		Ok(())
	}

	/// Path of the data file this log was opened at.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Consumes the handle, dropping both mappings and both file
	/// descriptors.
	pub fn close(self) -> Result<(), Error> {
		let inner = self.inner.into_inner().unwrap();
		drop(inner.index);
		drop(inner.data);
		Ok(())
	}
}
