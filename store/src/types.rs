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

//! Common storage-related types.
use memmap;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind};

/// Wrapper for a file whose reads are backed by a memory map (mmap(2)),
/// relying on the operating system for fast access and caching. The map
/// always covers the whole file and is recreated whenever the file grows
/// or shrinks. Writes go through short-lived writable mappings of the same
/// file; the OS page cache makes them visible through the read-only map
/// without any explicit synchronization.
#[derive(Debug)]
pub struct MmapFile {
	path: PathBuf,
	file: File,

	// None only transiently while the file is being resized.
	mmap: Option<memmap::Mmap>,
}

impl MmapFile {
	/// Open (or create) the file at the provided path and map it read-only.
	///
	/// A file shorter than `min_size` bytes is first extended (or cut back)
	/// to `bootstrap_size` bytes. Zero-length mappings are rejected on some
	/// platforms so every file keeps a small floor size.
	pub fn open(path: &Path, min_size: u64, bootstrap_size: u64) -> Result<MmapFile, Error> {
		let file = OpenOptions::new()
			.read(true)
			.write(true)
			.create(true)
			.open(path)
			.map_err(|e| ErrorKind::Io(format!("could not open file {:?}: {}", path, e)))?;

		let size = file
			.metadata()
			.map_err(|e| ErrorKind::Io(format!("could not stat file {:?}: {}", path, e)))?
			.len();

		if size < min_size {
			file.set_len(bootstrap_size).map_err(|e| {
				ErrorKind::Io(format!(
					"failed extending file {:?} to {} bytes: {}",
					path, bootstrap_size, e
				))
			})?;
		}

		let mmap = unsafe { memmap::Mmap::map(&file) }
			.map_err(|e| ErrorKind::Io(format!("could not create read only mmap of {:?}: {}", path, e)))?;

		Ok(MmapFile {
			path: path.to_path_buf(),
			file,
			mmap: Some(mmap),
		})
	}

	/// Length in bytes of the current mapping (always the file length).
	pub fn len(&self) -> u64 {
		match self.mmap {
			Some(ref mmap) => mmap.len() as u64,
			None => 0,
		}
	}

	/// The mapped file contents.
	pub fn as_slice(&self) -> &[u8] {
		match self.mmap {
			Some(ref mmap) => &mmap[..],
			None => &[],
		}
	}

	/// Changes the file length and replaces the read-only mapping with a
	/// fresh one covering the resized file. Used both for growing and for
	/// cutting off reserved tail bytes.
	pub fn resize(&mut self, new_size: u64) -> Result<(), Error> {
		// Drop the mapping before changing the file length, windows throws
		// an access error otherwise.
		self.mmap = None;

		self.file.set_len(new_size).map_err(|e| {
			ErrorKind::Io(format!(
				"could not truncate file {:?} to {} bytes: {}",
				self.path, new_size, e
			))
		})?;

		let mmap = unsafe { memmap::Mmap::map(&self.file) }.map_err(|e| {
			ErrorKind::Io(format!(
				"could not re-create read only mmap of {:?}: {}",
				self.path, e
			))
		})?;
		self.mmap = Some(mmap);

		Ok(())
	}

	/// Creates a short-lived writable mapping of the whole file. The caller
	/// performs its byte copies and drops the mapping again; the read-only
	/// map keeps observing the same pages.
	pub fn map_mut(&self) -> Result<memmap::MmapMut, Error> {
		let mmap = unsafe { memmap::MmapMut::map_mut(&self.file) }.map_err(|e| {
			ErrorKind::Io(format!(
				"could not create read write mmap of {:?}: {}",
				self.path, e
			))
		})?;
		Ok(mmap)
	}

	/// Syncs file contents to disk (fsync). The log never syncs on its own,
	/// this only runs on explicit caller request.
	pub fn sync(&self) -> Result<(), Error> {
		self.file
			.sync_all()
			.map_err(|e| ErrorKind::Io(format!("could not sync file {:?}: {}", self.path, e)))?;
		Ok(())
	}

	/// Path of the underlying file.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn bootstraps_short_files() {
		let dir = tempdir().unwrap();

		// data-file style floor: anything below 1 byte becomes 1 byte
		let data = MmapFile::open(&dir.path().join("data"), 1, 1).unwrap();
		assert_eq!(data.len(), 1);

		// index-file style bootstrap: files shorter than the first record
		// boundary are cut back to the bare count header
		let index = MmapFile::open(&dir.path().join("index"), 16, 8).unwrap();
		assert_eq!(index.len(), 8);
	}

	#[test]
	fn leaves_large_enough_files_alone() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("data");
		std::fs::write(&path, vec![7; 32]).unwrap();

		let file = MmapFile::open(&path, 1, 1).unwrap();
		assert_eq!(file.len(), 32);
		assert_eq!(file.as_slice(), &[7; 32][..]);
	}

	#[test]
	fn writes_become_visible_through_the_read_only_map() {
		let dir = tempdir().unwrap();
		let file = MmapFile::open(&dir.path().join("data"), 8, 8).unwrap();

		let mut map = file.map_mut().unwrap();
		map[..4].copy_from_slice(&[1, 2, 3, 4]);
		drop(map);

		assert_eq!(&file.as_slice()[..4], &[1, 2, 3, 4]);
	}

	#[test]
	fn resize_replaces_the_mapping() {
		let dir = tempdir().unwrap();
		let mut file = MmapFile::open(&dir.path().join("data"), 1, 1).unwrap();

		file.resize(64).unwrap();
		assert_eq!(file.len(), 64);
		assert_eq!(std::fs::metadata(file.path()).unwrap().len(), 64);

		file.resize(16).unwrap();
		assert_eq!(file.len(), 16);
	}
}
