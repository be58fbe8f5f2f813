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

use std::path::Path;

use tempfile::TempDir;

use statelog_store::{merge, Error, ErrorKind, Options, StateLog};

fn setup() -> TempDir {
	tempfile::tempdir().unwrap()
}

fn make_log(path: &Path, entries: &[(u64, &[u8])]) {
	let log: StateLog<u64> = StateLog::open(path, Options::default()).unwrap();
	for (key, payload) in entries {
		log.append(*key, payload).unwrap();
	}
	log.close().unwrap();
}

fn read_vec(log: &StateLog<u64>, key: u64) -> Result<Vec<u8>, Error> {
	log.read(key, |data| Ok(data.to_vec()))
}

#[test]
fn merges_adjacent_logs() {
	let dir = setup();
	let a = dir.path().join("a");
	let b = dir.path().join("b");
	let out = dir.path().join("out");
	make_log(&a, &[(1, b"a"), (2, b"b")]);
	make_log(&b, &[(3, b"c"), (4, b"d")]);

	merge(&[a.as_path(), b.as_path()], out.as_path()).unwrap();

	let merged: StateLog<u64> = StateLog::open(&out, Options::default()).unwrap();
	assert_eq!(merged.count(), 4);
	assert_eq!(merged.first_key(), 1);
	assert_eq!(merged.last_key(), 4);
	assert_eq!(read_vec(&merged, 1).unwrap(), b"a".to_vec());
	assert_eq!(read_vec(&merged, 2).unwrap(), b"b".to_vec());
	assert_eq!(read_vec(&merged, 3).unwrap(), b"c".to_vec());
	assert_eq!(read_vec(&merged, 4).unwrap(), b"d".to_vec());
}

#[test]
fn sorts_inputs_by_first_key() {
	let dir = setup();
	let a = dir.path().join("a");
	let b = dir.path().join("b");
	let c = dir.path().join("c");
	let out = dir.path().join("out");
	make_log(&a, &[(1, b"one")]);
	make_log(&b, &[(2, b"two"), (3, b"three")]);
	make_log(&c, &[(4, b"four")]);

	// deliberately out of order
	merge(&[c.as_path(), a.as_path(), b.as_path()], out.as_path()).unwrap();

	let merged: StateLog<u64> = StateLog::open(&out, Options::default()).unwrap();
	assert_eq!(merged.count(), 4);
	assert_eq!(merged.first_key(), 1);
	assert_eq!(merged.last_key(), 4);
	assert_eq!(read_vec(&merged, 3).unwrap(), b"three".to_vec());
}

#[test]
fn rejects_inputs_with_a_key_gap() {
	let dir = setup();
	let a = dir.path().join("a");
	let d = dir.path().join("d");
	let out = dir.path().join("out");
	make_log(&a, &[(1, b"a"), (2, b"b")]);
	make_log(&d, &[(4, b"e")]);

	let err = merge(&[a.as_path(), d.as_path()], out.as_path()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::FilesAreNotAdjacent);
}

#[test]
fn rejects_overlapping_inputs() {
	let dir = setup();
	let a = dir.path().join("a");
	let e = dir.path().join("e");
	let out = dir.path().join("out");
	make_log(&a, &[(1, b"a"), (2, b"b")]);
	make_log(&e, &[(2, b"x"), (3, b"y")]);

	let err = merge(&[a.as_path(), e.as_path()], out.as_path()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::FilesAreNotAdjacent);
}

#[test]
fn accumulates_open_failures() {
	let dir = setup();
	let a = dir.path().join("a");
	let out = dir.path().join("out");
	make_log(&a, &[(1, b"a")]);

	// files inside a directory that does not exist cannot be created
	let missing = dir.path().join("no-such-dir").join("b");

	let err = merge(&[a.as_path(), missing.as_path()], out.as_path()).unwrap_err();
	match err.kind() {
		ErrorKind::Io(msg) => assert!(msg.starts_with("could not open state files")),
		kind => panic!("unexpected error kind: {:?}", kind),
	}
}

#[test]
fn merge_of_no_inputs_creates_an_empty_log() {
	let dir = setup();
	let out = dir.path().join("out");
	let inputs: Vec<&Path> = vec![];

	merge(&inputs, out.as_path()).unwrap();

	let merged: StateLog<u64> = StateLog::open(&out, Options::default()).unwrap();
	assert!(merged.is_empty());
}

#[test]
fn merged_output_is_gap_free_and_reusable() {
	let dir = setup();
	let a = dir.path().join("a");
	let b = dir.path().join("b");
	let out = dir.path().join("out");
	make_log(&a, &[(10, b"ten"), (11, b"eleven")]);
	make_log(&b, &[(12, b"twelve")]);

	merge(&[a.as_path(), b.as_path()], out.as_path()).unwrap();

	// appending to the merged log continues the key sequence
	let merged: StateLog<u64> = StateLog::open(&out, Options::default()).unwrap();
	merged.append(13, b"thirteen").unwrap();
	assert_eq!(merged.count(), 4);
	assert_eq!(read_vec(&merged, 13).unwrap(), b"thirteen".to_vec());
}

#[test]
fn single_input_merges_into_a_plain_copy() {
	let dir = setup();
	let a = dir.path().join("a");
	let out = dir.path().join("out");
	make_log(&a, &[(1, b"a")]);

	merge(&[a.as_path()], out.as_path()).unwrap();

	let merged: StateLog<u64> = StateLog::open(&out, Options::default()).unwrap();
	assert_eq!(merged.count(), 1);
	assert_eq!(read_vec(&merged, 1).unwrap(), b"a".to_vec());
}
