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

//! Concatenation of adjacent state logs.
//!
//! Merging opens every input read-only, checks that their key ranges line
//! up back to back and streams all entries in key order into a fresh
//! output log through the engine's public read/append contract. The
//! inputs are by construction gap-free and strictly ordered, so the
//! output satisfies the same ordering invariants with unit key strides.

use std::path::Path;

use crate::error::{Error, ErrorKind};
use crate::state_log::{Options, StateLog};

/// Merges the state logs at `inputs` into a fresh log at `output_path`.
///
/// The inputs may be passed in any order; they are sorted by their first
/// key. Fails with `FilesAreNotAdjacent` unless every input starts exactly
/// one key after its predecessor ends. The output log is expected to be
/// empty.
pub fn merge<P>(inputs: &[P], output_path: P) -> Result<(), Error>
where
	P: AsRef<Path>,
{
	let mut logs: Vec<StateLog<u64>> = Vec::with_capacity(inputs.len());
	let mut failures: Vec<String> = vec![];
	for path in inputs {
		match StateLog::open(path, Options::default()) {
			Ok(log) => logs.push(log),
			Err(e) => failures.push(format!("{:?}: {}", path.as_ref(), e)),
		}
	}
	if !failures.is_empty() {
		return Err(ErrorKind::Io(format!(
			"could not open state files: {}",
			failures.join("; ")
		))
		.into());
	}

	logs.sort_by_key(|log| log.first_key());

	for pair in logs.windows(2) {
		// An empty log carries the max-value sentinel as its last key;
		// the wrapping add keeps it from ever passing as adjacent.
		if pair[0].last_key().wrapping_add(1) != pair[1].first_key() {
			return Err(ErrorKind::FilesAreNotAdjacent.into());
		}
	}

	let output: StateLog<u64> = StateLog::open(output_path, Options::default())?;

	for log in &logs {
		debug!(
			"merge: copying entries {}..={} from {:?}",
			log.first_key(),
			log.last_key(),
			log.path()
		);
		for key in log.first_key()..=log.last_key() {
			log.read(key, |data| output.append(key, data))
				.map_err(|e| ErrorKind::Io(format!("could not write {}: {}", key, e)))?;
		}
	}

	output.close()?;
	for log in logs {
		log.close()?;
	}

	Ok(())
}
