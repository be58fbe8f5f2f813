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

//! Growth policy for the backing files.
//!
//! Small files grow geometrically to amortize the cost of frequent small
//! appends, large files grow to the next gibibyte boundary so that the
//! over-reservation stays bounded by a single GiB.

use crate::error::{Error, ErrorKind};

const GIB: u64 = 1024 * 1024 * 1024;

/// Computes the next size of a backing file of `current_size` bytes with
/// `available` bytes still unused, so that `needed` additional bytes fit.
///
/// The proposed size is clamped to `max_size`. Clamping before the final
/// sufficiency check is what makes `max_size` a hard bound rather than a
/// hint: when the clamped proposal still cannot hold the required bytes
/// this fails with `NotEnoughSpace`.
pub fn next_size(current_size: u64, available: u64, needed: u64, max_size: u64) -> Result<u64, Error> {
	let required = current_size + needed - available;

	let mut new_size = if required < GIB {
		(current_size + needed) * 3 / 2
	} else {
		((current_size + needed) / GIB + 1) * GIB
	};

	if new_size > max_size {
		new_size = max_size;
	}

	if required > new_size {
		return Err(ErrorKind::NotEnoughSpace.into());
	}

	Ok(new_size)
}
