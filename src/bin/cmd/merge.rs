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

use clap::ArgMatches;

use statelog_store::merge;

/// Merges the given adjacent state logs into a fresh output log.
pub fn merge_command(args: &ArgMatches<'_>) -> i32 {
	let input_files: Vec<&str> = args.values_of("input-files").unwrap().collect();
	let output_file = args.value_of("output-file").unwrap();

	if let Err(e) = merge(&input_files, output_file) {
		eprintln!("could not merge state files: {}", e);
		return 1;
	}

	0
}
