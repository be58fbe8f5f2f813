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

use statelog_store::{Options, StateLog};

/// Prints path, first and last index and entry count of a state log.
pub fn info_command(args: &ArgMatches<'_>) -> i32 {
	let state_file = args.value_of("state").unwrap();

	let log: StateLog<u64> = match StateLog::open(state_file, Options::default()) {
		Ok(log) => log,
		Err(e) => {
			eprintln!("could not open state file: {}", e);
			return 1;
		}
	};

	println!("state file: {}", state_file);
	println!("first index: {}", log.first_key());
	println!("last index: {}", log.last_key());
	println!("count: {}", log.count());

	0
}
