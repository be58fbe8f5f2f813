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

//! Main for building the command line binary of the state log tools.

#[macro_use]
extern crate clap;

use std::process::exit;

use clap::{App, AppSettings, Arg, SubCommand};

mod cmd;

fn main() {
	env_logger::init();

	let args = App::new("statelog")
		.version(crate_version!())
		.about("Tools for append-only, monotonically-indexed state logs")
		.setting(AppSettings::SubcommandRequiredElseHelp)
		.subcommand(
			SubCommand::with_name("info")
				.about("Prints a summary of a state log")
				.arg(
					Arg::with_name("state")
						.long("state")
						.help("Path to the state log data file")
						.env("STATE")
						.takes_value(true)
						.required(true),
				),
		)
		.subcommand(
			SubCommand::with_name("truncate")
				.about("Truncates the data and index file to the minimal size")
				.arg(
					Arg::with_name("state")
						.long("state")
						.help("Path to the state log data file")
						.env("STATE")
						.takes_value(true)
						.required(true),
				),
		)
		.subcommand(
			SubCommand::with_name("merge")
				.about("Merges adjacent state logs into a single output log")
				.arg(
					Arg::with_name("input-files")
						.long("input-files")
						.help("Comma separated paths of the state logs to merge")
						.env("INPUT_FILES")
						.takes_value(true)
						.use_delimiter(true)
						.required(true),
				)
				.arg(
					Arg::with_name("output-file")
						.long("output-file")
						.help("Path of the state log to merge into")
						.env("OUTPUT_FILE")
						.takes_value(true)
						.required(true),
				),
		)
		.get_matches();

	let retval = match args.subcommand() {
		("info", Some(info_args)) => cmd::info_command(info_args),
		("truncate", Some(truncate_args)) => cmd::truncate_command(truncate_args),
		("merge", Some(merge_args)) => cmd::merge_command(merge_args),
		_ => 0,
	};
	exit(retval);
}
