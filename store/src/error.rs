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

//! Errors that can be returned by the state log.
use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

/// Error definition
#[derive(Debug)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// State log error definitions
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// Read of a key that is not present in the log
	#[fail(display = "not found")]
	NotFound,
	/// Append with a key not greater than the last appended key
	#[fail(display = "index must be increasing")]
	IndexMustBeIncreasing,
	/// Append with a non-consecutive key while gaps are disallowed
	#[fail(display = "index gaps are not allowed")]
	IndexGapsAreNotAllowed,
	/// The size policy cannot grow a file within the configured maximum
	#[fail(display = "not enough space")]
	NotEnoughSpace,
	/// Merge inputs whose key ranges do not line up back to back
	#[fail(display = "files are not adjacent")]
	FilesAreNotAdjacent,
	/// Failure in the underlying file or mapping plumbing, wrapped with
	/// the step that failed
	#[fail(display = "{}", _0)]
	Io(String),
}

impl Fail for Error {
	fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl Error {
	/// get kind
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}
