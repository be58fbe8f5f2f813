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

//! Append-only, monotonically-indexed byte-log backed by a pair of
//! memory-mapped files. One file holds the payload bytes of all entries
//! concatenated in insertion order, the other a parallel index of
//! `(key, end_offset)` records behind an entry count header.
//!
//! Typical use is as the on-disk substrate for a write-ahead log or a
//! replicated-state log: writers only ever append, readers look entries up
//! by a monotonically increasing key and borrow the payload bytes straight
//! out of the mapping.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;

mod error;
mod growth;
mod index;
mod merge;
mod state_log;
mod types;

pub use crate::error::{Error, ErrorKind};
pub use crate::merge::merge;
pub use crate::state_log::{Key, Options, StateLog};
