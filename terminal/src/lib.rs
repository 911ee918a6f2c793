//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! # RConsole Terminal
//!
//! Server-side line editing for a Telnet console. [`LineEditor`] takes data bytes that
//! have already been separated from Telnet commands, applies the editing keys
//! (interrupt, backspace, delete, a small set of ANSI cursor sequences, insert toggle),
//! produces the echo the peer should see, and hands out complete lines.
//!
//! Editing state lives in a [`LineBuffer`] whose cursor can never leave `0..=len`.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod buffer;
mod editor;
mod escape;

pub use self::buffer::LineBuffer;
pub use self::editor::{EditOutcome, LineEditor, PASSWORD_MASK};
pub use self::escape::{EscapeMatch, EscapeSequence, match_escape};
