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

//! # RConsole Telnet Protocol Codec
//!
//! The Telnet side of the remote console: decoding IAC commands out of the inbound byte
//! stream and keeping the per-connection state that negotiation changes.
//!
//! ## Core Components
//!
//! ### [`decode_command`]
//!
//! A stateless decoder positioned at an IAC byte. It returns either
//! [`Decoded::Incomplete`] (nothing consumed, wait for more input) or
//! [`Decoded::Command`] with the number of bytes the command spans and a [`TelnetEvent`].
//! Truncated negotiations and subnegotiations whose `IAC SE` has not arrived yet are
//! incomplete, so feeding a stream in one read or many yields the same events.
//!
//! ### [`TelnetCodec`]
//!
//! Per-connection protocol state: [`ModeFlags`], the LINEMODE SLC table
//! ([`linemode::SlcTable`]) and the NAWS window size ([`naws::WindowSize`]).
//! [`TelnetCodec::apply`] folds decoded events into it. It also implements
//! `tokio_util::codec::{Decoder, Encoder}`.
//!
//! ## Interpreted Options
//!
//! | Option   | Verb      | Effect                                   |
//! |----------|-----------|------------------------------------------|
//! | BINARY   | WILL/WONT | [`ModeFlags::BINARY`]                    |
//! | SGA      | WILL/WONT | [`ModeFlags::SGA`]                       |
//! | LINEMODE | WILL/WONT | [`ModeFlags::LINEMODE`], SLC remapping   |
//! | NAWS     | WILL/WONT | [`ModeFlags::NAWS`], window size         |
//! | ECHO     | DO/DONT   | [`ModeFlags::ECHO`]                      |
//!
//! Every other option is accepted and ignored.
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 856: Telnet Binary Transmission
//! - RFC 857: Telnet Echo Option
//! - RFC 858: Telnet Suppress Go Ahead Option
//! - RFC 1073: Telnet Window Size Option
//! - RFC 1184: Telnet Linemode Option

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

mod args;
mod codec;
pub mod consts;
mod event;
mod frame;
mod options;
mod parser;
mod result;

pub use self::args::{TelnetArgument, linemode, naws};
pub use self::codec::TelnetCodec;
pub use self::event::TelnetEvent;
pub use self::frame::TelnetFrame;
pub use self::options::{ModeFlags, TelnetAction, TelnetOption};
pub use self::parser::{Decoded, decode_command};
pub use self::result::{CodecError, CodecResult, SubnegotiationErrorKind};
