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

use crate::args::TelnetArgument;
use crate::options::{TelnetAction, TelnetOption};
use crate::result::CodecError;

///
/// `TelnetEvent` is one decoded unit of the inbound stream: a data byte or a complete
/// IAC command.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetEvent {
    /// Telnet Data Byte. `IAC IAC` decodes to `Data(0xFF)`.
    Data(u8),
    /// No Operation, also reported for an `IAC SE` outside a subnegotiation
    NoOperation,
    /// End of urgent Data Stream
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// End of File (LINEMODE)
    EndOfFile,
    /// Suspend Process (LINEMODE)
    Suspend,
    /// Abort Process (LINEMODE)
    Abort,
    /// Option negotiation
    Negotiate(TelnetAction, TelnetOption),
    /// Subnegotiation Payload
    Subnegotiate(TelnetArgument),
    /// A complete subnegotiation whose payload could not be interpreted
    InvalidSubnegotiation(CodecError),
    /// Command byte the codec does not know
    Unknown(u8),
}
