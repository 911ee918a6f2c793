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

//! Telnet wire constants (RFC 854, RFC 1073, RFC 1184)

/// Subnegotiation End
pub const SE: u8 = 0xF0;
/// No Operation
pub const NOP: u8 = 0xF1;
/// Data Mark
pub const DM: u8 = 0xF2;
/// Break
pub const BRK: u8 = 0xF3;
/// Interrupt Process
pub const IP: u8 = 0xF4;
/// Abort Output
pub const AO: u8 = 0xF5;
/// Are You There
pub const AYT: u8 = 0xF6;
/// Erase Character
pub const EC: u8 = 0xF7;
/// Erase Line
pub const EL: u8 = 0xF8;
/// Go Ahead
pub const GA: u8 = 0xF9;
/// Subnegotiation Begin
pub const SB: u8 = 0xFA;
/// WILL negotiation verb
pub const WILL: u8 = 0xFB;
/// WONT negotiation verb
pub const WONT: u8 = 0xFC;
/// DO negotiation verb
pub const DO: u8 = 0xFD;
/// DONT negotiation verb
pub const DONT: u8 = 0xFE;
/// Interpret As Command
pub const IAC: u8 = 0xFF;

/// End of File (RFC 1184 extension command)
pub const EOF: u8 = 0xEC;
/// Suspend Process (RFC 1184 extension command)
pub const SUSP: u8 = 0xED;
/// Abort Process (RFC 1184 extension command)
pub const ABORT: u8 = 0xEE;

/// Carriage Return
pub const CR: u8 = b'\r';
/// Line Feed
pub const LF: u8 = b'\n';
/// Null
pub const NUL: u8 = 0x00;

/// Option codes
pub mod option {
    /// Binary Transmission (RFC 856)
    pub const BINARY: u8 = 0x00;
    /// Echo (RFC 857)
    pub const ECHO: u8 = 0x01;
    /// Suppress Go Ahead (RFC 858)
    pub const SGA: u8 = 0x03;
    /// Terminal Type (RFC 1091)
    pub const TTYPE: u8 = 0x18;
    /// Negotiate About Window Size (RFC 1073)
    pub const NAWS: u8 = 0x1F;
    /// Remote Flow Control (RFC 1372)
    pub const LFLOW: u8 = 0x21;
    /// Linemode (RFC 1184)
    pub const LINEMODE: u8 = 0x22;

    /// LINEMODE subnegotiation commands
    pub mod linemode {
        /// MODE
        pub const MODE: u8 = 0x01;
        /// FORWARDMASK
        pub const FORWARDMASK: u8 = 0x02;
        /// Set Local Characters
        pub const SLC: u8 = 0x03;

        /// MODE bit: EDIT
        pub const MODE_EDIT: u8 = 0x01;
        /// MODE bit: TRAPSIG
        pub const MODE_TRAPSIG: u8 = 0x02;
        /// MODE bit: MODE_ACK
        pub const MODE_ACK: u8 = 0x04;
        /// MODE bit: SOFT_TAB
        pub const MODE_SOFT_TAB: u8 = 0x08;
        /// MODE bit: LIT_ECHO
        pub const MODE_LIT_ECHO: u8 = 0x10;

        /// SLC level: not supported
        pub const SLC_NOSUPPORT: u8 = 0;
        /// SLC level: can't change
        pub const SLC_CANTCHANGE: u8 = 1;
        /// SLC level: value
        pub const SLC_VALUE: u8 = 2;
        /// SLC level: default
        pub const SLC_DEFAULT: u8 = 3;
        /// Mask selecting the level bits of an SLC modifier
        pub const SLC_LEVELBITS: u8 = 0x03;
        /// SLC modifier: acknowledgement
        pub const SLC_ACK: u8 = 0x80;
        /// SLC modifier: flush input
        pub const SLC_FLUSHIN: u8 = 0x40;
        /// SLC modifier: flush output
        pub const SLC_FLUSHOUT: u8 = 0x20;
    }
}

/// Control bytes with editing significance on the data stream
pub mod key {
    /// Ctrl-C
    pub const INTERRUPT: u8 = 0x03;
    /// Backspace
    pub const BACKSPACE: u8 = 0x08;
    /// Escape
    pub const ESCAPE: u8 = 0x1B;
    /// Delete
    pub const DELETE: u8 = 0x7F;
}
