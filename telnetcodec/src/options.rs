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

use crate::consts;
use bitflags::bitflags;
use std::fmt::Formatter;

///
/// Telnet options known to the console. Only [`TelnetOption::TransmitBinary`],
/// [`TelnetOption::Echo`], [`TelnetOption::SuppressGoAhead`], [`TelnetOption::NAWS`] and
/// [`TelnetOption::Linemode`] change session state; everything else is accepted and ignored.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetOption {
    /// [`consts::option::BINARY`] Telnet Binary Transmission [RFC856](https://tools.ietf.org/html/rfc856)
    TransmitBinary,
    /// [`consts::option::ECHO`] Telnet Echo Option [RFC857](https://tools.ietf.org/html/rfc857)
    Echo,
    /// [`consts::option::SGA`] Suppress Go ahead [RFC858](https://tools.ietf.org/html/rfc858)
    SuppressGoAhead,
    /// [`consts::option::TTYPE`] Terminal Type [RFC1091](http://www.iana.org/go/rfc1091)
    TTYPE,
    /// [`consts::option::NAWS`] Negotiate About Window Size [RFC1073](http://www.iana.org/go/rfc1073)
    NAWS,
    /// [`consts::option::LFLOW`] Remote Flow Control [RFC1372](http://www.iana.org/go/rfc1372)
    LFLOW,
    /// [`consts::option::LINEMODE`] Linemode [RFC1184](http://www.iana.org/go/rfc1184)
    Linemode,
    /// Unknown Option
    Unknown(u8),
}

impl TelnetOption {
    /// Converts a `TelnetOption` into its wire byte.
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetOption::TransmitBinary => consts::option::BINARY,
            TelnetOption::Echo => consts::option::ECHO,
            TelnetOption::SuppressGoAhead => consts::option::SGA,
            TelnetOption::TTYPE => consts::option::TTYPE,
            TelnetOption::NAWS => consts::option::NAWS,
            TelnetOption::LFLOW => consts::option::LFLOW,
            TelnetOption::Linemode => consts::option::LINEMODE,
            TelnetOption::Unknown(byte) => *byte,
        }
    }

    /// Converts a wire byte into a `TelnetOption`, falling back to [`TelnetOption::Unknown`].
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            consts::option::BINARY => TelnetOption::TransmitBinary,
            consts::option::ECHO => TelnetOption::Echo,
            consts::option::SGA => TelnetOption::SuppressGoAhead,
            consts::option::TTYPE => TelnetOption::TTYPE,
            consts::option::NAWS => TelnetOption::NAWS,
            consts::option::LFLOW => TelnetOption::LFLOW,
            consts::option::LINEMODE => TelnetOption::Linemode,
            byte => TelnetOption::Unknown(byte),
        }
    }

    /// The mode flag a peer WILL/WONT toggles for this option, if any.
    pub fn remote_mode(&self) -> Option<ModeFlags> {
        match self {
            TelnetOption::TransmitBinary => Some(ModeFlags::BINARY),
            TelnetOption::SuppressGoAhead => Some(ModeFlags::SGA),
            TelnetOption::Linemode => Some(ModeFlags::LINEMODE),
            TelnetOption::NAWS => Some(ModeFlags::NAWS),
            _ => None,
        }
    }

    /// The mode flag a peer DO/DONT toggles for this option, if any.
    pub fn local_mode(&self) -> Option<ModeFlags> {
        match self {
            TelnetOption::Echo => Some(ModeFlags::ECHO),
            _ => None,
        }
    }
}

impl std::fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetOption::TransmitBinary => write!(f, "BINARY"),
            TelnetOption::Echo => write!(f, "ECHO"),
            TelnetOption::SuppressGoAhead => write!(f, "SGA"),
            TelnetOption::TTYPE => write!(f, "TTYPE"),
            TelnetOption::NAWS => write!(f, "NAWS"),
            TelnetOption::LFLOW => write!(f, "LFLOW"),
            TelnetOption::Linemode => write!(f, "LINEMODE"),
            TelnetOption::Unknown(byte) => write!(f, "UNKNOWN({byte:#04X})"),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        TelnetOption::from_u8(byte)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.to_u8()
    }
}

/// Option negotiation verb
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetAction {
    /// Sender wants to (or agrees to) perform the option
    Will,
    /// Sender refuses to perform the option
    Wont,
    /// Sender asks the receiver to perform the option
    Do,
    /// Sender asks the receiver to stop performing the option
    Dont,
}

impl TelnetAction {
    /// Wire byte for this verb
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetAction::Will => consts::WILL,
            TelnetAction::Wont => consts::WONT,
            TelnetAction::Do => consts::DO,
            TelnetAction::Dont => consts::DONT,
        }
    }

    /// Parse a verb byte; `None` for anything that is not WILL/WONT/DO/DONT.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            consts::WILL => Some(TelnetAction::Will),
            consts::WONT => Some(TelnetAction::Wont),
            consts::DO => Some(TelnetAction::Do),
            consts::DONT => Some(TelnetAction::Dont),
            _ => None,
        }
    }

    /// True for the verbs that switch an option on (WILL, DO)
    pub fn is_positive(&self) -> bool {
        matches!(self, TelnetAction::Will | TelnetAction::Do)
    }
}

impl std::fmt::Display for TelnetAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetAction::Will => write!(f, "WILL"),
            TelnetAction::Wont => write!(f, "WONT"),
            TelnetAction::Do => write!(f, "DO"),
            TelnetAction::Dont => write!(f, "DONT"),
        }
    }
}

bitflags! {
    /// Per-session editing and negotiation state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModeFlags: u16 {
        /// Server echoes typed characters back to the peer
        const ECHO = 0x0001;
        /// Peer negotiated LINEMODE; a bare CR terminates a line
        const LINEMODE = 0x0002;
        /// Binary transmission
        const BINARY = 0x0004;
        /// Suppress Go Ahead
        const SGA = 0x0008;
        /// Peer reports its window size
        const NAWS = 0x0010;
        /// Line editor inserts rather than overwrites
        const INSERT = 0x0400;
    }
}
