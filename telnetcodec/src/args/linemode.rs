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

//! Line Mode Options

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use bytes::BufMut;

/// Telnet Line Mode Option subnegotiation commands and arguments (RFC 1184)
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LineModeOption {
    /// MODE command - set line mode and flags
    Mode {
        /// Mode flags
        mode: LineModeFlags,
    },
    /// FORWARDMASK command - raw forward mask bytes
    ForwardMask {
        /// Mask of characters that should cause forwarding
        mask: Vec<u8>,
    },
    /// SLC (Set Local Characters) command
    Slc {
        /// List of special line character definitions, in wire order
        chars: Vec<SlcDefinition>,
    },
}

impl LineModeOption {
    /// Parse an (IAC-unescaped) LINEMODE payload, the bytes following the option code.
    pub fn parse(data: &[u8]) -> CodecResult<Self> {
        let Some((&command, rest)) = data.split_first() else {
            return Err(linemode_error(SubnegotiationErrorKind::Empty));
        };

        match command {
            consts::option::linemode::MODE => Ok(Self::Mode {
                mode: LineModeFlags::from_byte(rest.first().copied().unwrap_or_default()),
            }),
            consts::option::linemode::FORWARDMASK => Ok(Self::ForwardMask {
                mask: rest.to_vec(),
            }),
            consts::option::linemode::SLC => {
                if rest.len() % 3 != 0 {
                    return Err(linemode_error(SubnegotiationErrorKind::InvalidLength {
                        expected: "a multiple of 3",
                        actual: rest.len(),
                    }));
                }
                let chars = rest
                    .chunks_exact(3)
                    .map(|triplet| SlcDefinition {
                        function: SlcFunction::from_byte(triplet[0]),
                        flags: SlcFlags::from_byte(triplet[1]),
                        value: triplet[2],
                    })
                    .collect();
                Ok(Self::Slc { chars })
            }
            command => Err(linemode_error(SubnegotiationErrorKind::InvalidCommand {
                command,
            })),
        }
    }

    /// Serialize line mode option to bytes
    pub fn serialize(&self, buf: &mut impl BufMut) {
        match self {
            Self::Mode { mode } => {
                buf.put_u8(consts::option::linemode::MODE);
                buf.put_u8(mode.to_byte());
            }
            Self::ForwardMask { mask } => {
                buf.put_u8(consts::option::linemode::FORWARDMASK);
                buf.put_slice(mask);
            }
            Self::Slc { chars } => {
                buf.put_u8(consts::option::linemode::SLC);
                for slc in chars {
                    buf.put_u8(slc.function.to_byte());
                    buf.put_u8(slc.flags.to_byte());
                    buf.put_u8(slc.value);
                }
            }
        }
    }
}

fn linemode_error(reason: SubnegotiationErrorKind) -> CodecError {
    CodecError::SubnegotiationError {
        option: consts::option::LINEMODE,
        reason,
    }
}

/// Line Mode flags (used with MODE command)
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct LineModeFlags {
    /// Edit mode - client performs line editing
    pub edit: bool,
    /// Trapsig mode - client handles signals locally
    pub trapsig: bool,
    /// ACK mode - acknowledgment of mode changes
    pub ack: bool,
    /// Soft tab mode - client converts tabs to spaces
    pub soft_tab: bool,
    /// Lit echo mode - literal echo of all characters
    pub lit_echo: bool,
}

impl LineModeFlags {
    /// Create flags from a byte value
    pub fn from_byte(byte: u8) -> Self {
        use consts::option::linemode::*;
        Self {
            edit: (byte & MODE_EDIT) != 0,
            trapsig: (byte & MODE_TRAPSIG) != 0,
            ack: (byte & MODE_ACK) != 0,
            soft_tab: (byte & MODE_SOFT_TAB) != 0,
            lit_echo: (byte & MODE_LIT_ECHO) != 0,
        }
    }

    /// Convert flags to a byte value
    pub fn to_byte(&self) -> u8 {
        use consts::option::linemode::*;
        let mut byte = 0u8;
        if self.edit {
            byte |= MODE_EDIT;
        }
        if self.trapsig {
            byte |= MODE_TRAPSIG;
        }
        if self.ack {
            byte |= MODE_ACK;
        }
        if self.soft_tab {
            byte |= MODE_SOFT_TAB;
        }
        if self.lit_echo {
            byte |= MODE_LIT_ECHO;
        }
        byte
    }
}

/// Special Line Character definition
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SlcDefinition {
    /// SLC function code
    pub function: SlcFunction,
    /// SLC flags
    pub flags: SlcFlags,
    /// Character value
    pub value: u8,
}

/// SLC function codes (RFC 1184 section 5)
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum SlcFunction {
    /// Synch
    Synch,
    /// Break
    Brk,
    /// Interrupt Process
    Ip,
    /// Abort Output
    Ao,
    /// Are You There
    Ayt,
    /// End of Record
    Eor,
    /// Abort
    Abort,
    /// End of File
    Eof,
    /// Suspend
    Susp,
    /// Erase Character
    Ec,
    /// Erase Line
    El,
    /// Erase Word
    Ew,
    /// Reprint Line
    Rp,
    /// Literal Next
    Lnext,
    /// X-On
    Xon,
    /// X-Off
    Xoff,
    /// Forwarding character 1
    Forw1,
    /// Forwarding character 2
    Forw2,
    /// Move cursor left
    Mcl,
    /// Move cursor right
    Mcr,
    /// Move cursor one word left
    Mcwl,
    /// Move cursor one word right
    Mcwr,
    /// Move cursor to beginning of line
    Mcbol,
    /// Move cursor to end of line
    Mceol,
    /// Enter insert mode
    Insrt,
    /// Enter overwrite mode
    Over,
    /// Erase character to the right
    Ecr,
    /// Erase word to the right
    Ewr,
    /// Erase to beginning of line
    Ebol,
    /// Erase to end of line
    Eeol,
    /// Function code outside 1..=30
    Other(u8),
}

impl SlcFunction {
    /// Highest function code defined by RFC 1184
    pub const MAX_CODE: u8 = 30;

    const KNOWN: [SlcFunction; 30] = [
        Self::Synch,
        Self::Brk,
        Self::Ip,
        Self::Ao,
        Self::Ayt,
        Self::Eor,
        Self::Abort,
        Self::Eof,
        Self::Susp,
        Self::Ec,
        Self::El,
        Self::Ew,
        Self::Rp,
        Self::Lnext,
        Self::Xon,
        Self::Xoff,
        Self::Forw1,
        Self::Forw2,
        Self::Mcl,
        Self::Mcr,
        Self::Mcwl,
        Self::Mcwr,
        Self::Mcbol,
        Self::Mceol,
        Self::Insrt,
        Self::Over,
        Self::Ecr,
        Self::Ewr,
        Self::Ebol,
        Self::Eeol,
    ];

    /// Create SLC function from byte value
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1..=Self::MAX_CODE => Self::KNOWN[usize::from(byte - 1)],
            other => Self::Other(other),
        }
    }

    /// Convert SLC function to byte value
    pub fn to_byte(&self) -> u8 {
        match self {
            Self::Other(val) => *val,
            known => Self::KNOWN
                .iter()
                .position(|candidate| candidate == known)
                .map_or(0, |index| index as u8 + 1),
        }
    }

    /// The control byte this function stands for on the data stream, for the functions the
    /// line editor gives meaning to.
    pub fn control_byte(&self) -> Option<u8> {
        match self {
            Self::Ip => Some(consts::key::INTERRUPT),
            Self::Ec => Some(consts::key::BACKSPACE),
            _ => None,
        }
    }
}

/// SLC flags
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SlcFlags {
    /// Level of support
    pub level: SlcLevel,
    /// Acknowledgment flag
    pub ack: bool,
    /// Flushin flag
    pub flushin: bool,
    /// Flushout flag
    pub flushout: bool,
}

impl SlcFlags {
    /// Create SLC flags from byte value
    pub fn from_byte(byte: u8) -> Self {
        use consts::option::linemode::*;
        Self {
            level: SlcLevel::from_byte(byte),
            ack: (byte & SLC_ACK) != 0,
            flushin: (byte & SLC_FLUSHIN) != 0,
            flushout: (byte & SLC_FLUSHOUT) != 0,
        }
    }

    /// Convert SLC flags to byte value
    pub fn to_byte(&self) -> u8 {
        use consts::option::linemode::*;
        let mut byte = self.level.to_byte();
        if self.ack {
            byte |= SLC_ACK;
        }
        if self.flushin {
            byte |= SLC_FLUSHIN;
        }
        if self.flushout {
            byte |= SLC_FLUSHOUT;
        }
        byte
    }
}

/// SLC support level
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlcLevel {
    /// Not supported
    NoSupport,
    /// Value cannot be changed
    CantChange,
    /// Use the value provided
    Value,
    /// Use the default value
    Default,
}

impl SlcLevel {
    /// Create SLC level from the low two bits of a modifier byte
    pub fn from_byte(byte: u8) -> Self {
        use consts::option::linemode::*;
        match byte & SLC_LEVELBITS {
            SLC_NOSUPPORT => Self::NoSupport,
            SLC_CANTCHANGE => Self::CantChange,
            SLC_VALUE => Self::Value,
            _ => Self::Default,
        }
    }

    /// Convert SLC level to byte value
    pub fn to_byte(&self) -> u8 {
        use consts::option::linemode::*;
        match self {
            Self::NoSupport => SLC_NOSUPPORT,
            Self::CantChange => SLC_CANTCHANGE,
            Self::Value => SLC_VALUE,
            Self::Default => SLC_DEFAULT,
        }
    }
}

/// The character and modifiers the peer bound to one SLC function
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SlcEntry {
    /// Character the peer sends for this function
    pub value: u8,
    /// Modifiers reported alongside it
    pub flags: SlcFlags,
}

impl SlcEntry {
    /// NOSUPPORT entries carrying NUL or 0xFF mark a function the peer has disabled.
    fn is_disabled(&self) -> bool {
        self.flags.level == SlcLevel::NoSupport && matches!(self.value, 0x00 | 0xFF)
    }
}

/// Per-session SLC remap table: at most one entry per RFC 1184 function, indexed by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlcTable {
    entries: [Option<SlcEntry>; SlcFunction::MAX_CODE as usize],
}

impl SlcTable {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole table with the given definitions. Later definitions for the same
    /// function win; codes outside 1..=30 are dropped.
    pub fn replace<'a>(&mut self, definitions: impl IntoIterator<Item = &'a SlcDefinition>) {
        self.entries = Default::default();
        for definition in definitions {
            match definition.function {
                SlcFunction::Other(code) => {
                    tracing::debug!("Ignoring SLC definition for unknown function {}", code);
                }
                function => {
                    let index = usize::from(function.to_byte() - 1);
                    self.entries[index] = Some(SlcEntry {
                        value: definition.value,
                        flags: definition.flags,
                    });
                }
            }
        }
    }

    /// Entry bound to a function, if any
    pub fn get(&self, function: SlcFunction) -> Option<&SlcEntry> {
        match function {
            SlcFunction::Other(_) => None,
            function => self.entries[usize::from(function.to_byte() - 1)].as_ref(),
        }
    }

    /// Number of functions with an entry
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// True when no function has an entry
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(function, entry)` pairs in function-code order
    pub fn iter(&self) -> impl Iterator<Item = (SlcFunction, &SlcEntry)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry
                .as_ref()
                .map(|entry| (SlcFunction::from_byte(index as u8 + 1), entry))
        })
    }

    /// Map an incoming byte to the control byte of the function the peer bound it to.
    /// Only Interrupt-Process and Erase-Character translate; every other byte passes through.
    pub fn translate(&self, byte: u8) -> u8 {
        self.iter()
            .filter(|(_, entry)| entry.value == byte && !entry.is_disabled())
            .find_map(|(function, _)| function.control_byte())
            .unwrap_or(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(function: u8, flags: u8, value: u8) -> SlcDefinition {
        SlcDefinition {
            function: SlcFunction::from_byte(function),
            flags: SlcFlags::from_byte(flags),
            value,
        }
    }

    #[test]
    fn linemode_flags_round_trip() {
        let flags = LineModeFlags::from_byte(0b0001_1111);
        assert!(flags.edit && flags.trapsig && flags.ack && flags.soft_tab && flags.lit_echo);
        assert_eq!(flags.to_byte(), 0b0001_1111);
        assert_eq!(LineModeFlags::from_byte(0), LineModeFlags::default());
    }

    #[test]
    fn slc_function_codes_follow_rfc_1184() {
        assert_eq!(SlcFunction::from_byte(3), SlcFunction::Ip);
        assert_eq!(SlcFunction::from_byte(10), SlcFunction::Ec);
        assert_eq!(SlcFunction::from_byte(30), SlcFunction::Eeol);
        assert_eq!(SlcFunction::from_byte(31), SlcFunction::Other(31));
        assert_eq!(SlcFunction::from_byte(0), SlcFunction::Other(0));
        for code in 0..=40u8 {
            assert_eq!(SlcFunction::from_byte(code).to_byte(), code);
        }
    }

    #[test]
    fn slc_level_bits() {
        assert_eq!(SlcLevel::from_byte(0x83), SlcLevel::Default);
        assert_eq!(SlcLevel::from_byte(0x02), SlcLevel::Value);
        let flags = SlcFlags::from_byte(0xE1);
        assert_eq!(flags.level, SlcLevel::CantChange);
        assert!(flags.ack && flags.flushin && flags.flushout);
        assert_eq!(flags.to_byte(), 0xE1);
    }

    #[test]
    fn parse_slc_triplets() {
        let option = LineModeOption::parse(&[0x03, 3, 0x02, 0x1A, 10, 0x02, 0x7F]).unwrap();
        let LineModeOption::Slc { chars } = option else {
            panic!("expected SLC");
        };
        assert_eq!(chars, vec![definition(3, 0x02, 0x1A), definition(10, 0x02, 0x7F)]);
    }

    #[test]
    fn parse_slc_rejects_partial_triplet() {
        let err = LineModeOption::parse(&[0x03, 3, 0x02]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::SubnegotiationError {
                option: consts::option::LINEMODE,
                reason: SubnegotiationErrorKind::InvalidLength { actual: 2, .. }
            }
        ));
    }

    #[test]
    fn parse_mode_and_forwardmask() {
        assert_eq!(
            LineModeOption::parse(&[0x01, 0x03]).unwrap(),
            LineModeOption::Mode {
                mode: LineModeFlags::from_byte(0x03)
            }
        );
        assert_eq!(
            LineModeOption::parse(&[0x02, 0xAA, 0x55]).unwrap(),
            LineModeOption::ForwardMask {
                mask: vec![0xAA, 0x55]
            }
        );
        assert!(LineModeOption::parse(&[]).is_err());
        assert!(LineModeOption::parse(&[0x09]).is_err());
    }

    #[test]
    fn serialize_slc() {
        let option = LineModeOption::Slc {
            chars: vec![definition(3, 0x02, 0x03)],
        };
        let mut buf = Vec::new();
        option.serialize(&mut buf);
        assert_eq!(buf, vec![0x03, 3, 0x02, 0x03]);
    }

    #[test]
    fn table_replace_is_wholesale() {
        let mut table = SlcTable::new();
        table.replace(&[definition(3, 0x02, 0x1A), definition(10, 0x02, 0x7F)]);
        assert_eq!(table.len(), 2);

        table.replace(&[definition(4, 0x02, 0x0F)]);
        assert_eq!(table.len(), 1);
        assert!(table.get(SlcFunction::Ip).is_none());
        assert_eq!(table.get(SlcFunction::Ao).map(|entry| entry.value), Some(0x0F));
    }

    #[test]
    fn table_keeps_one_entry_per_function() {
        let mut table = SlcTable::new();
        table.replace(&[definition(3, 0x02, 0x1A), definition(3, 0x02, 0x1B), definition(99, 0x02, 0x01)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(SlcFunction::Ip).map(|entry| entry.value), Some(0x1B));
    }

    #[test]
    fn translate_only_ip_and_ec() {
        let mut table = SlcTable::new();
        table.replace(&[
            definition(3, 0x02, 0x1A),
            definition(10, 0x02, 0x7F),
            definition(4, 0x02, b'o'),
        ]);
        assert_eq!(table.translate(0x1A), consts::key::INTERRUPT);
        assert_eq!(table.translate(0x7F), consts::key::BACKSPACE);
        assert_eq!(table.translate(b'o'), b'o');
        assert_eq!(table.translate(b'x'), b'x');
    }

    #[test]
    fn translate_skips_disabled_entries() {
        let mut table = SlcTable::new();
        table.replace(&[definition(3, 0x00, 0x00)]);
        assert_eq!(table.translate(0x00), 0x00);
    }
}
