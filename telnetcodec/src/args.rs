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

use crate::TelnetOption;
use crate::args::linemode::LineModeOption;
use crate::args::naws::WindowSize;
use crate::consts;
use crate::result::CodecResult;
use bytes::{BufMut, BytesMut};
use std::fmt::Formatter;

pub mod linemode;
pub mod naws;

///
/// Telnet Subnegotiation Argument
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetArgument {
    /// LINEMODE subnegotiation (MODE, FORWARDMASK or SLC)
    LineMode(LineModeOption),
    /// A subnegotiation for the window size, where the first value is the width
    /// and the second value is the height. The values are in characters.
    NAWSWindowSize(WindowSize),
    /// A subnegotiation for an option the console does not interpret.
    Unknown(TelnetOption, BytesMut),
}

impl TelnetArgument {
    /// Interpret an (IAC-unescaped) subnegotiation payload for the given option byte.
    ///
    /// ```
    /// use rconsole_telnetcodec::TelnetArgument;
    /// use rconsole_telnetcodec::naws::WindowSize;
    ///
    /// let arg = TelnetArgument::parse(0x1F, &[0x00, 0x00, 0x50, 0x00, 0x18]).unwrap();
    /// assert_eq!(arg, TelnetArgument::NAWSWindowSize(WindowSize::new(80, 24)));
    /// ```
    pub fn parse(option: u8, payload: &[u8]) -> CodecResult<TelnetArgument> {
        match option {
            consts::option::LINEMODE => Ok(TelnetArgument::LineMode(LineModeOption::parse(
                payload,
            )?)),
            consts::option::NAWS => Ok(TelnetArgument::NAWSWindowSize(WindowSize::decode(
                payload,
            )?)),
            other => Ok(TelnetArgument::Unknown(
                TelnetOption::from_u8(other),
                BytesMut::from(payload),
            )),
        }
    }

    /// Encodes the payload of this argument, doubling any IAC byte it contains.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        let mut raw = Vec::new();
        match self {
            TelnetArgument::LineMode(inner) => inner.serialize(&mut raw),
            TelnetArgument::NAWSWindowSize(inner) => {
                inner.write(&mut raw)?;
            }
            TelnetArgument::Unknown(_option, payload) => raw.extend_from_slice(payload),
        }
        let mut written = 0;
        for byte in raw {
            if byte == consts::IAC {
                dst.put_u8(consts::IAC);
                written += 1;
            }
            dst.put_u8(byte);
            written += 1;
        }
        Ok(written)
    }

    /// Returns the `TelnetOption` associated with this argument.
    pub fn option(&self) -> TelnetOption {
        match self {
            TelnetArgument::LineMode(_) => TelnetOption::Linemode,
            TelnetArgument::NAWSWindowSize(_) => TelnetOption::NAWS,
            TelnetArgument::Unknown(option, _) => *option,
        }
    }
}

impl std::fmt::Display for TelnetArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetArgument::LineMode(v) => write!(f, "LINEMODE({v:?})"),
            TelnetArgument::NAWSWindowSize(v) => write!(f, "NAWS({v})"),
            TelnetArgument::Unknown(o, v) => write!(f, "{o}-{v:?}"),
        }
    }
}

/// Collapse every doubled IAC in a subnegotiation payload to a single IAC.
pub(crate) fn unescape_iac(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len());
    let mut iter = payload.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        if byte == consts::IAC && iter.peek() == Some(&consts::IAC) {
            iter.next();
        }
        out.push(byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_collapses_doubled_iac() {
        assert_eq!(unescape_iac(&[0x01, 0xFF, 0xFF, 0x02]), vec![0x01, 0xFF, 0x02]);
        assert_eq!(unescape_iac(&[0xFF, 0xFF, 0xFF, 0xFF]), vec![0xFF, 0xFF]);
        assert_eq!(unescape_iac(&[0xFF]), vec![0xFF]);
        assert!(unescape_iac(&[]).is_empty());
    }

    #[test]
    fn parse_unknown_option_keeps_payload() {
        let arg = TelnetArgument::parse(0x18, &[0x00, b'x']).unwrap();
        assert_eq!(
            arg,
            TelnetArgument::Unknown(TelnetOption::TTYPE, BytesMut::from(&[0x00, b'x'][..]))
        );
        assert_eq!(arg.option(), TelnetOption::TTYPE);
    }

    #[test]
    fn parse_propagates_payload_errors() {
        assert!(TelnetArgument::parse(consts::option::NAWS, &[0x00]).is_err());
        assert!(TelnetArgument::parse(consts::option::LINEMODE, &[]).is_err());
    }

    #[test]
    fn encode_escapes_iac() {
        let arg = TelnetArgument::NAWSWindowSize(WindowSize::new(0x00FF, 24));
        let mut buf = BytesMut::new();
        assert_eq!(arg.encode(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..], &[0x00, 0xFF, 0xFF, 0x00, 0x18]);
    }
}
