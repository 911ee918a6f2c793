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

//! Negotiate About Window Size
//!

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, BufMut};

/// Terminal dimensions reported by the peer through NAWS.
///
/// # Format
/// The dimensions travel as two big-endian `u16` values, width first. The console
/// accepts them with or without a single leading reserved byte:
///
/// ```text
/// [reserved] WIDTH-HIGH WIDTH-LOW HEIGHT-HIGH HEIGHT-LOW
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    /// The number of columns (characters) in the terminal window
    pub cols: u16,
    /// The number of rows (lines) in the terminal window
    pub rows: u16,
}

impl WindowSize {
    /// Creates a new `WindowSize` with the specified columns and rows.
    pub fn new(cols: u16, rows: u16) -> Self {
        WindowSize { cols, rows }
    }

    /// Writes the RFC 1073 four byte form (width, height) in big-endian order.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes this `WindowSize` to a writer using big-endian format.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_u16::<BigEndian>(self.cols)?;
        writer.write_u16::<BigEndian>(self.rows)?;
        Ok(4)
    }

    /// Decodes an (IAC-unescaped) NAWS payload.
    ///
    /// A five byte payload carries one reserved byte ahead of the dimensions and a four byte
    /// payload is the plain RFC 1073 form. Any other length is rejected.
    ///
    /// ```
    /// use rconsole_telnetcodec::naws::WindowSize;
    ///
    /// let size = WindowSize::decode(&[0x00, 0x00, 0x50, 0x00, 0x18]).unwrap();
    /// assert_eq!(size, WindowSize::new(80, 24));
    /// ```
    pub fn decode(payload: &[u8]) -> CodecResult<WindowSize> {
        let mut src = match payload.len() {
            5 => &payload[1..],
            4 => payload,
            actual => {
                return Err(CodecError::SubnegotiationError {
                    option: consts::option::NAWS,
                    reason: SubnegotiationErrorKind::InvalidLength {
                        expected: "4 or 5",
                        actual,
                    },
                });
            }
        };
        Ok(WindowSize {
            cols: src.get_u16(),
            rows: src.get_u16(),
        })
    }
}

impl Default for WindowSize {
    /// The traditional 80x24 terminal, used until the peer reports otherwise.
    fn default() -> Self {
        WindowSize { cols: 80, rows: 24 }
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}
