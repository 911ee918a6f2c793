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

use super::{CodecError, TelnetEvent, TelnetFrame, consts};
use crate::args::TelnetArgument;
use crate::args::linemode::{LineModeOption, SlcTable};
use crate::args::naws::WindowSize;
use crate::options::{ModeFlags, TelnetAction};
use crate::parser::{Decoded, decode_command};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

/// Per-connection Telnet protocol state and codec.
///
/// `TelnetCodec` holds everything negotiation can change for one connection: the
/// [`ModeFlags`] set, the SLC remap table and the terminal size. Commands decoded by
/// [`decode_command`] are folded into that state with [`TelnetCodec::apply`].
///
/// It also implements [`Decoder`] (one data byte or complete command per item, `None`
/// while a command is still partially buffered) and [`Encoder`] for outbound
/// [`TelnetFrame`]s, so it can be used with `Framed` by clients and test harnesses.
#[derive(Clone, Debug, Default)]
pub struct TelnetCodec {
    modes: ModeFlags,
    slc: SlcTable,
    window: WindowSize,
}

impl TelnetCodec {
    /// Creates a new instance of `TelnetCodec` with no modes set, an empty SLC table and an
    /// 80x24 window.
    ///
    /// # Example
    /// ```
    /// use rconsole_telnetcodec::{ModeFlags, TelnetCodec};
    ///
    /// let codec = TelnetCodec::new();
    /// assert!(!codec.is_set(ModeFlags::ECHO));
    /// ```
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Current mode flags
    pub fn modes(&self) -> ModeFlags {
        self.modes
    }

    /// True when every flag in `flags` is set
    pub fn is_set(&self, flags: ModeFlags) -> bool {
        self.modes.contains(flags)
    }

    /// Set or clear mode flags
    pub fn set_mode(&mut self, flags: ModeFlags, enabled: bool) {
        self.modes.set(flags, enabled);
    }

    /// Flip mode flags
    pub fn toggle_mode(&mut self, flags: ModeFlags) {
        self.modes.toggle(flags);
    }

    /// The SLC table last sent by the peer
    pub fn slc(&self) -> &SlcTable {
        &self.slc
    }

    /// The terminal size last reported by the peer
    pub fn window_size(&self) -> WindowSize {
        self.window
    }

    /// Map an incoming data byte through the SLC table.
    pub fn remap(&self, byte: u8) -> u8 {
        self.slc.translate(byte)
    }

    /// Fold a decoded event into the session state. Returns true when any state changed.
    ///
    /// WILL/WONT toggle BINARY, SGA, LINEMODE and NAWS; DO/DONT toggle ECHO. An SLC
    /// subnegotiation replaces the whole table and a NAWS subnegotiation replaces the window
    /// size. Everything else is accepted without effect.
    pub fn apply(&mut self, event: &TelnetEvent) -> bool {
        match event {
            TelnetEvent::Negotiate(action, option) => {
                let flag = match action {
                    TelnetAction::Will | TelnetAction::Wont => option.remote_mode(),
                    TelnetAction::Do | TelnetAction::Dont => option.local_mode(),
                };
                match flag {
                    Some(flag) => {
                        let before = self.modes;
                        self.modes.set(flag, action.is_positive());
                        debug!("Received {} {}, modes now {:?}", action, option, self.modes);
                        before != self.modes
                    }
                    None => {
                        debug!("Ignoring {} {}", action, option);
                        false
                    }
                }
            }
            TelnetEvent::Subnegotiate(TelnetArgument::LineMode(LineModeOption::Slc {
                chars,
            })) => {
                self.slc.replace(chars);
                debug!("SLC table replaced with {} entries", self.slc.len());
                true
            }
            TelnetEvent::Subnegotiate(TelnetArgument::LineMode(other)) => {
                debug!("Ignoring LINEMODE subnegotiation {:?}", other);
                false
            }
            TelnetEvent::Subnegotiate(TelnetArgument::NAWSWindowSize(size)) => {
                self.window = *size;
                debug!("Window size is now {}", size);
                true
            }
            _ => false,
        }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = CodecError;

    /// Decodes one data byte or one complete command from `src`, applying it to the
    /// session state. A partially buffered command is left in `src` untouched.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        match decode_command(&src[..]) {
            Decoded::Incomplete => Ok(None),
            Decoded::Command { len, event } => {
                src.advance(len);
                self.apply(&event);
                Ok(Some(event))
            }
        }
    }
}

impl Encoder<u8> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        // Encode a raw byte, escaping IAC if necessary
        dst.reserve(2);
        if item == consts::IAC {
            dst.put_u8(consts::IAC);
        }
        dst.put_u8(item);
        Ok(())
    }
}

impl Encoder<&[u8]> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        for byte in item {
            self.encode(*byte, dst)?;
        }
        Ok(())
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a `TelnetFrame` for transmission.
    ///
    /// - `Data(byte)`: the byte, doubled if it is IAC.
    /// - `Negotiate(action, option)`: `IAC <action> <option>`.
    /// - `Subnegotiate(argument)`: `IAC SB <option> <escaped payload> IAC SE`.
    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetFrame::Data(ch) => self.encode(ch, dst)?,
            TelnetFrame::Negotiate(action, option) => {
                dst.reserve(3);
                dst.put_u8(consts::IAC);
                dst.put_u8(action.to_u8());
                dst.put_u8(option.into());
            }
            TelnetFrame::Subnegotiate(argument) => {
                dst.reserve(5);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(argument.option().to_u8());
                argument.encode(dst)?;
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
        Ok(())
    }
}
