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

use crate::buffer::LineBuffer;
use crate::escape::{EscapeMatch, EscapeSequence, match_escape};
use bytes::{BufMut, Bytes, BytesMut};
use rconsole_telnetcodec::ModeFlags;
use rconsole_telnetcodec::consts::{self, key};
use tracing::{debug, trace};

/// Glyph echoed in place of each password character
pub const PASSWORD_MASK: u8 = b'*';

/// What feeding one byte did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// `n` input bytes were used, the fed byte included
    Consumed(usize),
    /// An escape sequence is only partly buffered; nothing was used
    Incomplete,
    /// The interrupt byte arrived; the session must close and the rest of the input is
    /// ignored
    Interrupted,
}

/// Canonical line editor for one session.
///
/// Bytes go in through [`LineEditor::feed`]; echo for the peer accumulates in an output
/// buffer the session drains with [`LineEditor::take_output`]; complete lines come out of
/// [`LineEditor::take_line`].
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: LineBuffer,
    output: BytesMut,
    masked: bool,
    must_close: bool,
}

impl LineEditor {
    /// Creates an editor with an empty line
    pub fn new() -> Self {
        Self::default()
    }

    /// The line being edited
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Echo a mask glyph instead of typed characters
    pub fn set_masked(&mut self, masked: bool) {
        self.masked = masked;
    }

    /// True while typed characters are echoed masked
    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// True once the interrupt byte has been seen
    pub fn must_close(&self) -> bool {
        self.must_close
    }

    /// True when echo bytes are waiting to be sent
    pub fn has_output(&self) -> bool {
        !self.output.is_empty()
    }

    /// Takes the echo produced so far
    pub fn take_output(&mut self) -> Bytes {
        self.output.split().freeze()
    }

    /// Feeds one (already remapped) data byte. `lookahead` holds the raw bytes that follow
    /// it in the input and is only consulted for escape sequences.
    pub fn feed(&mut self, byte: u8, lookahead: &[u8], modes: &mut ModeFlags) -> EditOutcome {
        let echo = modes.contains(ModeFlags::ECHO);
        match byte {
            key::INTERRUPT => {
                debug!("Interrupt received, closing session");
                self.must_close = true;
                EditOutcome::Interrupted
            }
            key::BACKSPACE => {
                if self.buffer.remove_before_cursor() && echo {
                    self.output.put_u8(key::BACKSPACE);
                    self.rewrite_tail();
                }
                EditOutcome::Consumed(1)
            }
            key::DELETE => {
                self.delete_at_cursor(echo);
                EditOutcome::Consumed(1)
            }
            key::ESCAPE => {
                let mut src = Vec::with_capacity(lookahead.len().min(8) + 1);
                src.push(byte);
                src.extend(lookahead.iter().take(7));
                match match_escape(&src) {
                    EscapeMatch::Incomplete => EditOutcome::Incomplete,
                    EscapeMatch::Unrecognized => {
                        trace!("Ignoring unsupported escape sequence");
                        EditOutcome::Consumed(1)
                    }
                    EscapeMatch::Recognized { sequence, len } => {
                        self.apply_escape(sequence, &src[..len], modes);
                        EditOutcome::Consumed(len)
                    }
                }
            }
            _ => {
                self.insert(byte, *modes);
                EditOutcome::Consumed(1)
            }
        }
    }

    /// Inserts a byte as a regular character, bypassing remapping and special keys.
    pub fn feed_literal(&mut self, byte: u8, modes: ModeFlags) {
        self.insert(byte, modes);
    }

    /// Takes the first complete line, if any.
    ///
    /// The terminator is a bare CR under LINEMODE and CR LF otherwise. The remainder of
    /// the buffer stays for the next line and the cursor returns to column 0.
    pub fn take_line(&mut self, modes: ModeFlags) -> Option<String> {
        let linemode = modes.contains(ModeFlags::LINEMODE);
        let terminator: &[u8] = if linemode {
            &[consts::CR]
        } else {
            &[consts::CR, consts::LF]
        };
        let at = self.buffer.find(terminator)?;
        let mut line = self.buffer.take_prefix(at, terminator.len());
        if linemode && matches!(line.first(), Some(&consts::LF | &consts::NUL)) {
            line.remove(0);
        }
        if modes.contains(ModeFlags::ECHO) {
            self.output.put_slice(b"\r\n");
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn insert(&mut self, byte: u8, modes: ModeFlags) {
        if modes.contains(ModeFlags::INSERT) {
            self.buffer.insert(byte);
        } else {
            self.buffer.overwrite(byte);
        }
        if !modes.contains(ModeFlags::ECHO) || !is_printable(byte) {
            return;
        }
        self.output.put_u8(self.glyph(byte));
        if modes.contains(ModeFlags::INSERT) && !self.buffer.tail().is_empty() {
            let tail = self.buffer.tail().len();
            self.put_tail();
            self.cursor_left(tail);
        }
    }

    fn delete_at_cursor(&mut self, echo: bool) {
        if self.buffer.remove_at_cursor() && echo {
            self.rewrite_tail();
        }
    }

    /// Applies a recognized escape sequence.
    ///
    /// A cursor move that covers its full count is echoed verbatim. One clamped at either
    /// end of the line echoes a fresh `ESC[nD`/`ESC[nC` for the distance actually moved,
    /// and nothing when the cursor did not move, so the peer's cursor never leaves the line.
    fn apply_escape(&mut self, sequence: EscapeSequence, raw: &[u8], modes: &mut ModeFlags) {
        match sequence {
            EscapeSequence::CursorLeft(count) => {
                let moved = self.buffer.move_left(count);
                if moved == count {
                    self.output.put_slice(raw);
                } else if moved > 0 {
                    self.cursor_left(moved);
                }
            }
            EscapeSequence::CursorRight(count) => {
                let moved = self.buffer.move_right(count);
                if moved == count {
                    self.output.put_slice(raw);
                } else if moved > 0 {
                    self.put_csi(moved, b'C');
                }
            }
            EscapeSequence::CursorUp | EscapeSequence::CursorDown => {}
            EscapeSequence::Delete => {
                self.delete_at_cursor(modes.contains(ModeFlags::ECHO));
            }
            EscapeSequence::InsertToggle => {
                modes.toggle(ModeFlags::INSERT);
                debug!(
                    "Insert mode {}",
                    if modes.contains(ModeFlags::INSERT) {
                        "on"
                    } else {
                        "off"
                    }
                );
            }
        }
    }

    /// Redraws from the cursor to the end of the line, blanks the vacated column and moves
    /// back to the cursor.
    fn rewrite_tail(&mut self) {
        let tail = self.buffer.tail().len();
        self.put_tail();
        self.output.put_u8(b' ');
        self.cursor_left(tail + 1);
    }

    fn put_tail(&mut self) {
        let masked = self.masked;
        let tail = self.buffer.tail();
        self.output.extend(tail.iter().map(|&byte| {
            if masked && is_printable(byte) {
                PASSWORD_MASK
            } else {
                byte
            }
        }));
    }

    fn cursor_left(&mut self, count: usize) {
        self.put_csi(count, b'D');
    }

    /// Appends `ESC [ <count> <final_byte>`
    fn put_csi(&mut self, count: usize, final_byte: u8) {
        self.output.put_slice(b"\x1b[");
        self.output.put_slice(count.to_string().as_bytes());
        self.output.put_u8(final_byte);
    }

    fn glyph(&self, byte: u8) -> u8 {
        if self.masked { PASSWORD_MASK } else { byte }
    }
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}
