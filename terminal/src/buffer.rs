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

/// Line being typed, with an editing cursor.
///
/// Every operation keeps `0 <= cursor <= len`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineBuffer {
    /// Characters typed so far, terminators included until a line is taken
    bytes: Vec<u8>,
    /// Insertion point, 0-indexed
    cursor: usize,
}

impl LineBuffer {
    /// Creates an empty line buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding `bytes` with the cursor clamped to its length
    pub fn with_contents(bytes: &[u8], cursor: usize) -> Self {
        LineBuffer {
            bytes: bytes.to_vec(),
            cursor: cursor.min(bytes.len()),
        }
    }

    // ===== Inspection =====

    /// Current contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of characters held
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Checks if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Gets the cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Characters from the cursor to the end of the line
    pub fn tail(&self) -> &[u8] {
        &self.bytes[self.cursor..]
    }

    // ===== Editing =====

    /// Inserts at the cursor, shifting the tail right, and advances the cursor.
    pub fn insert(&mut self, byte: u8) {
        self.bytes.insert(self.cursor, byte);
        self.cursor += 1;
    }

    /// Replaces the character at the cursor (appending at the end) and advances the cursor.
    pub fn overwrite(&mut self, byte: u8) {
        match self.bytes.get_mut(self.cursor) {
            Some(slot) => *slot = byte,
            None => self.bytes.push(byte),
        }
        self.cursor += 1;
    }

    /// Removes the character before the cursor and steps back. False at column 0.
    pub fn remove_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.bytes.remove(self.cursor);
        true
    }

    /// Removes the character under the cursor. False at the end of the line.
    pub fn remove_at_cursor(&mut self) -> bool {
        if self.cursor >= self.bytes.len() {
            return false;
        }
        self.bytes.remove(self.cursor);
        true
    }

    /// Moves the cursor left by up to `count`, stopping at 0. Returns the distance moved.
    pub fn move_left(&mut self, count: usize) -> usize {
        let moved = count.min(self.cursor);
        self.cursor -= moved;
        moved
    }

    /// Moves the cursor right by up to `count`, stopping at the end. Returns the distance
    /// moved.
    pub fn move_right(&mut self, count: usize) -> usize {
        let moved = count.min(self.bytes.len() - self.cursor);
        self.cursor += moved;
        moved
    }

    // ===== Line-level API =====

    /// Finds the first occurrence of `terminator`, returning its offset.
    pub fn find(&self, terminator: &[u8]) -> Option<usize> {
        if terminator.is_empty() {
            return None;
        }
        self.bytes
            .windows(terminator.len())
            .position(|window| window == terminator)
    }

    /// Splits off the first `len` characters as a completed line, drops the `skip`
    /// terminator bytes after them and rewinds the cursor to 0.
    pub fn take_prefix(&mut self, len: usize, skip: usize) -> Vec<u8> {
        let end = (len + skip).min(self.bytes.len());
        let mut line: Vec<u8> = self.bytes.drain(..end).collect();
        line.truncate(len);
        self.cursor = 0;
        line
    }
}
