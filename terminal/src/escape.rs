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

//! Bounded matcher for the handful of CSI sequences the line editor understands:
//! `ESC[nD`, `ESC[nC`, `ESC[A`, `ESC[B`, `ESC[3~` and `ESC[2~`.

use rconsole_telnetcodec::consts::key::ESCAPE;

/// Longest decimal count accepted inside a sequence
const MAX_COUNT_DIGITS: usize = 4;

/// A recognized editing sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeSequence {
    /// `ESC [ n D`
    CursorLeft(usize),
    /// `ESC [ n C`
    CursorRight(usize),
    /// `ESC [ A`
    CursorUp,
    /// `ESC [ B`
    CursorDown,
    /// `ESC [ 3 ~`
    Delete,
    /// `ESC [ 2 ~`
    InsertToggle,
}

/// Result of matching at an ESC byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeMatch {
    /// The buffered bytes are a prefix of a supported sequence
    Incomplete,
    /// Not a supported sequence; only the ESC byte is consumed
    Unrecognized,
    /// A supported sequence spanning `len` bytes
    Recognized {
        /// The sequence
        sequence: EscapeSequence,
        /// Bytes spanned, ESC included
        len: usize,
    },
}

/// Match a supported CSI sequence at the start of `src`, which begins with ESC.
pub fn match_escape(src: &[u8]) -> EscapeMatch {
    debug_assert_eq!(src.first(), Some(&ESCAPE));
    match src.get(1) {
        None => return EscapeMatch::Incomplete,
        Some(b'[') => {}
        Some(_) => return EscapeMatch::Unrecognized,
    }

    let digits = src[2..]
        .iter()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if digits > MAX_COUNT_DIGITS {
        return EscapeMatch::Unrecognized;
    }
    let final_at = 2 + digits;
    let Some(&final_byte) = src.get(final_at) else {
        return EscapeMatch::Incomplete;
    };
    let count = &src[2..final_at];

    let sequence = match (final_byte, count) {
        (b'D', _) => EscapeSequence::CursorLeft(parse_count(count)),
        (b'C', _) => EscapeSequence::CursorRight(parse_count(count)),
        (b'A', []) => EscapeSequence::CursorUp,
        (b'B', []) => EscapeSequence::CursorDown,
        (b'~', b"3") => EscapeSequence::Delete,
        (b'~', b"2") => EscapeSequence::InsertToggle,
        _ => return EscapeMatch::Unrecognized,
    };
    EscapeMatch::Recognized {
        sequence,
        len: final_at + 1,
    }
}

/// An absent or zero count means one.
fn parse_count(digits: &[u8]) -> usize {
    let count = digits
        .iter()
        .fold(0usize, |acc, digit| acc * 10 + usize::from(digit - b'0'));
    count.max(1)
}
