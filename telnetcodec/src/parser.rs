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

//! Stateless IAC command decoding.
//!
//! [`decode_command`] looks at the bytes starting at an IAC and either reports how many
//! bytes one complete command spans together with its meaning, or reports that more input
//! is needed. It never touches session state; callers apply the decoded event themselves
//! (see [`crate::TelnetCodec::apply`]).

use crate::args::{TelnetArgument, unescape_iac};
use crate::consts;
use crate::event::TelnetEvent;
use crate::options::{TelnetAction, TelnetOption};
use tracing::{debug, warn};

/// Outcome of decoding at an IAC position
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// The command is not fully buffered yet; nothing was consumed
    Incomplete,
    /// A complete command spanning `len` bytes from the IAC
    Command {
        /// Bytes consumed, IAC included
        len: usize,
        /// What the command means
        event: TelnetEvent,
    },
}

/// Decode exactly one command from `src`, which must start at an IAC byte.
///
/// A slice that does not start with IAC decodes as a single data byte.
pub fn decode_command(src: &[u8]) -> Decoded {
    match src {
        [] => Decoded::Incomplete,
        [byte, ..] if *byte != consts::IAC => Decoded::Command {
            len: 1,
            event: TelnetEvent::Data(*byte),
        },
        [_] => Decoded::Incomplete,
        [_, command, rest @ ..] => match *command {
            consts::IAC => command_of(2, TelnetEvent::Data(consts::IAC)),
            consts::WILL | consts::WONT | consts::DO | consts::DONT => match rest.first() {
                None => Decoded::Incomplete,
                Some(&option) => {
                    let action = match *command {
                        consts::WILL => TelnetAction::Will,
                        consts::WONT => TelnetAction::Wont,
                        consts::DO => TelnetAction::Do,
                        _ => TelnetAction::Dont,
                    };
                    command_of(
                        3,
                        TelnetEvent::Negotiate(action, TelnetOption::from_u8(option)),
                    )
                }
            },
            consts::SB => decode_subnegotiation(src),
            consts::SE => {
                debug!("Ignoring IAC SE outside of a subnegotiation");
                command_of(2, TelnetEvent::NoOperation)
            }
            consts::NOP => command_of(2, TelnetEvent::NoOperation),
            consts::DM => command_of(2, TelnetEvent::DataMark),
            consts::BRK => command_of(2, TelnetEvent::Break),
            consts::IP => command_of(2, TelnetEvent::InterruptProcess),
            consts::AO => command_of(2, TelnetEvent::AbortOutput),
            consts::AYT => command_of(2, TelnetEvent::AreYouThere),
            consts::EC => command_of(2, TelnetEvent::EraseCharacter),
            consts::EL => command_of(2, TelnetEvent::EraseLine),
            consts::GA => command_of(2, TelnetEvent::GoAhead),
            consts::EOF => command_of(2, TelnetEvent::EndOfFile),
            consts::SUSP => command_of(2, TelnetEvent::Suspend),
            consts::ABORT => command_of(2, TelnetEvent::Abort),
            unknown => {
                warn!("Received Unknown Command {:#X}", unknown);
                command_of(2, TelnetEvent::Unknown(unknown))
            }
        },
    }
}

fn command_of(len: usize, event: TelnetEvent) -> Decoded {
    Decoded::Command { len, event }
}

/// `src` starts with `IAC SB`. The first `IAC SE` ends it, even when that IAC is
/// the second half of a doubled IAC in the payload.
fn decode_subnegotiation(src: &[u8]) -> Decoded {
    let Some(end) = find_terminator(src, 2) else {
        return Decoded::Incomplete;
    };
    let len = end + 2;
    if end == 2 {
        warn!("Received empty subnegotiation");
        return command_of(len, TelnetEvent::NoOperation);
    }

    let option = src[2];
    let payload = unescape_iac(&src[3..end]);
    let event = match TelnetArgument::parse(option, &payload) {
        Ok(TelnetArgument::Unknown(option, payload)) => {
            debug!(
                "Ignoring subnegotiation for unknown option {} ({} bytes)",
                option,
                payload.len()
            );
            TelnetEvent::Subnegotiate(TelnetArgument::Unknown(option, payload))
        }
        Ok(argument) => TelnetEvent::Subnegotiate(argument),
        Err(error) => {
            warn!("Discarding malformed subnegotiation: {}", error);
            TelnetEvent::InvalidSubnegotiation(error)
        }
    };
    command_of(len, event)
}

/// Index of the IAC of the first literal `IAC SE` at or after `from`.
fn find_terminator(src: &[u8], from: usize) -> Option<usize> {
    src.get(from..)?
        .windows(2)
        .position(|pair| pair == [consts::IAC, consts::SE])
        .map(|at| from + at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::linemode::{LineModeOption, SlcFunction};
    use crate::args::naws::WindowSize;
    use crate::consts::{IAC, SB, SE, option};
    use tracing_test::traced_test;

    fn command(src: &[u8]) -> (usize, TelnetEvent) {
        match decode_command(src) {
            Decoded::Command { len, event } => (len, event),
            Decoded::Incomplete => panic!("expected a complete command for {src:02X?}"),
        }
    }

    #[test]
    fn escaped_iac_is_data() {
        assert_eq!(command(&[IAC, IAC, b'x']), (2, TelnetEvent::Data(IAC)));
    }

    #[test]
    fn negotiation_needs_three_bytes() {
        assert_eq!(decode_command(&[IAC]), Decoded::Incomplete);
        assert_eq!(decode_command(&[IAC, consts::WILL]), Decoded::Incomplete);
        assert_eq!(
            command(&[IAC, consts::WILL, option::NAWS, b'a']),
            (
                3,
                TelnetEvent::Negotiate(TelnetAction::Will, TelnetOption::NAWS)
            )
        );
        assert_eq!(
            command(&[IAC, consts::DONT, option::ECHO]),
            (
                3,
                TelnetEvent::Negotiate(TelnetAction::Dont, TelnetOption::Echo)
            )
        );
    }

    #[test]
    fn bare_commands() {
        assert_eq!(command(&[IAC, consts::NOP]), (2, TelnetEvent::NoOperation));
        assert_eq!(command(&[IAC, consts::AYT]), (2, TelnetEvent::AreYouThere));
        assert_eq!(command(&[IAC, consts::EOF]), (2, TelnetEvent::EndOfFile));
        assert_eq!(command(&[IAC, consts::ABORT]), (2, TelnetEvent::Abort));
        assert_eq!(command(&[IAC, SE]), (2, TelnetEvent::NoOperation));
    }

    #[test]
    #[traced_test]
    fn unknown_command_consumes_two_bytes() {
        assert_eq!(command(&[IAC, 0x42, b'z']), (2, TelnetEvent::Unknown(0x42)));
        assert!(logs_contain("Received Unknown Command 0x42"));
    }

    #[test]
    fn naws_subnegotiation() {
        let src = [IAC, SB, option::NAWS, 0x00, 0x00, 0x50, 0x00, 0x18, IAC, SE, b'!'];
        assert_eq!(
            command(&src),
            (
                10,
                TelnetEvent::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::new(
                    80, 24
                )))
            )
        );
    }

    #[test]
    fn subnegotiation_without_terminator_is_incomplete() {
        let src = [IAC, SB, option::LINEMODE, 0x03, 3, 2, 0x1A];
        for end in 2..=src.len() {
            assert_eq!(decode_command(&src[..end]), Decoded::Incomplete);
        }
        assert_eq!(decode_command(&[IAC, SB, option::NAWS, IAC]), Decoded::Incomplete);
    }

    #[test]
    fn doubled_iac_in_payload_is_collapsed() {
        let src = [IAC, SB, option::NAWS, 0x00, IAC, IAC, 0x00, 0x18, IAC, SE];
        assert_eq!(
            command(&src),
            (
                10,
                TelnetEvent::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::new(
                    0x00FF, 0x0018
                )))
            )
        );
    }

    #[test]
    fn first_iac_se_ends_subnegotiation() {
        // the payload ends in a doubled IAC; its second half pairs with SE
        let src = [IAC, SB, option::NAWS, 0x00, 0x50, 0x00, IAC, IAC, SE, b'x'];
        assert_eq!(
            command(&src),
            (
                9,
                TelnetEvent::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::new(
                    80, 0x00FF
                )))
            )
        );

        // a doubled IAC followed by SE mid-payload also terminates there
        let src = [IAC, SB, option::NAWS, 0x00, IAC, IAC, SE, 0x00, 0x18, IAC, SE];
        let (len, event) = command(&src);
        assert_eq!(len, 7);
        assert!(matches!(event, TelnetEvent::InvalidSubnegotiation(_)));
        assert_eq!(decode_command(&src[len..]), command_of(1, TelnetEvent::Data(0x00)));
    }

    #[test]
    fn slc_subnegotiation() {
        let src = [IAC, SB, option::LINEMODE, 0x03, 3, 2, 0x1A, 10, 2, 0x7F, IAC, SE];
        let (len, event) = command(&src);
        assert_eq!(len, src.len());
        let TelnetEvent::Subnegotiate(TelnetArgument::LineMode(LineModeOption::Slc { chars })) =
            event
        else {
            panic!("expected SLC, got {event:?}");
        };
        assert_eq!(chars.len(), 2);
        assert_eq!(chars[0].function, SlcFunction::Ip);
        assert_eq!(chars[1].function, SlcFunction::Ec);
    }

    #[test]
    #[traced_test]
    fn malformed_payload_is_consumed_and_logged() {
        let src = [IAC, SB, option::LINEMODE, 0x03, 3, 2, IAC, SE];
        let (len, event) = command(&src);
        assert_eq!(len, src.len());
        assert!(matches!(event, TelnetEvent::InvalidSubnegotiation(_)));
        assert!(logs_contain("Discarding malformed subnegotiation"));
    }

    #[test]
    fn empty_subnegotiation() {
        assert_eq!(command(&[IAC, SB, IAC, SE]), (4, TelnetEvent::NoOperation));
    }

    #[test]
    fn non_iac_input_is_data() {
        assert_eq!(command(b"abc"), (1, TelnetEvent::Data(b'a')));
        assert_eq!(decode_command(&[]), Decoded::Incomplete);
    }
}
