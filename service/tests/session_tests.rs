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

//! Session pipeline tests over an in-memory transport

use proptest::prelude::*;
use rconsole_service::{
    ClientSession, CloseReason, ConsoleContext, LoginState, MemoryTransport, ServerConfig,
    SessionId,
};
use rconsole_telnetcodec::ModeFlags;
use rconsole_telnetcodec::consts::{self, option};
use rconsole_telnetcodec::naws::WindowSize;
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

type Lines = Arc<Mutex<Vec<String>>>;

fn create_session() -> (ClientSession<MemoryTransport>, Lines) {
    let lines: Lines = Arc::default();
    let sink = lines.clone();
    let context = ConsoleContext::new(
        |user: &str, pass: &str| user == "admin" && pass == "secret",
        move |_: SessionId, line: &str| sink.lock().unwrap().push(line.to_string()),
    );
    let session = ClientSession::new(
        SessionId::new(1),
        "192.0.2.10:50000".parse().unwrap(),
        MemoryTransport::new(),
        &ServerConfig::default(),
        context,
    );
    (session, lines)
}

fn feed(session: &mut ClientSession<MemoryTransport>, bytes: &[u8]) -> bool {
    session.transport_mut().push_read(bytes);
    session.on_readable()
}

/// Feed `stream` to a fresh session in chunks ending at each of `cuts`.
fn feed_split(stream: &[u8], cuts: &[usize]) -> (ClientSession<MemoryTransport>, Vec<String>) {
    let (mut session, lines) = create_session();
    let mut start = 0;
    let end = stream.len();
    for &cut in cuts.iter().chain(std::iter::once(&end)) {
        let cut = cut.clamp(start, end);
        if cut > start {
            feed(&mut session, &stream[start..cut]);
        }
        start = cut;
    }
    let lines = lines.lock().unwrap().clone();
    (session, lines)
}

fn console_stream() -> Vec<u8> {
    let mut stream = Vec::new();
    stream.extend_from_slice(&[consts::IAC, consts::DO, option::ECHO]);
    stream.extend_from_slice(&[consts::IAC, consts::WILL, option::NAWS]);
    stream.extend_from_slice(b"adm");
    stream.extend_from_slice(&[
        consts::IAC,
        consts::SB,
        option::NAWS,
        0x00,
        0x00,
        0x84,
        0x00,
        0x2B,
        consts::IAC,
        consts::SE,
    ]);
    stream.extend_from_slice(b"in\r\nsecret\r\n");
    stream.extend_from_slice(b"stat\x1b[2Dx\x1b[2C!\r\n");
    stream.extend_from_slice(&[
        consts::IAC,
        consts::SB,
        option::LINEMODE,
        option::linemode::SLC,
        10,
        2,
        0x7F,
        consts::IAC,
        consts::SE,
    ]);
    stream.extend_from_slice(b"uptimee\x7f\x1b[3~\r\n");
    stream.extend_from_slice(&[consts::IAC, consts::NOP]);
    stream.extend_from_slice(b"ab\x1b[2~\x1b[DX\x1b[C\r\n");
    stream
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_full_console_stream() {
    let (session, lines) = feed_split(&console_stream(), &[]);
    assert_eq!(session.login_state(), LoginState::LoggedIn);
    assert_eq!(session.username(), Some("admin"));
    assert_eq!(session.window_size(), WindowSize::new(132, 43));
    assert!(session.modes().contains(ModeFlags::ECHO | ModeFlags::NAWS));
    assert!(!session.modes().contains(ModeFlags::INSERT));
    assert_eq!(
        lines,
        vec![
            "stxat!".to_string(),
            "uptime".to_string(),
            "aX".to_string()
        ]
    );
    assert!(session.pending_input().is_empty());
}

#[test]
fn test_two_reads_one_line() {
    let (mut session, lines) = create_session();
    feed(&mut session, b"admin\r\nsecret\r\n");
    feed(&mut session, b"a");
    feed(&mut session, b"b\r\n");
    assert_eq!(*lines.lock().unwrap(), vec!["ab".to_string()]);
}

#[test]
fn test_unknown_options_are_ignored() {
    let (mut session, lines) = create_session();
    let before = session.modes();
    assert!(feed(
        &mut session,
        &[consts::IAC, consts::WILL, option::TTYPE, consts::IAC, consts::DO, 0x2A]
    ));
    assert!(feed(&mut session, &[consts::IAC, consts::SB, option::TTYPE, 1, consts::IAC, consts::SE]));
    assert_eq!(session.modes(), before);
    feed(&mut session, b"admin\r\nsecret\r\nok\r\n");
    assert_eq!(*lines.lock().unwrap(), vec!["ok".to_string()]);
}

#[test]
fn test_malformed_subnegotiation_keeps_session() {
    let (mut session, _) = create_session();
    assert!(feed(
        &mut session,
        &[consts::IAC, consts::SB, option::NAWS, 1, 2, 3, consts::IAC, consts::SE]
    ));
    assert_eq!(session.window_size(), WindowSize::default());
    assert!(feed(
        &mut session,
        &[consts::IAC, consts::SB, option::LINEMODE, option::linemode::SLC, 3, 2, consts::IAC, consts::SE]
    ));
    assert!(session.codec().slc().is_empty());
    assert!(!session.must_close());
}

#[test]
fn test_interrupt_mid_stream() {
    let (mut session, lines) = create_session();
    feed(&mut session, b"admin\r\nsecret\r\n");
    assert!(!feed(&mut session, b"one\r\ntw\x03o\r\n"));
    assert_eq!(session.close_reason(), Some(CloseReason::Interrupted));
    assert_eq!(*lines.lock().unwrap(), vec!["one".to_string()]);
}

#[test]
fn test_session_info() {
    let (mut session, _) = create_session();
    feed(&mut session, b"admin\r\n");
    let info = session.info();
    assert_eq!(info.id, SessionId::new(1));
    assert_eq!(info.peer_addr, "192.0.2.10:50000".parse().unwrap());
    assert_eq!(info.login_state, LoginState::AskedPassword);
    assert_eq!(info.username.as_deref(), Some("admin"));
    assert_eq!(info.queued_bytes, 0);
    assert!(info.last_activity >= info.created_at);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn split_reads_process_identically(cuts in proptest::collection::vec(0usize..160, 0..10)) {
        let stream = console_stream();
        let mut cuts = cuts;
        cuts.sort_unstable();

        let (whole, whole_lines) = feed_split(&stream, &[]);
        let (split, split_lines) = feed_split(&stream, &cuts);

        prop_assert_eq!(whole_lines, split_lines);
        prop_assert_eq!(whole.modes(), split.modes());
        prop_assert_eq!(whole.codec().slc(), split.codec().slc());
        prop_assert_eq!(whole.window_size(), split.window_size());
        prop_assert_eq!(whole.login_state(), split.login_state());
        prop_assert_eq!(whole.transport().written(), split.transport().written());
    }

    #[test]
    fn arbitrary_input_never_panics(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..64), 0..8)
    ) {
        let (mut session, _) = create_session();
        for chunk in chunks {
            if !feed(&mut session, &chunk) {
                break;
            }
            prop_assert!(session.editor().buffer().cursor() <= session.editor().buffer().len());
        }
    }
}
