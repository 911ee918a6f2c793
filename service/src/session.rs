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

//! One console connection
//!
//! A [`ClientSession`] owns its transport and runs the input pipeline:
//!
//! ```text
//! transport → raw input → telnet commands ┬→ codec state (modes, SLC, NAWS)
//!                                         └→ data bytes → LineEditor → lines
//! lines → LoginStateMachine until logged in, then the LineSink
//! echo, prompts and negotiation → SendQueue → transport
//! ```
//!
//! Input that ends part way through a telnet command or an escape sequence
//! stays buffered, untouched, until the next read completes it.

use crate::config::ServerConfig;
use crate::handler::ConsoleContext;
use crate::login::{LoginStateMachine, LoginStep};
use crate::sendq::SendQueue;
use crate::transport::Transport;
use crate::types::{CloseReason, LoginState, SessionId, SessionInfo};
use crate::{ConsoleError, Result};
use bytes::{Buf, BytesMut};
use chrono::Local;
use metrics::counter;
use rconsole_telnetcodec::naws::WindowSize;
use rconsole_telnetcodec::{
    Decoded, ModeFlags, TelnetAction, TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption, consts,
    decode_command,
};
use rconsole_terminal::{EditOutcome, LineEditor};
use std::io;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::TcpStream;
use tokio_util::codec::Encoder;
use tracing::{debug, info, instrument, trace, warn};

/// Options requested from every new peer, in order
const INITIAL_NEGOTIATION: [(TelnetAction, TelnetOption); 5] = [
    (TelnetAction::Do, TelnetOption::TransmitBinary),
    (TelnetAction::Will, TelnetOption::Echo),
    (TelnetAction::Do, TelnetOption::SuppressGoAhead),
    (TelnetAction::Do, TelnetOption::Linemode),
    (TelnetAction::Do, TelnetOption::NAWS),
];

/// A console connection and its protocol, editing and login state
pub struct ClientSession<T: Transport = TcpStream> {
    id: SessionId,
    peer_addr: SocketAddr,
    transport: T,
    codec: TelnetCodec,
    editor: LineEditor,
    login: LoginStateMachine,
    sendq: SendQueue,
    input: BytesMut,
    read_chunk_size: usize,
    max_pending_input: usize,
    context: ConsoleContext,
    created_at: Instant,
    last_activity: Instant,
    close_reason: Option<CloseReason>,
}

impl<T: Transport> ClientSession<T> {
    /// Wraps a freshly accepted transport.
    ///
    /// Sends the greeting and username prompt, enables insert mode and opens
    /// negotiation for BINARY, ECHO, SGA, LINEMODE and NAWS.
    #[instrument(level = "debug", skip_all, fields(session_id = %id, peer = %peer_addr))]
    pub fn new(
        id: SessionId,
        peer_addr: SocketAddr,
        transport: T,
        config: &ServerConfig,
        context: ConsoleContext,
    ) -> Self {
        let now = Instant::now();
        let mut session = Self {
            id,
            peer_addr,
            transport,
            codec: TelnetCodec::new(),
            editor: LineEditor::new(),
            login: LoginStateMachine::new(),
            sendq: SendQueue::new(config.write_increment),
            input: BytesMut::with_capacity(config.read_chunk_size),
            read_chunk_size: config.read_chunk_size.max(1),
            max_pending_input: config.max_pending_input,
            context,
            created_at: now,
            last_activity: now,
            close_reason: None,
        };

        let banner = format!("{}{}", config.greeting, session.login.start());
        session.write_str(&banner);
        session.codec.set_mode(ModeFlags::INSERT, true);
        for (action, option) in INITIAL_NEGOTIATION {
            session.set_option(action, option);
        }
        debug!("Session opened");
        session
    }

    // ===== Inspection =====

    /// Session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Peer address
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Login progress
    pub fn login_state(&self) -> LoginState {
        self.login.state()
    }

    /// Username given so far
    pub fn username(&self) -> Option<&str> {
        self.login.username()
    }

    /// Negotiated and editing modes
    pub fn modes(&self) -> ModeFlags {
        self.codec.modes()
    }

    /// Terminal size reported by the peer
    pub fn window_size(&self) -> WindowSize {
        self.codec.window_size()
    }

    /// Protocol state
    pub fn codec(&self) -> &TelnetCodec {
        &self.codec
    }

    /// Line editor state
    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    /// Raw input not yet consumed
    pub fn pending_input(&self) -> &[u8] {
        &self.input
    }

    /// Bytes waiting in the send queue
    pub fn queued_bytes(&self) -> usize {
        self.sendq.len()
    }

    /// True while output is queued; the reactor then polls for writability
    pub fn wants_write(&self) -> bool {
        !self.sendq.is_empty()
    }

    /// True once the session should be removed
    pub fn must_close(&self) -> bool {
        self.close_reason.is_some()
    }

    /// Why the session is closing, if it is
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.close_reason
    }

    /// Last read or write
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Snapshot for the host
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            peer_addr: self.peer_addr,
            login_state: self.login.state(),
            username: self.login.username().map(str::to_string),
            window_size: self.codec.window_size(),
            modes: self.codec.modes(),
            queued_bytes: self.sendq.len(),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }

    // ===== Input =====

    /// Reads one bounded chunk and processes it.
    ///
    /// Returns false when the session should be closed: the peer hung up, the
    /// read failed, the input asked for it, or it left more than
    /// `max_pending_input` bytes unconsumed.
    pub fn on_readable(&mut self) -> bool {
        if self.must_close() {
            return false;
        }
        let start = self.input.len();
        self.input.resize(start + self.read_chunk_size, 0);
        match self.transport.try_read(&mut self.input[start..]) {
            Ok(0) => {
                self.input.truncate(start);
                debug!(session_id = %self.id, "Peer closed the connection");
                self.close(CloseReason::PeerClosed);
                false
            }
            Ok(read) => {
                self.input.truncate(start + read);
                counter!("rconsole.bytes.received").increment(read as u64);
                self.last_activity = Instant::now();
                trace!(session_id = %self.id, read, "Read input");
                let open = self.process_input();
                if self.input.len() > self.max_pending_input {
                    warn!(
                        session_id = %self.id,
                        pending = self.input.len(),
                        limit = self.max_pending_input,
                        "Unconsumed input over limit"
                    );
                    self.close(CloseReason::InputOverflow);
                    return false;
                }
                open
            }
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                self.input.truncate(start);
                true
            }
            Err(error) => {
                self.input.truncate(start);
                self.fail(error);
                false
            }
        }
    }

    /// Runs the buffered input through the command decoder, the line editor
    /// and the login dialogue. Returns false once the session must close.
    pub fn process_input(&mut self) -> bool {
        let mut pos = 0;
        while pos < self.input.len() && !self.must_close() {
            let byte = self.input[pos];
            if byte == consts::IAC {
                let Decoded::Command { len, event } = decode_command(&self.input[pos..]) else {
                    break;
                };
                pos += len;
                self.on_command(event);
                continue;
            }

            let remapped = self.codec.remap(byte);
            let mut modes = self.codec.modes();
            match self.editor.feed(remapped, &self.input[pos + 1..], &mut modes) {
                EditOutcome::Consumed(len) => {
                    pos += len;
                    self.codec
                        .set_mode(ModeFlags::INSERT, modes.contains(ModeFlags::INSERT));
                    self.drain_lines();
                }
                EditOutcome::Incomplete => break,
                EditOutcome::Interrupted => {
                    self.close(CloseReason::Interrupted);
                    break;
                }
            }
        }
        self.input.advance(pos);
        self.send_echo();
        !self.must_close()
    }

    fn on_command(&mut self, event: TelnetEvent) {
        self.codec.apply(&event);
        match event {
            TelnetEvent::Data(literal) => {
                self.editor.feed_literal(literal, self.codec.modes());
                self.drain_lines();
            }
            TelnetEvent::InvalidSubnegotiation(_) => {}
            event => debug!(session_id = %self.id, ?event, modes = ?self.codec.modes(), "Telnet command"),
        }
    }

    fn drain_lines(&mut self) {
        while let Some(line) = self.editor.take_line(self.codec.modes()) {
            self.send_echo();
            self.dispatch_line(&line);
        }
    }

    fn dispatch_line(&mut self, line: &str) {
        if self.login.state().is_logged_in() {
            trace!(session_id = %self.id, line, "Console input");
            self.context.line_sink.on_line(self.id, line);
            return;
        }
        let Some(step) = self.login.on_line(line, self.context.authenticator.as_ref()) else {
            return;
        };
        self.write_str(step.text());
        if step == LoginStep::Accepted {
            let username = self.login.username().unwrap_or_default();
            info!(session_id = %self.id, username, "Login successful");
            self.context.logger.log(&format!(
                "Successful telnet login from {} on {}",
                username,
                Local::now().to_rfc2822()
            ));
        }
        self.editor
            .set_masked(self.login.state() == LoginState::AskedPassword);
    }

    // ===== Output =====

    /// Sends `data`, doubling any IAC byte. Returns the bytes the transport
    /// took right away; the rest is queued. Failures are logged and count as
    /// nothing sent, see [`ClientSession::try_write`].
    pub fn write(&mut self, data: &[u8]) -> usize {
        match self.try_write(data) {
            Ok(sent) => sent,
            Err(error) if error.is_session_error() => {
                debug!(session_id = %self.id, %error, "Output dropped");
                0
            }
            Err(error) => {
                warn!(session_id = %self.id, %error, "Output dropped");
                0
            }
        }
    }

    /// Like [`ClientSession::write`], but reports a closing session or an
    /// encoding failure instead of dropping the output.
    pub fn try_write(&mut self, data: &[u8]) -> Result<usize> {
        if self.must_close() {
            return Err(ConsoleError::SessionClosed);
        }
        if data.is_empty() {
            return Ok(0);
        }
        let mut escaped = BytesMut::with_capacity(data.len());
        Encoder::<&[u8]>::encode(&mut self.codec, data, &mut escaped)?;
        Ok(self.send(&escaped))
    }

    /// Sends a string, see [`ClientSession::write`]
    pub fn write_str(&mut self, text: &str) -> usize {
        self.write(text.as_bytes())
    }

    /// Sends `IAC <action> <option>`
    pub fn set_option(&mut self, action: TelnetAction, option: TelnetOption) {
        let mut frame = BytesMut::with_capacity(3);
        match self
            .codec
            .encode(TelnetFrame::Negotiate(action, option), &mut frame)
        {
            Ok(()) => {
                self.send(&frame);
            }
            Err(error) => warn!(session_id = %self.id, %error, "Unable to encode negotiation"),
        }
    }

    /// Sends up to one window of queued output. Called on writable readiness.
    pub fn flush(&mut self) -> usize {
        match self.sendq.flush(&mut self.transport) {
            Ok(sent) => {
                if sent > 0 || self.sendq.is_empty() {
                    self.last_activity = Instant::now();
                }
                sent
            }
            Err(error) => {
                self.fail(error);
                0
            }
        }
    }

    /// Marks the session for removal. The first reason sticks.
    pub fn close(&mut self, reason: CloseReason) {
        if self.close_reason.is_none() {
            self.close_reason = Some(reason);
        }
    }

    fn send_echo(&mut self) {
        if self.editor.has_output() {
            let echo = self.editor.take_output();
            self.send(&echo);
        }
    }

    fn send(&mut self, data: &[u8]) -> usize {
        if self.must_close() {
            return 0;
        }
        let immediate = self.sendq.is_empty();
        match self.sendq.write(&mut self.transport, data) {
            Ok(sent) => {
                if immediate {
                    self.last_activity = Instant::now();
                }
                sent
            }
            Err(error) => {
                self.fail(error);
                0
            }
        }
    }

    fn fail(&mut self, error: io::Error) {
        warn!(session_id = %self.id, peer = %self.peer_addr, %error, "Session I/O failed");
        self.sendq.reset();
        self.close(CloseReason::IoError);
    }
}

impl<T: Transport> std::fmt::Debug for ClientSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .field("login_state", &self.login.state())
            .field("modes", &self.codec.modes())
            .field("queued_bytes", &self.sendq.len())
            .field("close_reason", &self.close_reason)
            .finish()
    }
}
