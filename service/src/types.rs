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

//! Core types for the console service

use rconsole_telnetcodec::ModeFlags;
use rconsole_telnetcodec::naws::WindowSize;
use std::fmt;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Unique identifier for a session (monotonically increasing, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Create a new session ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Progress of the login dialogue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginState {
    /// No prompt outstanding
    #[default]
    NotLoggedIn,
    /// Waiting for a username line
    AskedUsername,
    /// Waiting for a password line; typed characters are masked
    AskedPassword,
    /// Authenticated; lines go to the line sink
    LoggedIn,
}

impl LoginState {
    /// Check if the login dialogue has finished
    pub fn is_logged_in(self) -> bool {
        self == Self::LoggedIn
    }
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoggedIn => write!(f, "not-logged-in"),
            Self::AskedUsername => write!(f, "asked-username"),
            Self::AskedPassword => write!(f, "asked-password"),
            Self::LoggedIn => write!(f, "logged-in"),
        }
    }
}

/// Why a session is being closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer shut the connection down
    PeerClosed,
    /// The peer sent the interrupt character
    Interrupted,
    /// A read or write failed
    IoError,
    /// The listener is shutting down
    Shutdown,
    /// Unconsumed input outgrew its limit
    InputOverflow,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerClosed => write!(f, "client initiated"),
            Self::Interrupted => write!(f, "client ctrl-c"),
            Self::IoError => write!(f, "I/O error"),
            Self::Shutdown => write!(f, "shutdown"),
            Self::InputOverflow => write!(f, "input overflow"),
        }
    }
}

/// Session information snapshot
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Session ID
    pub id: SessionId,
    /// Peer address
    pub peer_addr: SocketAddr,
    /// Login progress
    pub login_state: LoginState,
    /// Username, once given
    pub username: Option<String>,
    /// Negotiated terminal size
    pub window_size: WindowSize,
    /// Negotiated and editing modes
    pub modes: ModeFlags,
    /// Bytes waiting in the send queue
    pub queued_bytes: usize,
    /// When the session was accepted
    pub created_at: Instant,
    /// Last read or write
    pub last_activity: Instant,
}

impl SessionInfo {
    /// Get the session duration
    pub fn duration(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Get the idle duration
    pub fn idle_duration(&self) -> Duration {
        self.last_activity.elapsed()
    }
}

/// Listener snapshot for debug information
#[derive(Debug, Clone)]
pub struct ListenerSnapshot {
    /// Number of live sessions
    pub active_sessions: usize,
    /// Sessions accepted since start
    pub total_sessions: u64,
    /// Bound address, if listening
    pub local_addr: Option<SocketAddr>,
    /// Listener uptime
    pub uptime: Duration,
}

impl fmt::Display for ListenerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.local_addr {
            Some(addr) => write!(
                f,
                "ConnectionListener {{ active: {}, total: {}, addr: {}, uptime: {:?} }}",
                self.active_sessions, self.total_sessions, addr, self.uptime
            ),
            None => write!(
                f,
                "ConnectionListener {{ active: {}, total: {}, addr: disabled, uptime: {:?} }}",
                self.active_sessions, self.total_sessions, self.uptime
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id() {
        let id1 = SessionId::new(1);
        let id2 = SessionId::new(2);

        assert_eq!(id1.as_u64(), 1);
        assert_ne!(id1, id2);
        assert!(id1 < id2);
        assert_eq!(id2.to_string(), "session-2");
    }

    #[test]
    fn test_login_state() {
        assert_eq!(LoginState::default(), LoginState::NotLoggedIn);
        assert!(LoginState::LoggedIn.is_logged_in());
        assert!(!LoginState::AskedPassword.is_logged_in());
        assert_eq!(LoginState::AskedUsername.to_string(), "asked-username");
    }

    #[test]
    fn test_close_reason_display() {
        assert_eq!(CloseReason::Interrupted.to_string(), "client ctrl-c");
        assert_eq!(CloseReason::InputOverflow.to_string(), "input overflow");
    }

    #[test]
    fn test_snapshot_display() {
        let snapshot = ListenerSnapshot {
            active_sessions: 2,
            total_sessions: 5,
            local_addr: None,
            uptime: Duration::from_secs(3),
        };
        assert_eq!(
            snapshot.to_string(),
            "ConnectionListener { active: 2, total: 5, addr: disabled, uptime: 3s }"
        );
    }
}
