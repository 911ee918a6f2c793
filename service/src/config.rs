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

//! Listener configuration
//!
//! # Examples
//!
//! ```
//! use rconsole_service::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::new("127.0.0.1", 2323)
//!     .with_max_sessions(Some(8))
//!     .with_poll_timeout(Duration::from_millis(250))
//!     .with_greeting("Welcome to the admin console.\r\n");
//! ```
//!
//! A configuration without an address (or with port 0) disables the listening
//! socket; the reactor still services sessions added to it.

use crate::{ConsoleError, Result};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Default bounded read size
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8192;

/// Default send window floor and step
pub const DEFAULT_WRITE_INCREMENT: usize = 1400;

/// Default limit on raw input left unconsumed between reads
pub const DEFAULT_MAX_PENDING_INPUT: usize = 64 * 1024;

/// Console listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on; `None` or empty disables listening
    pub address: Option<String>,

    /// Port to listen on; 0 disables listening
    pub port: u16,

    /// Largest single non-blocking read
    pub read_chunk_size: usize,

    /// Send queue window floor and additive step
    pub write_increment: usize,

    /// Longest a single poll may suspend
    pub poll_timeout: Duration,

    /// Most raw input a session may hold unconsumed, such as an unterminated
    /// subnegotiation, before it is closed
    pub max_pending_input: usize,

    /// Maximum live sessions (None for unlimited)
    pub max_sessions: Option<usize>,

    /// Banner written before the first username prompt
    pub greeting: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: 0,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            write_increment: DEFAULT_WRITE_INCREMENT,
            poll_timeout: Duration::from_secs(1),
            max_pending_input: DEFAULT_MAX_PENDING_INPUT,
            max_sessions: None,
            greeting: "Welcome to the remote console.\r\nPlease login with your account details.\r\n"
                .to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a configuration listening on `address:port`
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: Some(address.into()),
            port,
            ..Default::default()
        }
    }

    /// Create a configuration with listening disabled
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Set the bounded read size
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }

    /// Set the send window increment
    pub fn with_write_increment(mut self, increment: usize) -> Self {
        self.write_increment = increment.max(1);
        self
    }

    /// Set the poll timeout
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the unconsumed input limit
    pub fn with_max_pending_input(mut self, limit: usize) -> Self {
        self.max_pending_input = limit.max(1);
        self
    }

    /// Set the maximum number of sessions
    pub fn with_max_sessions(mut self, max: Option<usize>) -> Self {
        self.max_sessions = max;
        self
    }

    /// Set the greeting banner
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// True when both an address and a non-zero port are configured
    pub fn is_listening_enabled(&self) -> bool {
        self.port > 0 && self.address.as_deref().is_some_and(|addr| !addr.is_empty())
    }

    /// Resolve the socket address to bind.
    ///
    /// Returns `Ok(None)` when listening is disabled and
    /// [`ConsoleError::InvalidAddress`] when the address is not an IP literal.
    pub fn socket_addr(&self) -> Result<Option<SocketAddr>> {
        if !self.is_listening_enabled() {
            return Ok(None);
        }
        let address = self.address.as_deref().unwrap_or_default();
        let ip: IpAddr = address
            .parse()
            .map_err(|_| ConsoleError::InvalidAddress(address.to_string()))?;
        Ok(Some(SocketAddr::new(ip, self.port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.read_chunk_size, 8192);
        assert_eq!(config.write_increment, 1400);
        assert_eq!(config.poll_timeout, Duration::from_secs(1));
        assert_eq!(config.max_pending_input, 64 * 1024);
        assert!(config.max_sessions.is_none());
        assert!(!config.is_listening_enabled());
    }

    #[test]
    fn test_listening_requires_address_and_port() {
        assert!(ServerConfig::new("127.0.0.1", 23).is_listening_enabled());
        assert!(!ServerConfig::new("127.0.0.1", 0).is_listening_enabled());
        assert!(!ServerConfig::new("", 23).is_listening_enabled());
        assert!(ServerConfig::new("", 23).socket_addr().unwrap().is_none());
    }

    #[test]
    fn test_socket_addr() {
        let addr = ServerConfig::new("::1", 2323).socket_addr().unwrap();
        assert_eq!(addr, Some("[::1]:2323".parse().unwrap()));

        let err = ServerConfig::new("console.local", 2323).socket_addr().unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidAddress(addr) if addr == "console.local"));
    }

    #[test]
    fn test_builder_floors() {
        let config = ServerConfig::disabled()
            .with_read_chunk_size(0)
            .with_write_increment(0)
            .with_max_pending_input(0);
        assert_eq!(config.read_chunk_size, 1);
        assert_eq!(config.write_increment, 1);
        assert_eq!(config.max_pending_input, 1);
    }
}
