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

//! Error types for the console service

use crate::types::SessionId;
use thiserror::Error;

/// Result type for operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Console service error types
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// I/O error from the underlying TCP stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The listening socket could not be bound
    #[error("Unable to bind {address}: {source}")]
    Bind {
        /// Address that was requested
        address: String,
        /// Underlying failure
        source: std::io::Error,
    },

    /// The configured listen address does not parse
    #[error("Invalid listen address {0:?}")]
    InvalidAddress(String),

    /// Protocol error from the codec layer
    #[error("Protocol error: {0}")]
    Codec(#[from] rconsole_telnetcodec::CodecError),

    /// Session with the given ID was not found
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    /// Session has been closed
    #[error("Session closed")]
    SessionClosed,

    /// Maximum number of sessions reached
    #[error("Maximum sessions ({0}) reached")]
    MaxSessionsReached(usize),
}

impl ConsoleError {
    /// Check if the error is scoped to one session
    ///
    /// Session errors leave the listener and every other session running.
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            ConsoleError::SessionNotFound(_)
                | ConsoleError::SessionClosed
                | ConsoleError::Io(_)
                | ConsoleError::Codec(_)
        )
    }
}
