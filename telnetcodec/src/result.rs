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

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur in the codec handling process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    #[error("I/O error during {operation}: {kind:?}")]
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },

    /// Error occurred while interpreting a subnegotiation payload.
    #[error("Subnegotiation error for option {option:#04X}: {reason}")]
    SubnegotiationError {
        /// The telnet option being subnegotiated
        option: u8,
        /// Specific reason for the failure
        reason: SubnegotiationErrorKind,
    },
}

/// Specific kinds of subnegotiation errors with structured context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubnegotiationErrorKind {
    /// Payload length does not match what the option requires.
    #[error("invalid length (expected: {expected}, actual: {actual})")]
    InvalidLength {
        /// Description of the accepted length(s)
        expected: &'static str,
        /// Number of bytes present
        actual: usize,
    },

    /// Invalid command byte in the subnegotiation data.
    #[error("invalid command: {command:#04X}")]
    InvalidCommand {
        /// The invalid command byte
        command: u8,
    },

    /// Subnegotiation carried no payload at all.
    #[error("empty payload")]
    Empty,
}

/// `tokio_util` codecs require their error type to absorb I/O errors.
impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}
