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

//! # RConsole Service
//!
//! A single-threaded Telnet reactor for a remote administration console.
//!
//! ## Architecture
//!
//! ```text
//! ConnectionListener (poll / dispatch)
//!     ↓
//! ClientSession ── TelnetCodec ── LineEditor ── LoginStateMachine
//!     ↓
//! SendQueue → Transport
//! ```
//!
//! The listener owns every session and is driven by one task; there are no
//! locks and no per-connection tasks. Credential checks, the console log and
//! post-login input are capabilities supplied in a [`ConsoleContext`].
//!
//! ## Example
//!
//! ```no_run
//! use rconsole_service::{ConnectionListener, ConsoleContext, ServerConfig, SessionId};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> rconsole_service::Result<()> {
//!     let context = ConsoleContext::new(
//!         |user: &str, pass: &str| user == "admin" && pass == "secret",
//!         |id: SessionId, line: &str| println!("{id}: {line}"),
//!     );
//!     let mut listener =
//!         ConnectionListener::bind(ServerConfig::new("127.0.0.1", 2323), context).await?;
//!     listener
//!         .run_until(async {
//!             tokio::signal::ctrl_c().await.ok();
//!         })
//!         .await;
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

mod config;
mod error;
mod handler;
mod listener;
mod login;
mod sendq;
mod session;
mod transport;
mod types;

pub use config::{
    DEFAULT_MAX_PENDING_INPUT, DEFAULT_READ_CHUNK_SIZE, DEFAULT_WRITE_INCREMENT, ServerConfig,
};
pub use error::{ConsoleError, Result};
pub use handler::{Authenticator, ConsoleContext, LineSink, Logger, TracingLogger};
pub use listener::{ConnectionListener, InterestSet, ReadySet};
pub use login::{
    LOGIN_INCORRECT, LOGIN_REQUIRED, LOGIN_SUCCESSFUL, LoginStateMachine, LoginStep,
    PASSWORD_PROMPT, USERNAME_PROMPT,
};
pub use sendq::SendQueue;
pub use session::ClientSession;
pub use transport::Transport;
#[cfg(any(test, feature = "test-util"))]
pub use transport::MemoryTransport;
pub use types::{CloseReason, ListenerSnapshot, LoginState, SessionId, SessionInfo};
