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

//! Capabilities the console calls out to
//!
//! The reactor never reaches for process-wide state. Credential checks, the
//! console log and post-login input are delegated to the capabilities bundled
//! in a [`ConsoleContext`] handed to the listener at construction.
//!
//! Closures implement each trait, so a host can wire the console quickly:
//!
//! ```no_run
//! use rconsole_service::{ConsoleContext, SessionId};
//!
//! let context = ConsoleContext::new(
//!     |user: &str, pass: &str| user == "admin" && pass == "secret",
//!     |id: SessionId, line: &str| println!("{id}: {line}"),
//! );
//! ```

use crate::SessionId;
use std::fmt;
use std::sync::Arc;

/// Verifies login credentials
pub trait Authenticator: Send + Sync + 'static {
    /// True when `password` is correct for `username`
    fn verify(&self, username: &str, password: &str) -> bool;
}

impl<F> Authenticator for F
where
    F: Fn(&str, &str) -> bool + Send + Sync + 'static,
{
    fn verify(&self, username: &str, password: &str) -> bool {
        self(username, password)
    }
}

/// Receives lines typed after a successful login
pub trait LineSink: Send + Sync + 'static {
    /// Called once per complete line, in arrival order
    fn on_line(&self, id: SessionId, line: &str);
}

impl<F> LineSink for F
where
    F: Fn(SessionId, &str) + Send + Sync + 'static,
{
    fn on_line(&self, id: SessionId, line: &str) {
        self(id, line)
    }
}

/// Console log of connects, disconnects and logins
pub trait Logger: Send + Sync + 'static {
    /// Record one message
    fn log(&self, message: &str);
}

/// Forwards console log messages to `tracing` at info level
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Capabilities shared by every session of one listener
#[derive(Clone)]
pub struct ConsoleContext {
    /// Credential check
    pub authenticator: Arc<dyn Authenticator>,
    /// Post-login input
    pub line_sink: Arc<dyn LineSink>,
    /// Console log
    pub logger: Arc<dyn Logger>,
}

impl ConsoleContext {
    /// Bundle an authenticator and a line sink with the [`TracingLogger`]
    pub fn new(authenticator: impl Authenticator, line_sink: impl LineSink) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
            line_sink: Arc::new(line_sink),
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the logger
    pub fn with_logger(mut self, logger: impl Logger) -> Self {
        self.logger = Arc::new(logger);
        self
    }
}

impl fmt::Debug for ConsoleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleContext").finish_non_exhaustive()
    }
}
