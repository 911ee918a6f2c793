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

//! Single-threaded console reactor
//!
//! [`ConnectionListener`] owns the optional listening socket and every
//! session. One task drives it: [`ConnectionListener::poll`] is the only
//! place it waits, and [`ConnectionListener::dispatch`] services whatever
//! became ready before sessions that asked to close are removed.
//!
//! ```no_run
//! use rconsole_service::{ConnectionListener, ConsoleContext, ServerConfig, SessionId};
//!
//! # async fn run() -> rconsole_service::Result<()> {
//! let context = ConsoleContext::new(
//!     |user: &str, pass: &str| user == "admin" && pass == "secret",
//!     |id: SessionId, line: &str| println!("{id}: {line}"),
//! );
//! let mut listener = ConnectionListener::bind(ServerConfig::new("127.0.0.1", 2323), context).await?;
//! listener.run_until(async { tokio::signal::ctrl_c().await.ok(); }).await;
//! # Ok(())
//! # }
//! ```

use crate::config::ServerConfig;
use crate::handler::ConsoleContext;
use crate::session::ClientSession;
use crate::types::{CloseReason, ListenerSnapshot, SessionId, SessionInfo};
use crate::{ConsoleError, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use metrics::{counter, gauge};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::{Interest, Ready};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Sockets the next poll should watch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestSet {
    /// Watch the listening socket for new connections
    pub accept: bool,
    /// Sessions watched for input (every live session)
    pub readable: Vec<SessionId>,
    /// Sessions watched for output room (those with queued output)
    pub writable: Vec<SessionId>,
}

impl InterestSet {
    fn interest_for(&self, id: SessionId) -> Option<Interest> {
        let read = self.readable.contains(&id);
        let write = self.writable.contains(&id);
        match (read, write) {
            (true, true) => Some(Interest::READABLE | Interest::WRITABLE),
            (true, false) => Some(Interest::READABLE),
            (false, true) => Some(Interest::WRITABLE),
            (false, false) => None,
        }
    }
}

/// What a poll found ready
#[derive(Debug, Default)]
pub struct ReadySet {
    /// Outcome of an accept on the listening socket
    pub accepted: Option<io::Result<(TcpStream, SocketAddr)>>,
    /// Sessions with input or a hang-up pending
    pub readable: Vec<SessionId>,
    /// Sessions with room to write
    pub writable: Vec<SessionId>,
}

impl ReadySet {
    /// True when nothing became ready before the timeout
    pub fn is_empty(&self) -> bool {
        self.accepted.is_none() && self.readable.is_empty() && self.writable.is_empty()
    }

    fn record(&mut self, id: SessionId, readiness: io::Result<Ready>) {
        match readiness {
            Ok(ready) => {
                if ready.is_readable() || ready.is_read_closed() {
                    self.readable.push(id);
                }
                if ready.is_writable() || ready.is_write_closed() {
                    self.writable.push(id);
                }
            }
            // let the read surface the failure
            Err(_) => self.readable.push(id),
        }
    }
}

/// Listening socket plus the registry of live sessions
pub struct ConnectionListener {
    config: ServerConfig,
    context: ConsoleContext,
    listener: Option<TcpListener>,
    local_addr: Option<SocketAddr>,
    sessions: Vec<ClientSession>,
    next_id: u64,
    total_sessions: u64,
    started_at: Instant,
}

impl ConnectionListener {
    /// Binds the configured address.
    ///
    /// A configuration without an address or port yields a listener with no
    /// socket, which is not an error. An address that does not parse or
    /// cannot be bound is.
    pub async fn bind(config: ServerConfig, context: ConsoleContext) -> Result<Self> {
        match config.socket_addr()? {
            Some(addr) => {
                let listener =
                    TcpListener::bind(addr)
                        .await
                        .map_err(|source| ConsoleError::Bind {
                            address: addr.to_string(),
                            source,
                        })?;
                Self::with_listener(listener, config, context)
            }
            None => {
                info!("Console listening disabled");
                Ok(Self::new(None, None, config, context))
            }
        }
    }

    /// Serves an already bound socket, ignoring the configured address.
    pub fn with_listener(
        listener: TcpListener,
        config: ServerConfig,
        context: ConsoleContext,
    ) -> Result<Self> {
        let local_addr = listener.local_addr()?;
        info!("Listening for telnet input on {}", local_addr);
        context
            .logger
            .log(&format!("Listening for telnet input on {local_addr}"));
        Ok(Self::new(Some(listener), Some(local_addr), config, context))
    }

    fn new(
        listener: Option<TcpListener>,
        local_addr: Option<SocketAddr>,
        config: ServerConfig,
        context: ConsoleContext,
    ) -> Self {
        Self {
            config,
            context,
            listener,
            local_addr,
            sessions: Vec::new(),
            next_id: 1,
            total_sessions: 0,
            started_at: Instant::now(),
        }
    }

    /// Bound address, if listening
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// True while the listening socket is open
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Live sessions in accept order
    pub fn sessions(&self) -> impl Iterator<Item = &ClientSession> {
        self.sessions.iter()
    }

    /// Look up a live session
    pub fn session(&self, id: SessionId) -> Option<&ClientSession> {
        self.sessions.iter().find(|session| session.id() == id)
    }

    /// Look up a live session to write to it
    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut ClientSession> {
        self.sessions.iter_mut().find(|session| session.id() == id)
    }

    /// Writes `data` to one session from outside the reactor loop.
    ///
    /// Fails with [`ConsoleError::SessionNotFound`] for an unknown or already
    /// removed session and [`ConsoleError::SessionClosed`] for one that is
    /// waiting to be removed.
    pub fn send_to(&mut self, id: SessionId, data: &[u8]) -> Result<usize> {
        self.session_mut(id)
            .ok_or(ConsoleError::SessionNotFound(id))?
            .try_write(data)
    }

    /// Snapshots of every live session
    pub fn session_info(&self) -> Vec<SessionInfo> {
        self.sessions.iter().map(ClientSession::info).collect()
    }

    /// Listener configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Snapshot of the listener state
    pub fn snapshot(&self) -> ListenerSnapshot {
        ListenerSnapshot {
            active_sessions: self.sessions.len(),
            total_sessions: self.total_sessions,
            local_addr: self.local_addr,
            uptime: self.started_at.elapsed(),
        }
    }

    // ===== Reactor =====

    /// The listening socket and every session for reading; sessions with
    /// queued output for writing.
    pub fn collect_interest(&self) -> InterestSet {
        InterestSet {
            accept: self.listener.is_some(),
            readable: self.sessions.iter().map(ClientSession::id).collect(),
            writable: self
                .sessions
                .iter()
                .filter(|session| session.wants_write())
                .map(ClientSession::id)
                .collect(),
        }
    }

    /// Waits up to `timeout` for any socket in `interest` to become ready.
    ///
    /// A pending connection is accepted here, since accepting is how the
    /// listening socket reports readiness. Everything else is only observed.
    pub async fn poll(&self, interest: &InterestSet, timeout: Duration) -> ReadySet {
        let mut ready = ReadySet::default();
        let mut sessions: FuturesUnordered<_> = self
            .sessions
            .iter()
            .filter_map(|session| {
                let wanted = interest.interest_for(session.id())?;
                let stream = session.transport();
                Some(async move { (session.id(), stream.ready(wanted).await) })
            })
            .collect();
        let accept = async {
            match &self.listener {
                Some(listener) if interest.accept => listener.accept().await,
                _ => std::future::pending().await,
            }
        };

        tokio::select! {
            accepted = accept => ready.accepted = Some(accepted),
            Some((id, readiness)) = sessions.next() => ready.record(id, readiness),
            _ = tokio::time::sleep(timeout) => {}
        }
        while let Some(Some((id, readiness))) = sessions.next().now_or_never() {
            ready.record(id, readiness);
        }
        ready
    }

    /// Services a ready set and returns how many readiness events were
    /// handled. Sessions that must close are removed afterwards.
    pub fn dispatch(&mut self, ready: ReadySet) -> usize {
        let mut activity = 0;
        if let Some(accepted) = ready.accepted {
            activity += 1;
            self.accept(accepted);
        }

        for session in &mut self.sessions {
            let id = session.id();
            if session.wants_write() && ready.writable.contains(&id) {
                activity += 1;
                session.flush();
            }
            if ready.readable.contains(&id) {
                activity += 1;
                session.on_readable();
            }
        }

        self.reap();
        activity
    }

    /// One poll and dispatch
    pub async fn turn(&mut self) -> usize {
        let interest = self.collect_interest();
        let ready = self.poll(&interest, self.config.poll_timeout).await;
        self.dispatch(ready)
    }

    /// Runs the reactor until `shutdown` resolves, then closes everything.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let interest = self.collect_interest();
            let timeout = self.config.poll_timeout;
            let ready = tokio::select! {
                _ = &mut shutdown => break,
                ready = self.poll(&interest, timeout) => ready,
            };
            self.dispatch(ready);
        }
        info!("Console shutting down");
        self.close_all();
    }

    /// Closes the listening socket, and every session too when `all` is set.
    pub fn close(&mut self, all: bool) {
        if self.listener.take().is_some() {
            debug!("Listening socket closed");
        }
        if !all {
            return;
        }
        for session in &mut self.sessions {
            session.close(CloseReason::Shutdown);
        }
        self.reap();
    }

    /// Closes the listening socket and every session
    pub fn close_all(&mut self) {
        self.close(true);
    }

    fn accept(&mut self, accepted: io::Result<(TcpStream, SocketAddr)>) {
        let (stream, peer_addr) = match accepted {
            Ok(accepted) => accepted,
            Err(error) => {
                error!("Failed to accept connection: {}", error);
                counter!("rconsole.accept.errors").increment(1);
                return;
            }
        };
        if let Some(max) = self.config.max_sessions {
            if self.sessions.len() >= max {
                let error = ConsoleError::MaxSessionsReached(max);
                warn!("{}, rejecting connection from {}", error, peer_addr);
                drop(stream);
                return;
            }
        }

        let id = SessionId::new(self.next_id);
        self.next_id += 1;
        self.total_sessions += 1;
        counter!("rconsole.sessions.accepted").increment(1);
        gauge!("rconsole.sessions.active").increment(1.0);

        self.context.logger.log(&format!(
            "Telnet client {}:{} connected.",
            peer_addr.ip(),
            peer_addr.port()
        ));
        let session = ClientSession::new(id, peer_addr, stream, &self.config, self.context.clone());
        self.sessions.push(session);
    }

    /// Removes sessions that must close, keeping the others in order.
    fn reap(&mut self) {
        let mut index = 0;
        while index < self.sessions.len() {
            if !self.sessions[index].must_close() {
                index += 1;
                continue;
            }
            let session = self.sessions.remove(index);
            let reason = session.close_reason().unwrap_or(CloseReason::Shutdown);
            let peer_addr = session.peer_addr();
            debug!(session_id = %session.id(), %reason, "Session closed");
            self.context.logger.log(&format!(
                "Closed telnet client ({}) {}:{}",
                reason,
                peer_addr.ip(),
                peer_addr.port()
            ));
            counter!("rconsole.sessions.closed").increment(1);
            gauge!("rconsole.sessions.active").decrement(1.0);
        }
    }
}

impl std::fmt::Debug for ConnectionListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionListener")
            .field("local_addr", &self.local_addr)
            .field("sessions", &self.sessions.len())
            .field("uptime", &self.started_at.elapsed())
            .finish()
    }
}

impl Drop for ConnectionListener {
    fn drop(&mut self) {
        if !self.sessions.is_empty() {
            debug!("ConnectionListener dropped with {} live sessions", self.sessions.len());
            self.close_all();
        }
    }
}
