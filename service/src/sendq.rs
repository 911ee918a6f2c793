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

//! Output queue with adaptive window flow control
//!
//! Writes go straight to the transport while nothing is queued. Whatever the
//! transport does not accept is queued, and once anything is queued every
//! later write is appended behind it so output stays in order. The queue is
//! drained by [`SendQueue::flush`] on writable readiness, at most one window
//! per call. A full-window send grows the window by one increment; anything
//! less shrinks it by one increment, never below the increment itself.

use crate::transport::Transport;
use bytes::{Buf, BytesMut};
use metrics::counter;
use std::io;

/// Per-session output backlog
#[derive(Debug)]
pub struct SendQueue {
    queue: BytesMut,
    window: usize,
    increment: usize,
}

impl SendQueue {
    /// Creates an empty queue whose window floor and step is `increment`
    pub fn new(increment: usize) -> Self {
        let increment = increment.max(1);
        Self {
            queue: BytesMut::new(),
            window: increment,
            increment,
        }
    }

    /// Bytes waiting to be sent
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is waiting; the session then has no write interest
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Current flush budget
    pub fn window(&self) -> usize {
        self.window
    }

    /// Window floor and step
    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Sends `data`, queueing whatever is not accepted immediately.
    ///
    /// Returns the number of bytes sent right away. An empty `data` makes no
    /// transport call.
    pub fn write<T: Transport>(&mut self, transport: &mut T, data: &[u8]) -> io::Result<usize> {
        if data.is_empty() {
            return Ok(0);
        }
        if !self.queue.is_empty() {
            self.defer(data);
            return Ok(0);
        }
        let sent = send_some(transport, data)?;
        if sent < data.len() {
            self.defer(&data[sent..]);
        }
        Ok(sent)
    }

    /// Sends up to one window from the head of the queue, adapting the window.
    pub fn flush<T: Transport>(&mut self, transport: &mut T) -> io::Result<usize> {
        if self.queue.is_empty() {
            self.reset();
            return Ok(0);
        }
        let chunk = self.window.min(self.queue.len());
        let sent = send_some(transport, &self.queue[..chunk])?;

        if sent == self.window {
            self.window += self.increment;
        } else {
            self.window = self
                .window
                .saturating_sub(self.increment)
                .max(self.increment);
        }

        self.queue.advance(sent);
        if self.queue.is_empty() {
            self.reset();
        }
        Ok(sent)
    }

    /// Drops anything queued and returns the window to its floor
    pub fn reset(&mut self) {
        self.queue.clear();
        self.window = self.increment;
    }

    fn defer(&mut self, data: &[u8]) {
        counter!("rconsole.sendq.deferred_bytes").increment(data.len() as u64);
        self.queue.extend_from_slice(data);
    }
}

/// One non-blocking write; would-block counts as nothing sent.
fn send_some<T: Transport>(transport: &mut T, data: &[u8]) -> io::Result<usize> {
    match transport.try_write(data) {
        Ok(sent) => {
            counter!("rconsole.bytes.sent").increment(sent as u64);
            Ok(sent)
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(0),
        Err(error) => Err(error),
    }
}
