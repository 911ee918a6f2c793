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

//! Scripted transport for tests and benchmarks, enabled by the `test-util` feature

use super::Transport;
use std::collections::VecDeque;
use std::io;

/// In-memory transport with scripted reads and a bounded write capacity.
///
/// Reads return the scripted chunks in order and would-block once they run
/// out. Writes are accepted up to the remaining capacity; with no capacity
/// left a write would-block.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    reads: VecDeque<io::Result<Vec<u8>>>,
    written: Vec<u8>,
    write_capacity: Option<usize>,
    write_error: Option<io::ErrorKind>,
    write_calls: usize,
}

impl MemoryTransport {
    /// Creates a transport with nothing to read and unlimited write capacity
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk for a later read
    pub fn push_read(&mut self, chunk: &[u8]) {
        self.reads.push_back(Ok(chunk.to_vec()));
    }

    /// Queue an orderly shutdown by the peer
    pub fn push_eof(&mut self) {
        self.reads.push_back(Ok(Vec::new()));
    }

    /// Queue a read failure
    pub fn push_read_error(&mut self, kind: io::ErrorKind) {
        self.reads.push_back(Err(kind.into()));
    }

    /// Limit how many further bytes writes accept; `None` is unlimited
    pub fn set_write_capacity(&mut self, capacity: Option<usize>) {
        self.write_capacity = capacity;
    }

    /// Make every further write fail with `kind`
    pub fn fail_writes(&mut self, kind: io::ErrorKind) {
        self.write_error = Some(kind);
    }

    /// Bytes accepted so far
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Takes the bytes accepted so far
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }

    /// Number of write attempts
    pub fn write_calls(&self) -> usize {
        self.write_calls
    }
}

impl Transport for MemoryTransport {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            None => Err(io::ErrorKind::WouldBlock.into()),
            Some(Err(error)) => Err(error),
            Some(Ok(chunk)) if chunk.is_empty() => {
                // EOF stays sticky
                self.reads.push_front(Ok(chunk));
                Ok(0)
            }
            Some(Ok(mut chunk)) => {
                let len = chunk.len().min(buf.len());
                buf[..len].copy_from_slice(&chunk[..len]);
                if len < chunk.len() {
                    self.reads.push_front(Ok(chunk.split_off(len)));
                }
                Ok(len)
            }
        }
    }

    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_calls += 1;
        if let Some(kind) = self.write_error {
            return Err(kind.into());
        }
        let len = match self.write_capacity {
            Some(capacity) => capacity.min(buf.len()),
            None => buf.len(),
        };
        if len == 0 && !buf.is_empty() {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        if let Some(capacity) = self.write_capacity.as_mut() {
            *capacity -= len;
        }
        self.written.extend_from_slice(&buf[..len]);
        Ok(len)
    }
}
