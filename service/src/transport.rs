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

//! Non-blocking byte transport under a session
//!
//! Sessions only ever attempt reads and writes that return immediately. A
//! would-block result defers the work to the next readiness notification.

use std::io;
use tokio::net::TcpStream;

/// Non-blocking read and write
pub trait Transport {
    /// Read into `buf` without blocking. `Ok(0)` means the peer closed.
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write from `buf` without blocking, returning how much was accepted.
    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

impl Transport for TcpStream {
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        TcpStream::try_read(self, buf)
    }

    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize> {
        TcpStream::try_write(self, buf)
    }
}

#[cfg(any(test, feature = "test-util"))]
mod memory;

#[cfg(any(test, feature = "test-util"))]
pub use self::memory::MemoryTransport;

