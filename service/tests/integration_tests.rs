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

//! End-to-end tests over loopback TCP

use rconsole_service::{ConnectionListener, ConsoleContext, Logger, ServerConfig, SessionId};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    async fn wait_for(&self, count: usize) -> Vec<String> {
        timeout(WAIT, async {
            loop {
                let entries = self.snapshot();
                if entries.len() >= count {
                    return entries;
                }
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for entries")
    }
}

impl Logger for Recorder {
    fn log(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

struct Harness {
    addr: std::net::SocketAddr,
    lines: Recorder,
    log: Recorder,
    shutdown: oneshot::Sender<()>,
    reactor: JoinHandle<ConnectionListener>,
}

/// Starts a reactor on an ephemeral loopback port
async fn start(config: ServerConfig) -> Harness {
    let lines = Recorder::default();
    let log = Recorder::default();
    let sink = lines.clone();
    let context = ConsoleContext::new(
        |user: &str, pass: &str| user == "admin" && pass == "secret",
        move |_: SessionId, line: &str| sink.0.lock().unwrap().push(line.to_string()),
    )
    .with_logger(log.clone());

    let socket = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut listener = ConnectionListener::with_listener(socket, config, context).unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, stop) = oneshot::channel::<()>();
    let reactor = tokio::spawn(async move {
        listener
            .run_until(async {
                let _ = stop.await;
            })
            .await;
        listener
    });
    Harness {
        addr,
        lines,
        log,
        shutdown,
        reactor,
    }
}

/// Reads until `pattern` has been seen, returning everything read
async fn read_until(client: &mut TcpStream, pattern: &[u8]) -> Vec<u8> {
    let mut seen = Vec::new();
    timeout(WAIT, async {
        let mut buf = [0u8; 256];
        while !seen.windows(pattern.len()).any(|window| window == pattern) {
            let read = client.read(&mut buf).await.unwrap();
            assert!(read > 0, "connection closed before {pattern:?}");
            seen.extend_from_slice(&buf[..read]);
        }
    })
    .await
    .expect("timed out waiting for output");
    seen
}

async fn login(client: &mut TcpStream) {
    read_until(client, b"Username : ").await;
    client.write_all(b"admin\r\n").await.unwrap();
    read_until(client, b"Password : ").await;
    client.write_all(b"secret\r\n").await.unwrap();
    read_until(client, b"Login successful\r\n").await;
}

#[tokio::test]
async fn test_login_and_console_input() {
    let harness = start(ServerConfig::disabled()).await;
    let mut client = TcpStream::connect(harness.addr).await.unwrap();

    let greeting = read_until(&mut client, b"Username : ").await;
    assert!(greeting.starts_with(b"Welcome to the remote console.\r\n"));

    client.write_all(b"admin\r\n").await.unwrap();
    read_until(&mut client, b"Password : ").await;
    client.write_all(b"secret\r\n").await.unwrap();
    read_until(&mut client, b"Login successful\r\n").await;

    client.write_all(b"show sessions\r\n").await.unwrap();
    assert_eq!(harness.lines.wait_for(1).await, vec!["show sessions".to_string()]);

    let log = harness.log.wait_for(3).await;
    assert!(log[1].ends_with("connected."));
    assert!(log[2].starts_with("Successful telnet login from admin on "));

    harness.shutdown.send(()).unwrap();
    let listener = harness.reactor.await.unwrap();
    assert_eq!(listener.session_count(), 0);
    assert!(!listener.is_listening());
}

#[tokio::test]
async fn test_wrong_password() {
    let harness = start(ServerConfig::disabled()).await;
    let mut client = TcpStream::connect(harness.addr).await.unwrap();

    read_until(&mut client, b"Username : ").await;
    client.write_all(b"admin\r\nnope\r\n").await.unwrap();
    read_until(&mut client, b"Incorrect login. Please try again.\r\nUsername : ").await;

    client.write_all(b"admin\r\nsecret\r\n").await.unwrap();
    read_until(&mut client, b"Login successful\r\n").await;

    harness.shutdown.send(()).unwrap();
    harness.reactor.await.unwrap();
}

#[tokio::test]
async fn test_ctrl_c_closes_session() {
    let harness = start(ServerConfig::disabled()).await;
    let mut client = TcpStream::connect(harness.addr).await.unwrap();
    login(&mut client).await;

    client.write_all(b"\x03").await.unwrap();
    let mut rest = Vec::new();
    timeout(WAIT, client.read_to_end(&mut rest))
        .await
        .expect("session was not closed")
        .unwrap();

    let log = harness.log.wait_for(4).await;
    assert!(log[3].starts_with("Closed telnet client (client ctrl-c) 127.0.0.1:"));

    harness.shutdown.send(()).unwrap();
    assert_eq!(harness.reactor.await.unwrap().session_count(), 0);
}

#[tokio::test]
async fn test_peer_hang_up() {
    let harness = start(ServerConfig::disabled()).await;
    let mut client = TcpStream::connect(harness.addr).await.unwrap();
    // read through the final IAC DO NAWS so the close is orderly
    read_until(&mut client, &[0xFF, 0xFD, 0x1F]).await;
    drop(client);

    let log = harness.log.wait_for(3).await;
    assert!(log[2].starts_with("Closed telnet client (client initiated)"));

    harness.shutdown.send(()).unwrap();
    harness.reactor.await.unwrap();
}

#[tokio::test]
async fn test_binary_noise_keeps_session() {
    let harness = start(ServerConfig::disabled()).await;
    let mut client = TcpStream::connect(harness.addr).await.unwrap();
    login(&mut client).await;

    // every byte except the interrupt, with IAC doubled so it stays data
    let mut noise: Vec<u8> = (0u8..=254).filter(|&byte| byte != 0x03).collect();
    noise.extend_from_slice(&[0xFF, 0xFF]);
    client.write_all(&noise).await.unwrap();
    client.write_all(b"\r\nping\r\n").await.unwrap();

    let lines = harness.lines.wait_for(2).await;
    assert_eq!(lines.last().map(String::as_str), Some("ping"));

    harness.shutdown.send(()).unwrap();
    harness.reactor.await.unwrap();
}

#[tokio::test]
async fn test_many_clients() {
    let harness = start(ServerConfig::disabled().with_max_sessions(Some(8))).await;
    let mut clients = Vec::new();
    for _ in 0..4 {
        let mut client = TcpStream::connect(harness.addr).await.unwrap();
        login(&mut client).await;
        clients.push(client);
    }
    for (index, client) in clients.iter_mut().enumerate() {
        client
            .write_all(format!("client {index}\r\n").as_bytes())
            .await
            .unwrap();
    }
    let mut lines = harness.lines.wait_for(4).await;
    lines.sort();
    assert_eq!(lines, vec!["client 0", "client 1", "client 2", "client 3"]);

    harness.shutdown.send(()).unwrap();
    harness.reactor.await.unwrap();
}
