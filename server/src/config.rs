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

//! Command line configuration

use clap::Parser;
use rconsole_service::{Authenticator, ServerConfig};
use std::time::Duration;

/// Telnet remote administration console
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'a',
        long = "address",
        env = "RCONSOLE_ADDRESS",
        help = "Address to listen on; empty disables listening",
        default_value = "127.0.0.1"
    )]
    pub address: String,

    #[arg(
        short = 'p',
        long = "port",
        env = "RCONSOLE_PORT",
        help = "Port to listen on; 0 disables listening",
        default_value_t = 2323
    )]
    pub port: u16,

    #[arg(
        short = 'u',
        long = "user",
        env = "RCONSOLE_USER",
        help = "Console account name",
        default_value = "admin"
    )]
    pub user: String,

    #[arg(
        long = "password",
        env = "RCONSOLE_PASSWORD",
        help = "Console account password; logins are refused when unset",
        hide_env_values = true
    )]
    pub password: Option<String>,

    #[arg(
        long = "max-sessions",
        env = "RCONSOLE_MAX_SESSIONS",
        help = "Maximum concurrent console sessions"
    )]
    pub max_sessions: Option<usize>,

    #[arg(
        long = "poll-timeout-ms",
        help = "Longest single reactor wait in milliseconds",
        default_value_t = 1000
    )]
    pub poll_timeout_ms: u64,
}

impl Arguments {
    /// Listener configuration for these arguments
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            address: Some(self.address.clone()),
            port: self.port,
            max_sessions: self.max_sessions,
            poll_timeout: Duration::from_millis(self.poll_timeout_ms),
            ..ServerConfig::default()
        }
    }

    /// The single account accepted by this console
    pub fn authenticator(&self) -> StaticAuthenticator {
        StaticAuthenticator {
            username: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

/// Accepts exactly one configured account
#[derive(Debug, Clone)]
pub struct StaticAuthenticator {
    username: String,
    password: Option<String>,
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, username: &str, password: &str) -> bool {
        match &self.password {
            Some(expected) => username == self.username && password == expected,
            None => false,
        }
    }
}
