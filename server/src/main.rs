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

mod config;

use crate::config::Arguments;
use anyhow::Context;
use clap::Parser;
use rconsole_service::{ConnectionListener, ConsoleContext, SessionId};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    if arguments.password.is_none() {
        warn!("No console password configured; every login will be refused");
    }

    let context = ConsoleContext::new(
        arguments.authenticator(),
        |id: SessionId, line: &str| info!(session_id = %id, "TELNET INPUT : {}", line),
    );
    let mut listener = ConnectionListener::bind(arguments.server_config(), context)
        .await
        .context("Unable to start the console listener")?;
    if !listener.is_listening() {
        warn!("Console listening is disabled");
    }

    listener
        .run_until(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!("Unable to wait for ctrl-c: {}", error);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("{}", listener.snapshot());
    Ok(())
}
