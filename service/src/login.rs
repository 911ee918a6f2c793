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

//! Username and password dialogue

use crate::handler::Authenticator;
use crate::types::LoginState;
use metrics::counter;

/// Username prompt
pub const USERNAME_PROMPT: &str = "Username : ";

/// Password prompt
pub const PASSWORD_PROMPT: &str = "Password : ";

/// Written after a successful login
pub const LOGIN_SUCCESSFUL: &str = "Login successful\r\n";

/// Written after a rejected password
pub const LOGIN_INCORRECT: &str = "Incorrect login. Please try again.\r\nUsername : ";

/// Written when a line arrives before any prompt
pub const LOGIN_REQUIRED: &str = "Please login with your account details.\r\nUsername : ";

/// What a line did to the dialogue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginStep {
    /// Another prompt is due
    Prompt(&'static str),
    /// Credentials verified
    Accepted,
    /// Credentials refused, back to the username prompt
    Rejected,
}

impl LoginStep {
    /// Text to send to the peer
    pub fn text(self) -> &'static str {
        match self {
            LoginStep::Prompt(text) => text,
            LoginStep::Accepted => LOGIN_SUCCESSFUL,
            LoginStep::Rejected => LOGIN_INCORRECT,
        }
    }
}

/// Drives a session from `NotLoggedIn` to `LoggedIn`
#[derive(Debug, Default)]
pub struct LoginStateMachine {
    state: LoginState,
    username: String,
}

impl LoginStateMachine {
    /// Creates a dialogue with no prompt outstanding
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Username given so far, if any
    pub fn username(&self) -> Option<&str> {
        (!self.username.is_empty()).then_some(self.username.as_str())
    }

    /// Issue the first username prompt
    pub fn start(&mut self) -> &'static str {
        self.state = LoginState::AskedUsername;
        USERNAME_PROMPT
    }

    /// Feed one complete line. Returns `None` once logged in.
    pub fn on_line(&mut self, line: &str, authenticator: &dyn Authenticator) -> Option<LoginStep> {
        let step = match self.state {
            LoginState::NotLoggedIn => {
                self.state = LoginState::AskedUsername;
                LoginStep::Prompt(LOGIN_REQUIRED)
            }
            LoginState::AskedUsername if line.is_empty() => LoginStep::Prompt(USERNAME_PROMPT),
            LoginState::AskedUsername => {
                self.username = line.to_string();
                self.state = LoginState::AskedPassword;
                LoginStep::Prompt(PASSWORD_PROMPT)
            }
            LoginState::AskedPassword => {
                if authenticator.verify(&self.username, line) {
                    counter!("rconsole.login.success").increment(1);
                    self.state = LoginState::LoggedIn;
                    LoginStep::Accepted
                } else {
                    counter!("rconsole.login.failure").increment(1);
                    tracing::debug!(username = %self.username, "Login rejected");
                    self.username.clear();
                    self.state = LoginState::AskedUsername;
                    LoginStep::Rejected
                }
            }
            LoginState::LoggedIn => return None,
        };
        Some(step)
    }
}
