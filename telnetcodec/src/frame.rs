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

use crate::args::TelnetArgument;
use crate::options::{TelnetAction, TelnetOption};

///
/// Outbound Telnet frame, as accepted by the codec's encoder.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetFrame {
    /// Single data byte; an IAC byte is doubled on the wire
    Data(u8),
    /// `IAC <action> <option>`
    Negotiate(TelnetAction, TelnetOption),
    /// `IAC SB <option> <payload> IAC SE`
    Subnegotiate(TelnetArgument),
}

impl TelnetFrame {
    /// `IAC WILL <option>`
    pub fn will(option: TelnetOption) -> Self {
        TelnetFrame::Negotiate(TelnetAction::Will, option)
    }

    /// `IAC WONT <option>`
    pub fn wont(option: TelnetOption) -> Self {
        TelnetFrame::Negotiate(TelnetAction::Wont, option)
    }

    /// `IAC DO <option>`
    pub fn do_(option: TelnetOption) -> Self {
        TelnetFrame::Negotiate(TelnetAction::Do, option)
    }

    /// `IAC DONT <option>`
    pub fn dont(option: TelnetOption) -> Self {
        TelnetFrame::Negotiate(TelnetAction::Dont, option)
    }
}
