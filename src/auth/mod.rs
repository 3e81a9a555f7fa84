// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Authentication mechanisms for the Flight SQL ADBC driver.
//!
//! A connection picks one [`AuthMethod`] from its properties with
//! [`resolve`] and runs it once before any SQL traffic. On success the
//! method has appended exactly one `authorization` header to the
//! connection's [`CallOptions`].

pub mod basic;
pub mod browser;
pub mod oauth;
pub mod selector;
pub mod token;

pub use basic::BasicCredentialAuth;
pub use browser::{BrowserLauncher, SystemBrowser};
pub use oauth::BrowserOAuth;
pub use selector::{resolve, AuthSelection};
pub use token::BearerTokenAuth;

use crate::cancel::CancellationSignal;
use crate::client::CallOptions;
use crate::error::AuthResult;
use std::fmt::{self, Debug};

/// Which strategy a connection authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthKind {
    Basic,
    Token,
    External,
}

impl AuthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Token => "token",
            Self::External => "external",
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection state an authentication method may consult.
#[derive(Debug, Clone, Default)]
pub struct LoginContext {
    /// Login timeout attribute in seconds; zero means unset.
    pub login_timeout: Option<u32>,
    /// Interrupts blocking waits when the connection is cancelled.
    pub cancel: CancellationSignal,
}

impl LoginContext {
    pub fn new(login_timeout: Option<u32>) -> Self {
        Self {
            login_timeout,
            cancel: CancellationSignal::new(),
        }
    }

    /// Fresh options for a login handshake, scoped by the login timeout.
    pub fn handshake_options(&self) -> CallOptions {
        CallOptions::for_login(self.login_timeout)
    }
}

/// Trait for authentication methods.
pub trait AuthMethod: Send + Sync + Debug {
    /// Authenticates against the server and appends the resulting
    /// credential header to `call_options`.
    ///
    /// `call_options` is left untouched when an error is returned.
    fn authenticate(
        &self,
        context: &LoginContext,
        call_options: &mut CallOptions,
    ) -> AuthResult<()>;

    fn kind(&self) -> AuthKind;

    /// The user this method authenticates as, for diagnostics.
    fn user(&self) -> Option<&str> {
        None
    }
}
