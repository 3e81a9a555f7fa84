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

//! Browser based OAuth through server-side discovery.
//!
//! The flow reuses the basic credential handshake with a reserved username:
//!
//! 1. Discover: the server answers `__discover__` with the URL the user has
//!    to visit, either in the extra detail of an `Unauthenticated` failure
//!    or as the value of a successful header pair.
//! 2. The URL is opened in the user's browser.
//! 3. The same handshake is polled until the server, having seen the user
//!    finish the browser login, returns the bearer token.

use super::{AuthKind, AuthMethod, BrowserLauncher, LoginContext, SystemBrowser};
use crate::client::{bearer_header, CallOptions, FlightClient, FlightStatusCode};
use crate::error::{AuthError, AuthResult};
use std::sync::Arc;
use std::time::Duration;

/// Username that asks the server for OAuth metadata instead of a login.
pub const DISCOVERY_USER: &str = "__discover__";

/// Delay before each token poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Number of token polls before giving up, two minutes at the default interval.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 120;

/// OAuth authentication through the user's browser.
///
/// Host, port and the encryption flag only describe the endpoint in
/// diagnostics; the token obtained lives for one `authenticate` call.
#[derive(Debug)]
pub struct BrowserOAuth {
    client: Arc<dyn FlightClient>,
    browser: Arc<dyn BrowserLauncher>,
    host: String,
    port: u16,
    use_encryption: bool,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl BrowserOAuth {
    /// Creates an OAuth method that opens the system browser.
    pub fn new(
        client: Arc<dyn FlightClient>,
        host: impl Into<String>,
        port: u16,
        use_encryption: bool,
    ) -> Self {
        Self {
            client,
            browser: Arc::new(SystemBrowser),
            host: host.into(),
            port,
            use_encryption,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }

    /// Uses a custom way of presenting the URL to the user.
    pub fn with_browser(mut self, browser: Arc<dyn BrowserLauncher>) -> Self {
        self.browser = browser;
        self
    }

    /// Sets the delay before each token poll.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets how many token polls are made before timing out.
    pub fn with_max_poll_attempts(mut self, attempts: u32) -> Self {
        self.max_poll_attempts = attempts;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn use_encryption(&self) -> bool {
        self.use_encryption
    }

    /// The server endpoint, for messages.
    pub fn endpoint(&self) -> String {
        let scheme = if self.use_encryption { "grpc+tls" } else { "grpc+tcp" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    /// Asks the server where the user has to log in.
    pub fn discover(&self, context: &LoginContext) -> AuthResult<String> {
        let result =
            self.client
                .authenticate_basic_token(&context.handshake_options(), DISCOVERY_USER, "");

        match result {
            Ok((_, url)) if !url.is_empty() => Ok(url),
            Ok(_) => Err(AuthError::OAuthDiscovery(format!(
                "server at {} returned an empty OAuth URL",
                self.endpoint()
            ))),
            Err(status)
                if status.code == Some(FlightStatusCode::Unauthenticated)
                    && !status.extra_info.is_empty() =>
            {
                Ok(status.extra_info)
            }
            Err(status) => Err(AuthError::OAuthDiscovery(format!(
                "{status} (server: {})",
                self.endpoint()
            ))),
        }
    }

    /// Polls the server until it hands out the token for the browser login.
    ///
    /// Failed polls mean the user has not finished yet and are retried; the
    /// wait before each poll returns early if the context is cancelled.
    pub fn wait_for_token(&self, context: &LoginContext) -> AuthResult<String> {
        for attempt in 1..=self.max_poll_attempts {
            if context.cancel.wait(self.poll_interval) {
                return Err(AuthError::Cancelled);
            }

            match self
                .client
                .authenticate_basic_token(&context.handshake_options(), DISCOVERY_USER, "")
            {
                Ok((_, token)) if !token.is_empty() => {
                    tracing::info!(attempt, "OAuth token received successfully.");
                    return Ok(token);
                }
                Ok(_) => tracing::debug!(attempt, "OAuth token not issued yet"),
                Err(status) => tracing::debug!(attempt, %status, "OAuth token poll failed"),
            }
        }

        Err(AuthError::OAuthTimedOut {
            attempts: self.max_poll_attempts,
        })
    }
}

impl AuthMethod for BrowserOAuth {
    fn authenticate(
        &self,
        context: &LoginContext,
        call_options: &mut CallOptions,
    ) -> AuthResult<()> {
        if context.cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }
        let url = self.discover(context)?;
        // Cancelled while discovery was in flight; no login window.
        if context.cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }

        tracing::info!(
            endpoint = %self.endpoint(),
            "OAuth discovery returned URL, launching browser for authentication."
        );
        tracing::debug!(%url, "OAuth login URL");
        self.browser.launch(&url);

        let token = self.wait_for_token(context)?;
        call_options.push_header(bearer_header(&token));
        Ok(())
    }

    fn kind(&self) -> AuthKind {
        AuthKind::External
    }
}
