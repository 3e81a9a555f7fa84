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

//! Connection implementation for the Flight SQL ADBC driver.

use crate::auth::{self, AuthKind, AuthMethod, BrowserLauncher, LoginContext, SystemBrowser};
use crate::cancel::CancellationSignal;
use crate::client::{CallOptions, FlightClient};
use crate::error::{AuthResult, FlightSqlErrorHelper};
use crate::properties::PropertyMap;
use adbc_core::error::Result;
use adbc_core::options::{OptionConnection, OptionValue};
use adbc_core::Optionable;
use driverbase::error::ErrorHelper;
use std::sync::Arc;

/// Connection attribute holding the login timeout in seconds.
pub const LOGIN_TIMEOUT: &str = "flightsql.login_timeout";

/// A connection to a Flight SQL endpoint.
///
/// A Connection owns the authentication method chosen from its properties
/// and the call options every later RPC must carry. It shares the Flight
/// client with that method.
#[derive(Debug)]
pub struct Connection {
    client: Arc<dyn FlightClient>,
    browser: Arc<dyn BrowserLauncher>,
    properties: PropertyMap,
    login_timeout: Option<u32>,
    cancel: CancellationSignal,
    auth: Option<Box<dyn AuthMethod>>,
    call_options: CallOptions,
}

impl Connection {
    /// Creates an unauthenticated connection; call [`open`](Self::open) next.
    pub fn new(client: Arc<dyn FlightClient>, properties: PropertyMap) -> Self {
        Self {
            client,
            browser: Arc::new(SystemBrowser),
            properties,
            login_timeout: None,
            cancel: CancellationSignal::new(),
            auth: None,
            call_options: CallOptions::new(),
        }
    }

    /// Presents OAuth login URLs through `browser` instead of the system
    /// browser.
    pub fn with_browser(mut self, browser: Arc<dyn BrowserLauncher>) -> Self {
        self.browser = browser;
        self
    }

    /// Selects the authentication method and authenticates.
    ///
    /// Opening again re-authenticates from scratch and replaces the previous
    /// method and call options; on failure the previous state is kept.
    pub fn open(&mut self) -> AuthResult<()> {
        let method = auth::resolve(
            &self.properties,
            Arc::clone(&self.client),
            Arc::clone(&self.browser),
        )?;
        let context = LoginContext {
            login_timeout: self.login_timeout,
            cancel: self.cancel.clone(),
        };

        let mut call_options = CallOptions::new();
        method.authenticate(&context, &mut call_options)?;

        self.call_options = call_options;
        self.auth = Some(method);
        Ok(())
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn client(&self) -> &Arc<dyn FlightClient> {
        &self.client
    }

    pub fn login_timeout(&self) -> Option<u32> {
        self.login_timeout
    }

    pub fn set_login_timeout(&mut self, seconds: Option<u32>) {
        self.login_timeout = seconds;
    }

    /// Decorations to attach to every RPC made on this connection.
    pub fn call_options(&self) -> &CallOptions {
        &self.call_options
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn auth_kind(&self) -> Option<AuthKind> {
        self.auth.as_ref().map(|method| method.kind())
    }

    /// The user the connection authenticated as, if the method has one.
    pub fn user(&self) -> Option<&str> {
        self.auth.as_deref().and_then(|method| method.user())
    }

    /// Handle that can interrupt a blocking [`open`](Self::open) from
    /// another thread.
    pub fn cancel_signal(&self) -> CancellationSignal {
        self.cancel.clone()
    }

    /// Interrupts a pending browser login. Cancellation is sticky.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    fn parse_login_timeout(key: &OptionConnection, value: &OptionValue) -> Result<u32> {
        let parsed = match value {
            OptionValue::Int(seconds) => u32::try_from(*seconds).ok(),
            OptionValue::String(seconds) => seconds.trim().parse::<u32>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| FlightSqlErrorHelper::set_invalid_option(key, value).to_adbc())
    }
}

impl Optionable for Connection {
    type Option = OptionConnection;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        match key {
            OptionConnection::Other(ref s) if s == LOGIN_TIMEOUT => {
                let seconds = Self::parse_login_timeout(&key, &value)?;
                self.login_timeout = Some(seconds);
                Ok(())
            }
            _ => Err(FlightSqlErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        Ok(self.get_option_int(key)?.to_string())
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        Err(FlightSqlErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        match key {
            OptionConnection::Other(ref s) if s == LOGIN_TIMEOUT => {
                Ok(i64::from(self.login_timeout.unwrap_or(0)))
            }
            _ => Err(FlightSqlErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        Err(FlightSqlErrorHelper::get_unknown_option(&key).to_adbc())
    }
}
