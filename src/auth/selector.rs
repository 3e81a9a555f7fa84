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

//! Choosing an authentication method from connection properties.

use super::{
    AuthKind, AuthMethod, BasicCredentialAuth, BearerTokenAuth, BrowserLauncher, BrowserOAuth,
};
use crate::client::FlightClient;
use crate::error::{AuthError, AuthResult};
use crate::properties::{self, PropertyMap};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 32010;

/// The outcome of credential selection, before any client is involved.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthSelection {
    /// Browser based OAuth discovery.
    External {
        host: String,
        port: u16,
        use_encryption: bool,
    },
    /// Username and password exchange.
    Basic { user: String, password: String },
    /// Caller supplied bearer token.
    Token { token: String },
}

impl AuthSelection {
    /// Picks the authentication method the properties ask for.
    ///
    /// `authType=external` wins over everything else, then any user or
    /// password alias, then `token`. Either side of a user/password pair may
    /// be missing and defaults to empty.
    pub fn resolve(props: &PropertyMap) -> AuthResult<Self> {
        if props.get(properties::AUTH_TYPE) == Some(properties::AUTH_TYPE_EXTERNAL) {
            let host = props.get(properties::HOST).unwrap_or(DEFAULT_HOST);
            let port = match props.get(properties::PORT) {
                Some(value) => value.trim().parse::<u16>().map_err(|_| {
                    AuthError::Configuration(format!(
                        "Invalid value for property '{}': '{value}' is not a valid port number.",
                        properties::PORT
                    ))
                })?,
                None => DEFAULT_PORT,
            };
            let use_encryption = props
                .get(properties::USE_ENCRYPTION)
                .and_then(properties::parse_bool)
                .unwrap_or(true);

            return Ok(Self::External {
                host: host.to_string(),
                port,
                use_encryption,
            });
        }

        let user = props.first_of(properties::USER_ALIASES);
        let password = props.first_of(properties::PASSWORD_ALIASES);
        if user.is_some() || password.is_some() {
            return Ok(Self::Basic {
                user: user.unwrap_or_default().to_string(),
                password: password.unwrap_or_default().to_string(),
            });
        }

        if let Some(token) = props.get(properties::TOKEN) {
            return Ok(Self::Token {
                token: token.to_string(),
            });
        }

        Err(AuthError::Configuration(
            "Authentication credentials are required. \
             Provide user/password, a token, or set authType=external for OAuth."
                .to_string(),
        ))
    }

    pub fn kind(&self) -> AuthKind {
        match self {
            Self::External { .. } => AuthKind::External,
            Self::Basic { .. } => AuthKind::Basic,
            Self::Token { .. } => AuthKind::Token,
        }
    }

    /// Builds the method that executes this selection against `client`.
    ///
    /// `browser` presents the login URL when OAuth is selected.
    pub fn into_method(
        self,
        client: Arc<dyn FlightClient>,
        browser: Arc<dyn BrowserLauncher>,
    ) -> Box<dyn AuthMethod> {
        match self {
            Self::External {
                host,
                port,
                use_encryption,
            } => Box::new(
                BrowserOAuth::new(client, host, port, use_encryption).with_browser(browser),
            ),
            Self::Basic { user, password } => {
                Box::new(BasicCredentialAuth::new(client, user, password))
            }
            Self::Token { token } => Box::new(BearerTokenAuth::new(client, token)),
        }
    }
}

impl fmt::Debug for AuthSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External {
                host,
                port,
                use_encryption,
            } => f
                .debug_struct("External")
                .field("host", host)
                .field("port", port)
                .field("use_encryption", use_encryption)
                .finish(),
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"****")
                .finish(),
            Self::Token { .. } => f.debug_struct("Token").field("token", &"****").finish(),
        }
    }
}

/// Selects and constructs the authentication method for `properties`.
pub fn resolve(
    properties: &PropertyMap,
    client: Arc<dyn FlightClient>,
    browser: Arc<dyn BrowserLauncher>,
) -> AuthResult<Box<dyn AuthMethod>> {
    let selection = AuthSelection::resolve(properties)?;
    tracing::debug!(method = %selection.kind(), "selected authentication method");
    Ok(selection.into_method(client, browser))
}
