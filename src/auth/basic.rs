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

//! Username and password authentication.

use super::{AuthKind, AuthMethod, LoginContext};
use crate::client::{CallOptions, FlightClient};
use crate::error::{AuthError, AuthResult};
use std::fmt;
use std::sync::Arc;

/// Basic credential authentication.
///
/// The server trades the username and password for a header, usually a
/// bearer token, which is then sent on every call of the connection.
pub struct BasicCredentialAuth {
    client: Arc<dyn FlightClient>,
    user: String,
    password: String,
}

impl BasicCredentialAuth {
    pub fn new(
        client: Arc<dyn FlightClient>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client,
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicCredentialAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentialAuth")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl AuthMethod for BasicCredentialAuth {
    fn authenticate(
        &self,
        context: &LoginContext,
        call_options: &mut CallOptions,
    ) -> AuthResult<()> {
        let header = self
            .client
            .authenticate_basic_token(&context.handshake_options(), &self.user, &self.password)
            .map_err(|status| {
                AuthError::classify(&status, |status| {
                    format!("Failed to authenticate with user and password: {status}")
                })
            })?;

        call_options.push_header(header);
        Ok(())
    }

    fn kind(&self) -> AuthKind {
        AuthKind::Basic
    }

    fn user(&self) -> Option<&str> {
        Some(&self.user)
    }
}
