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

//! Pre-issued bearer token authentication.

use super::{AuthKind, AuthMethod, LoginContext};
use crate::client::{bearer_header, CallOptions, FlightClient, NoOpAuthHandler};
use crate::error::{AuthError, AuthResult};
use std::fmt;
use std::sync::Arc;

/// Bearer token authentication.
///
/// The token is sent as-is; a no-op handshake carrying it lets the server
/// reject a bad token before the first query does.
pub struct BearerTokenAuth {
    client: Arc<dyn FlightClient>,
    token: String,
}

impl BearerTokenAuth {
    pub fn new(client: Arc<dyn FlightClient>, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerTokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuth").finish_non_exhaustive()
    }
}

impl AuthMethod for BearerTokenAuth {
    fn authenticate(
        &self,
        _context: &LoginContext,
        call_options: &mut CallOptions,
    ) -> AuthResult<()> {
        // The handshake itself must carry the token, but a rejected token
        // must not leave the header behind.
        let mut validated = call_options.clone();
        validated.push_header(bearer_header(&self.token));

        self.client
            .authenticate(&validated, &mut NoOpAuthHandler)
            .map_err(|status| {
                AuthError::classify(&status, |status| {
                    format!(
                        "Failed to authenticate with token: {} Message: {}",
                        self.token, status.message
                    )
                })
            })?;

        *call_options = validated;
        Ok(())
    }

    fn kind(&self) -> AuthKind {
        AuthKind::Token
    }
}
