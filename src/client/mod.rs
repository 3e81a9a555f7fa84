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

//! Flight RPC client surface used by authentication.
//!
//! The transport itself (channel setup, framing, header encoding) lives
//! outside this crate. Authentication only needs the two handshake calls
//! described by [`FlightClient`] and a place to put per-call decorations,
//! [`CallOptions`].

pub mod handler;

#[cfg(test)]
pub(crate) mod mock;

pub use handler::{ClientAuthHandler, ClientAuthReader, ClientAuthSender, NoOpAuthHandler};

use std::fmt::{self, Debug};
use std::time::Duration;

/// A single `(name, value)` header.
pub type HeaderPair = (String, String);

/// Name of the header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Builds the `authorization: Bearer <token>` header.
pub fn bearer_header(token: &str) -> HeaderPair {
    (AUTHORIZATION_HEADER.to_string(), format!("Bearer {token}"))
}

/// Per-call decorations attached to an outgoing RPC.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    /// Headers in the order they were added.
    pub headers: Vec<HeaderPair>,
    /// Call deadline; `None` uses the transport default.
    pub timeout: Option<Duration>,
}

impl CallOptions {
    /// Creates empty call options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh options for a login handshake.
    ///
    /// A login timeout of zero means "no explicit timeout".
    pub fn for_login(login_timeout: Option<u32>) -> Self {
        Self {
            headers: Vec::new(),
            timeout: login_timeout
                .filter(|seconds| *seconds > 0)
                .map(|seconds| Duration::from_secs_f64(f64::from(seconds))),
        }
    }

    /// The timeout as fractional seconds, the unit Flight uses natively.
    pub fn timeout_seconds(&self) -> Option<f64> {
        self.timeout.map(|timeout| timeout.as_secs_f64())
    }

    /// Appends a header, keeping existing entries in place.
    pub fn push_header(&mut self, header: HeaderPair) {
        self.headers.push(header);
    }

    /// Returns every value sent under `name`.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Flight status codes relevant to authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightStatusCode {
    Internal,
    TimedOut,
    Cancelled,
    Unauthenticated,
    Unauthorized,
    Unavailable,
    Failed,
}

impl fmt::Display for FlightStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Internal => "Internal",
            Self::TimedOut => "TimedOut",
            Self::Cancelled => "Cancelled",
            Self::Unauthenticated => "Unauthenticated",
            Self::Unauthorized => "Unauthorized",
            Self::Unavailable => "Unavailable",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// A failed RPC as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlightStatus {
    /// Structured Flight code, if the failure carried one.
    pub code: Option<FlightStatusCode>,
    /// Human readable message.
    pub message: String,
    /// Out-of-band detail attached by the server.
    pub extra_info: String,
}

impl FlightStatus {
    /// A failure with a structured Flight code.
    pub fn new(code: FlightStatusCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            extra_info: String::new(),
        }
    }

    /// A failure without a Flight code, e.g. a local I/O error.
    pub fn unstructured(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            extra_info: String::new(),
        }
    }

    /// Attaches server supplied extra detail.
    pub fn with_extra_info(mut self, extra_info: impl Into<String>) -> Self {
        self.extra_info = extra_info.into();
        self
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{code}: {}", self.message)?,
            None => f.write_str(&self.message)?,
        }
        if !self.extra_info.is_empty() {
            write!(f, " (detail: {})", self.extra_info)?;
        }
        Ok(())
    }
}

/// Handshake capabilities of a Flight client.
///
/// Implementations wrap the real RPC channel; the connection shares one
/// client with its authentication method.
pub trait FlightClient: Send + Sync + Debug {
    /// Performs a basic-credential handshake and returns the header the
    /// server wants on subsequent calls.
    fn authenticate_basic_token(
        &self,
        options: &CallOptions,
        username: &str,
        password: &str,
    ) -> std::result::Result<HeaderPair, FlightStatus>;

    /// Runs a pluggable handshake driven by `handler`.
    fn authenticate(
        &self,
        options: &CallOptions,
        handler: &mut dyn ClientAuthHandler,
    ) -> std::result::Result<(), FlightStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_options_timeout() {
        let options = CallOptions::for_login(Some(30));
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.timeout_seconds(), Some(30.0));
        assert!(options.headers.is_empty());
    }

    #[test]
    fn test_login_options_zero_or_absent_timeout() {
        assert_eq!(CallOptions::for_login(Some(0)).timeout, None);
        assert_eq!(CallOptions::for_login(None).timeout, None);
    }

    #[test]
    fn test_bearer_header() {
        assert_eq!(
            bearer_header("abc"),
            ("authorization".to_string(), "Bearer abc".to_string())
        );
    }

    #[test]
    fn test_header_values_case_insensitive() {
        let mut options = CallOptions::new();
        options.push_header(("x-trace".into(), "1".into()));
        options.push_header(("Authorization".into(), "Bearer a".into()));
        let values: Vec<_> = options.header_values(AUTHORIZATION_HEADER).collect();
        assert_eq!(values, vec!["Bearer a"]);
    }

    #[test]
    fn test_status_display() {
        let status = FlightStatus::new(FlightStatusCode::Unauthenticated, "denied")
            .with_extra_info("https://idp.example/authorize");
        assert_eq!(
            status.to_string(),
            "Unauthenticated: denied (detail: https://idp.example/authorize)"
        );
        assert_eq!(FlightStatus::unstructured("eof").to_string(), "eof");
    }
}
