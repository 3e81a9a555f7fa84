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

//! Error types for the Flight SQL ADBC driver.
//!
//! Option handling uses the driverbase error framework so messages line up
//! with the rest of the ADBC ecosystem. Authentication outcomes are modelled
//! separately by [`AuthError`], which keeps the distinction between rejected
//! credentials, an unreachable server and everything else.

use crate::client::{FlightStatus, FlightStatusCode};
use adbc_core::error::Status;
use driverbase::error::ErrorHelper;

/// Error helper for Flight SQL driver errors.
///
/// This type implements the driverbase `ErrorHelper` trait to provide
/// consistent error formatting with the driver name prefix.
#[derive(Clone)]
pub struct FlightSqlErrorHelper;

impl ErrorHelper for FlightSqlErrorHelper {
    const NAME: &'static str = "FlightSQL";
}

/// The error type for driver option handling.
pub type Error = driverbase::error::Error<FlightSqlErrorHelper>;

/// A convenient alias for Results with driver errors.
pub type Result<T> = std::result::Result<T, Error>;

/// A convenient alias for Results of authentication steps.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Outcome of a failed credential selection or handshake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No usable credential source, or a malformed property.
    #[error("{0}")]
    Configuration(String),

    /// The server rejected the credentials or token.
    #[error("{0}")]
    Authentication(String),

    /// The server could not be reached.
    #[error("{0}")]
    Communication(String),

    /// Any other transport failure.
    #[error("{0}")]
    Driver(String),

    /// The server did not hand out an OAuth URL.
    #[error("OAuth discovery failed: {0}")]
    OAuthDiscovery(String),

    /// The browser login did not complete within the polling window.
    #[error("OAuth authentication timed out waiting for browser login after {attempts} attempts.")]
    OAuthTimedOut { attempts: u32 },

    /// Authentication was aborted through the connection's cancel signal.
    #[error("authentication cancelled")]
    Cancelled,
}

impl AuthError {
    /// Classifies a handshake failure by its transport status code.
    ///
    /// `auth_message` renders the message used when the server rejected the
    /// credentials, so each method can name itself without exposing secrets.
    pub fn classify(
        status: &FlightStatus,
        auth_message: impl FnOnce(&FlightStatus) -> String,
    ) -> Self {
        match status.code {
            Some(FlightStatusCode::Unauthenticated) => Self::Authentication(auth_message(status)),
            Some(FlightStatusCode::Unavailable) => Self::Communication(status.message.clone()),
            _ => Self::Driver(status.message.clone()),
        }
    }

    /// True for every failure that means the server did not accept us.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_) | Self::OAuthDiscovery(_) | Self::OAuthTimedOut { .. }
        )
    }

    /// The ADBC status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Configuration(_) => Status::InvalidArguments,
            Self::Authentication(_) | Self::OAuthDiscovery(_) | Self::OAuthTimedOut { .. } => {
                Status::Unauthenticated
            }
            Self::Communication(_) => Status::IO,
            Self::Driver(_) => Status::Internal,
            Self::Cancelled => Status::Cancelled,
        }
    }

    /// Converts into the ADBC error reported to driver users.
    pub fn to_adbc(&self) -> adbc_core::error::Error {
        adbc_core::error::Error::with_message_and_status(
            format!("[{}] {self}", FlightSqlErrorHelper::NAME),
            self.status(),
        )
    }
}

impl From<AuthError> for adbc_core::error::Error {
    fn from(error: AuthError) -> Self {
        error.to_adbc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: Option<FlightStatusCode>, message: &str) -> FlightStatus {
        FlightStatus {
            code,
            message: message.to_string(),
            extra_info: String::new(),
        }
    }

    #[test]
    fn test_error_display() {
        let error = FlightSqlErrorHelper::invalid_argument().message("invalid port");
        let display = format!("{error}");
        assert!(display.contains("FlightSQL"));
        assert!(display.contains("invalid port"));
    }

    #[test]
    fn test_classify_unauthenticated() {
        let error = AuthError::classify(
            &status(Some(FlightStatusCode::Unauthenticated), "bad password"),
            |s| format!("Failed to authenticate with user and password: {s}"),
        );
        assert!(matches!(error, AuthError::Authentication(_)));
        assert!(error.to_string().contains("bad password"));
        assert!(error.is_authentication_failure());
    }

    #[test]
    fn test_classify_unavailable() {
        let error = AuthError::classify(
            &status(Some(FlightStatusCode::Unavailable), "connection refused"),
            |_| unreachable!(),
        );
        assert_eq!(error, AuthError::Communication("connection refused".into()));
    }

    #[test]
    fn test_classify_unstructured() {
        let error = AuthError::classify(&status(None, "stream reset"), |_| unreachable!());
        assert_eq!(error, AuthError::Driver("stream reset".into()));

        let error = AuthError::classify(
            &status(Some(FlightStatusCode::Internal), "boom"),
            |_| unreachable!(),
        );
        assert_eq!(error, AuthError::Driver("boom".into()));
    }

    #[test]
    fn test_error_to_adbc() {
        let error = AuthError::OAuthTimedOut { attempts: 120 };
        let adbc_error = error.to_adbc();
        assert_eq!(adbc_error.status, Status::Unauthenticated);
        assert!(adbc_error.message.contains("FlightSQL"));
        assert!(adbc_error.message.contains("timed out"));

        let adbc_error = AuthError::Communication("down".into()).to_adbc();
        assert_eq!(adbc_error.status, Status::IO);

        let adbc_error = AuthError::Configuration("missing".into()).to_adbc();
        assert_eq!(adbc_error.status, Status::InvalidArguments);
    }
}
