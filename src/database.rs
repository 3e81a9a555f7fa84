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

//! Database implementation for the Flight SQL ADBC driver.

use crate::client::FlightClient;
use crate::connection::Connection;
use crate::error::FlightSqlErrorHelper;
use crate::properties::{self, PropertyMap};
use adbc_core::error::Result;
use adbc_core::options::{OptionConnection, OptionDatabase, OptionValue};
use adbc_core::Optionable;
use driverbase::error::ErrorHelper;
use std::sync::Arc;

/// Holds connection properties shared by the connections it creates.
///
/// Properties come from a connection string or are set one at a time as
/// options; they are handed to each new Connection, which picks its
/// authentication method from them.
#[derive(Debug, Default, Clone)]
pub struct Database {
    uri: Option<String>,
    properties: PropertyMap,
}

impl Database {
    /// Creates a new Database instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Database from an ODBC style connection string.
    pub fn from_connection_string(connection_string: &str) -> crate::error::Result<Self> {
        Ok(Self {
            uri: None,
            properties: PropertyMap::from_connection_string(connection_string)?,
        })
    }

    /// Returns the configured URI.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Splits `grpc+tls://host:port` into host, port and encryption properties.
    fn apply_uri(&mut self, uri: &str) -> crate::error::Result<()> {
        let (scheme, rest) = uri.split_once("://").ok_or_else(|| {
            FlightSqlErrorHelper::invalid_argument().message(format!("invalid URI '{uri}'"))
        })?;
        let use_encryption = match scheme {
            "grpc" | "grpc+tcp" => false,
            "grpc+tls" => true,
            _ => {
                return Err(FlightSqlErrorHelper::invalid_argument()
                    .message(format!("unsupported URI scheme '{scheme}'")))
            }
        };

        let authority = rest.trim_end_matches('/');
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    FlightSqlErrorHelper::invalid_argument()
                        .message(format!("invalid port in URI '{uri}'"))
                })?;
                (host, Some(port))
            }
            None => (authority, None),
        };
        if host.is_empty() {
            return Err(FlightSqlErrorHelper::invalid_argument()
                .message(format!("missing host in URI '{uri}'")));
        }

        self.properties.insert(properties::HOST, host);
        if let Some(port) = port {
            self.properties.insert(properties::PORT, port.to_string());
        }
        self.properties
            .insert(properties::USE_ENCRYPTION, use_encryption.to_string());
        self.uri = Some(uri.to_string());
        Ok(())
    }

    /// Creates and opens a connection over `client`.
    pub fn new_connection(&self, client: Arc<dyn FlightClient>) -> Result<Connection> {
        self.new_connection_with_opts(client, std::iter::empty())
    }

    /// Creates a connection, applies `opts`, then opens it.
    pub fn new_connection_with_opts(
        &self,
        client: Arc<dyn FlightClient>,
        opts: impl IntoIterator<Item = (OptionConnection, OptionValue)>,
    ) -> Result<Connection> {
        let mut connection = Connection::new(client, self.properties.clone());
        for (key, value) in opts {
            connection.set_option(key, value)?;
        }
        connection.open()?;
        Ok(connection)
    }
}

impl Optionable for Database {
    type Option = OptionDatabase;

    fn set_option(&mut self, key: Self::Option, value: OptionValue) -> Result<()> {
        let value = match value {
            OptionValue::String(value) => value,
            other => return Err(FlightSqlErrorHelper::set_invalid_option(&key, &other).to_adbc()),
        };
        match key {
            OptionDatabase::Uri => self.apply_uri(&value).map_err(|e| e.to_adbc()),
            OptionDatabase::Username => {
                self.properties.insert(properties::USER, value);
                Ok(())
            }
            OptionDatabase::Password => {
                self.properties.insert(properties::PASSWORD, value);
                Ok(())
            }
            OptionDatabase::Other(ref s) => {
                self.properties.insert(s, value);
                Ok(())
            }
            _ => Err(FlightSqlErrorHelper::set_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_string(&self, key: Self::Option) -> Result<String> {
        match key {
            OptionDatabase::Uri => self.uri.clone().ok_or_else(|| {
                FlightSqlErrorHelper::invalid_state()
                    .message("option 'uri' is not set")
                    .to_adbc()
            }),
            OptionDatabase::Username => self
                .properties
                .first_of(properties::USER_ALIASES)
                .map(str::to_string)
                .ok_or_else(|| {
                    FlightSqlErrorHelper::invalid_state()
                        .message("option 'username' is not set")
                        .to_adbc()
                }),
            OptionDatabase::Other(ref s) if !PropertyMap::is_secret(s) => self
                .properties
                .get(s)
                .map(str::to_string)
                .ok_or_else(|| {
                    FlightSqlErrorHelper::invalid_state()
                        .message(format!("option '{s}' is not set"))
                        .to_adbc()
                }),
            _ => Err(FlightSqlErrorHelper::get_unknown_option(&key).to_adbc()),
        }
    }

    fn get_option_bytes(&self, key: Self::Option) -> Result<Vec<u8>> {
        Err(FlightSqlErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_int(&self, key: Self::Option) -> Result<i64> {
        Err(FlightSqlErrorHelper::get_unknown_option(&key).to_adbc())
    }

    fn get_option_double(&self, key: Self::Option) -> Result<f64> {
        Err(FlightSqlErrorHelper::get_unknown_option(&key).to_adbc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthKind;
    use crate::client::mock::MockClient;
    use crate::connection::LOGIN_TIMEOUT;
    use adbc_core::error::Status;
    use std::time::Duration;

    #[test]
    fn test_database_set_options() {
        let mut db = Database::new();
        db.set_option(
            OptionDatabase::Uri,
            OptionValue::String("grpc+tcp://flight.example:31337".into()),
        )
        .unwrap();
        db.set_option(
            OptionDatabase::Other("authType".into()),
            OptionValue::String("external".into()),
        )
        .unwrap();

        assert_eq!(db.uri(), Some("grpc+tcp://flight.example:31337"));
        assert_eq!(db.properties().get(properties::HOST), Some("flight.example"));
        assert_eq!(db.properties().get(properties::PORT), Some("31337"));
        assert_eq!(db.properties().get(properties::USE_ENCRYPTION), Some("false"));
        assert_eq!(
            db.get_option_string(OptionDatabase::Other("AUTHTYPE".into()))
                .unwrap(),
            "external"
        );
    }

    #[test]
    fn test_invalid_uri() {
        let mut db = Database::new();
        for uri in ["flight.example:1", "http://h:1", "grpc://h:port", "grpc://:1"] {
            let error = db
                .set_option(OptionDatabase::Uri, OptionValue::String(uri.into()))
                .unwrap_err();
            assert_eq!(error.status, Status::InvalidArguments, "{uri}");
        }
        assert!(db.uri().is_none());
    }

    #[test]
    fn test_secrets_not_readable() {
        let mut db = Database::new();
        db.set_option(OptionDatabase::Username, OptionValue::String("alice".into()))
            .unwrap();
        db.set_option(OptionDatabase::Password, OptionValue::String("pw".into()))
            .unwrap();
        db.set_option(
            OptionDatabase::Other("token".into()),
            OptionValue::String("t".into()),
        )
        .unwrap();

        assert_eq!(db.get_option_string(OptionDatabase::Username).unwrap(), "alice");
        assert!(db.get_option_string(OptionDatabase::Password).is_err());
        assert!(db
            .get_option_string(OptionDatabase::Other("TOKEN".into()))
            .is_err());
    }

    #[test]
    fn test_non_string_option_rejected() {
        let mut db = Database::new();
        assert!(db
            .set_option(OptionDatabase::Other("port".into()), OptionValue::Int(1))
            .is_err());
    }

    #[test]
    fn test_database_new_connection() {
        let db = Database::from_connection_string("UID=alice;PWD=pw").unwrap();
        let client = Arc::new(
            MockClient::new().with_basic(Ok(("authorization".into(), "Bearer xyz".into()))),
        );
        let connection = db
            .new_connection_with_opts(
                client.clone(),
                [(
                    OptionConnection::Other(LOGIN_TIMEOUT.into()),
                    OptionValue::Int(9),
                )],
            )
            .unwrap();
        assert_eq!(connection.auth_kind(), Some(AuthKind::Basic));
        assert_eq!(connection.user(), Some("alice"));
        assert_eq!(
            client.basic_calls()[0].options.timeout,
            Some(Duration::from_secs(9))
        );
    }

    #[test]
    fn test_database_new_connection_without_credentials() {
        let db = Database::new();
        let error = db.new_connection(Arc::new(MockClient::new())).unwrap_err();
        assert_eq!(error.status, Status::InvalidArguments);
        assert!(error.message.contains("credentials are required"));
    }
}
