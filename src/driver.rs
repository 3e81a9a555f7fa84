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

//! Driver entry point for Flight SQL.

use crate::client::FlightClient;
use crate::connection::Connection;
use crate::database::Database;
use adbc_core::error::Result;
use adbc_core::options::{OptionDatabase, OptionValue};
use adbc_core::Optionable;
use std::sync::{Arc, OnceLock};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the driver's log filter directives.
pub const LOG_ENV: &str = "FLIGHTSQL_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// The main entry point for the Flight SQL driver.
///
/// The process entry point owns one Driver and creates Databases from it.
/// Log output is registered once, the first time a Database is created.
#[derive(Debug, Default)]
pub struct Driver {
    log_registered: OnceLock<()>,
}

impl Driver {
    /// Creates a new Driver instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the driver's log subscriber unless one is already set.
    pub fn register_log(&self) {
        self.log_registered.get_or_init(|| {
            let filter = EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
            // An application that installed its own subscriber keeps it.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .try_init();
        });
    }

    pub fn new_database(&self) -> Result<Database> {
        self.register_log();
        Ok(Database::new())
    }

    pub fn new_database_with_opts(
        &self,
        opts: impl IntoIterator<Item = (OptionDatabase, OptionValue)>,
    ) -> Result<Database> {
        let mut database = self.new_database()?;
        for (key, value) in opts {
            database.set_option(key, value)?;
        }
        Ok(database)
    }

    /// Parses `connection_string` and opens an authenticated connection.
    pub fn connect(
        &self,
        connection_string: &str,
        client: Arc<dyn FlightClient>,
    ) -> Result<Connection> {
        self.register_log();
        let database =
            Database::from_connection_string(connection_string).map_err(|e| e.to_adbc())?;
        database.new_connection(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockClient;

    #[test]
    fn test_driver_new_database() {
        let driver = Driver::new();
        assert!(driver.new_database().is_ok());
        assert!(driver.new_database().is_ok());
    }

    #[test]
    fn test_driver_new_database_with_opts() {
        let driver = Driver::new();
        let opts = [(
            OptionDatabase::Uri,
            OptionValue::String("grpc+tls://flight.example:443".into()),
        )];
        let database = driver.new_database_with_opts(opts).unwrap();
        assert_eq!(database.uri(), Some("grpc+tls://flight.example:443"));
    }

    #[test]
    fn test_driver_connect_with_token() {
        let driver = Driver::new();
        let client = Arc::new(MockClient::new());
        let connection = driver.connect("HOST=h;token={abc}", client.clone()).unwrap();
        assert_eq!(
            connection.call_options().headers,
            vec![("authorization".to_string(), "Bearer abc".to_string())]
        );
        assert_eq!(client.handshake_calls().len(), 1);
    }

    #[test]
    fn test_driver_connect_bad_connection_string() {
        let driver = Driver::new();
        assert!(driver
            .connect("PWD={unterminated", Arc::new(MockClient::new()))
            .is_err());
    }
}
