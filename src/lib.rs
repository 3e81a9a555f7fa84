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

//! Flight SQL ADBC Driver authentication for Rust
//!
//! This crate decides how a Flight SQL connection authenticates, runs that
//! method against the server, and keeps the call options every later RPC
//! on the connection must carry.
//!
//! ## Overview
//!
//! - [`Driver`] - Entry point, owns one-time log registration
//! - [`Database`] - Holds connection properties
//! - [`Connection`] - Selects an [`auth::AuthMethod`] and authenticates
//!
//! Three methods are supported:
//! - user and password exchanged for a bearer token
//! - a caller supplied bearer token (`token=...`)
//! - browser based OAuth discovery (`authType=external`)
//!
//! The RPC transport is supplied by the caller through
//! [`client::FlightClient`].
//!
//! ## Example
//!
//! ```ignore
//! use flightsql_adbc::Driver;
//!
//! let driver = Driver::new();
//! let connection = driver.connect("host=localhost;port=32010;UID=alice;PWD=secret", client)?;
//! let options = connection.call_options();
//! ```

pub mod auth;
pub mod cancel;
pub mod client;
pub mod connection;
pub mod database;
pub mod driver;
pub mod error;
pub mod properties;

pub use cancel::CancellationSignal;
pub use client::{CallOptions, FlightClient, FlightStatus, FlightStatusCode};
pub use connection::Connection;
pub use database::Database;
pub use driver::Driver;
pub use error::{AuthError, AuthResult, Error, FlightSqlErrorHelper, Result};
pub use properties::PropertyMap;
