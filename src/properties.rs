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

//! Connection properties.
//!
//! Keys are matched case-insensitively, the way ODBC treats connection
//! string attributes. Some concepts arrive under several historical
//! spellings; the alias tables below fix the order in which they win.

use crate::error::{FlightSqlErrorHelper, Result};
use driverbase::error::ErrorHelper;
use std::collections::BTreeMap;

pub const AUTH_TYPE: &str = "authType";
pub const HOST: &str = "host";
pub const PORT: &str = "port";
pub const USE_ENCRYPTION: &str = "useEncryption";
pub const USER: &str = "user";
/// Written by the OLE DB to ODBC bridge (MSDASQL) instead of `UID`.
pub const USER_ID: &str = "User ID";
pub const UID: &str = "UID";
pub const PASSWORD: &str = "password";
pub const PWD: &str = "PWD";
pub const TOKEN: &str = "token";

/// `authType` value selecting browser based OAuth.
pub const AUTH_TYPE_EXTERNAL: &str = "external";

/// Username aliases, highest priority first.
pub const USER_ALIASES: &[&str] = &[USER, USER_ID, UID];
/// Password aliases, highest priority first.
pub const PASSWORD_ALIASES: &[&str] = &[PASSWORD, PWD];

/// Keys whose values are never handed back to callers.
pub const SECRET_KEYS: &[&str] = &[PASSWORD, PWD, TOKEN];

/// Case-insensitive connection property map.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: BTreeMap<String, String>,
}

fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

impl PropertyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any value stored under another spelling of it.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries.insert(normalize(key.as_ref()), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize(key)).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize(key))
    }

    /// Value of the first alias present, in priority order.
    pub fn first_of(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| self.get(alias))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates normalized keys and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True if `key` names a credential.
    pub fn is_secret(key: &str) -> bool {
        SECRET_KEYS.iter().any(|secret| secret.eq_ignore_ascii_case(key.trim()))
    }

    /// Parses an ODBC style connection string, `key=value;key={va;lue}`.
    ///
    /// Braced values may contain `;` and use `}}` for a literal `}`.
    pub fn from_connection_string(input: &str) -> Result<Self> {
        let mut map = Self::new();
        let mut chars = input.chars().peekable();

        loop {
            let mut key = String::new();
            while let Some(&c) = chars.peek() {
                if c == '=' || c == ';' {
                    break;
                }
                key.push(c);
                chars.next();
            }

            match chars.next() {
                None | Some(';') => {
                    if key.trim().is_empty() {
                        if chars.peek().is_none() {
                            break;
                        }
                        continue;
                    }
                    return Err(FlightSqlErrorHelper::invalid_argument().message(format!(
                        "connection string attribute '{}' has no value",
                        key.trim()
                    )));
                }
                Some(_) => {}
            }

            if key.trim().is_empty() {
                return Err(FlightSqlErrorHelper::invalid_argument()
                    .message("connection string contains an attribute with an empty name"));
            }

            let mut value = String::new();
            if chars.peek() == Some(&'{') {
                chars.next();
                loop {
                    match chars.next() {
                        Some('}') if chars.peek() == Some(&'}') => {
                            chars.next();
                            value.push('}');
                        }
                        Some('}') => break,
                        Some(c) => value.push(c),
                        None => {
                            return Err(FlightSqlErrorHelper::invalid_argument().message(format!(
                                "unterminated braced value for attribute '{}'",
                                key.trim()
                            )))
                        }
                    }
                }
                while let Some(&c) = chars.peek() {
                    if c == ';' {
                        break;
                    }
                    if !c.is_whitespace() {
                        return Err(FlightSqlErrorHelper::invalid_argument().message(format!(
                            "unexpected text after braced value for attribute '{}'",
                            key.trim()
                        )));
                    }
                    chars.next();
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c == ';' {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
                value = value.trim().to_string();
            }

            map.insert(key, value);

            if chars.next().is_none() {
                break;
            }
        }

        Ok(map)
    }
}

impl std::fmt::Debug for PropertyMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| {
                let shown = if Self::is_secret(k) { "****" } else { v };
                (k, shown)
            }))
            .finish()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Parses a boolean property value; `None` when it is not a boolean.
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}
