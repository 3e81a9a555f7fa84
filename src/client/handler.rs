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

//! Pluggable handshake handlers.

use super::FlightStatus;

/// Outgoing half of a handshake stream.
pub trait ClientAuthSender {
    fn write(&mut self, payload: &[u8]) -> Result<(), FlightStatus>;
}

/// Incoming half of a handshake stream.
pub trait ClientAuthReader {
    /// Reads the next server payload, `None` once the server is done.
    fn read(&mut self) -> Result<Option<Vec<u8>>, FlightStatus>;
}

/// Drives a custom handshake exchange.
pub trait ClientAuthHandler {
    fn authenticate(
        &mut self,
        outgoing: &mut dyn ClientAuthSender,
        incoming: &mut dyn ClientAuthReader,
    ) -> Result<(), FlightStatus>;

    /// Token to attach to later calls, empty when the handler has none.
    fn token(&mut self) -> Result<String, FlightStatus>;
}

/// Handshake handler that sends one empty payload and ignores the reply.
///
/// Used when the credential is already in the call headers and the
/// handshake only exists to let the server accept or reject it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAuthHandler;

impl ClientAuthHandler for NoOpAuthHandler {
    fn authenticate(
        &mut self,
        outgoing: &mut dyn ClientAuthSender,
        _incoming: &mut dyn ClientAuthReader,
    ) -> Result<(), FlightStatus> {
        outgoing.write(&[])
    }

    fn token(&mut self) -> Result<String, FlightStatus> {
        Ok(String::new())
    }
}
