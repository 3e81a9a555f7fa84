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

//! Scripted in-memory client for unit tests.

use super::{
    CallOptions, ClientAuthHandler, ClientAuthReader, ClientAuthSender, FlightClient,
    FlightStatus, HeaderPair,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded basic handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicCall {
    pub options: CallOptions,
    pub username: String,
    pub password: String,
}

/// One recorded pluggable handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct HandshakeCall {
    pub options: CallOptions,
    pub payloads: Vec<Vec<u8>>,
}

/// Replays queued responses; once a queue runs dry the fallback is used.
#[derive(Debug)]
pub struct MockClient {
    basic: Mutex<VecDeque<Result<HeaderPair, FlightStatus>>>,
    basic_fallback: Result<HeaderPair, FlightStatus>,
    handshake: Mutex<VecDeque<Result<(), FlightStatus>>>,
    basic_calls: Mutex<Vec<BasicCall>>,
    handshake_calls: Mutex<Vec<HandshakeCall>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            basic: Mutex::new(VecDeque::new()),
            basic_fallback: Err(FlightStatus::unstructured("no scripted response")),
            handshake: Mutex::new(VecDeque::new()),
            basic_calls: Mutex::new(Vec::new()),
            handshake_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_basic(self, response: Result<HeaderPair, FlightStatus>) -> Self {
        self.basic.lock().unwrap().push_back(response);
        self
    }

    pub fn with_basic_fallback(mut self, response: Result<HeaderPair, FlightStatus>) -> Self {
        self.basic_fallback = response;
        self
    }

    pub fn with_handshake(self, response: Result<(), FlightStatus>) -> Self {
        self.handshake.lock().unwrap().push_back(response);
        self
    }

    pub fn basic_calls(&self) -> Vec<BasicCall> {
        self.basic_calls.lock().unwrap().clone()
    }

    pub fn handshake_calls(&self) -> Vec<HandshakeCall> {
        self.handshake_calls.lock().unwrap().clone()
    }
}

struct Collect<'a>(&'a mut Vec<Vec<u8>>);

impl ClientAuthSender for Collect<'_> {
    fn write(&mut self, payload: &[u8]) -> Result<(), FlightStatus> {
        self.0.push(payload.to_vec());
        Ok(())
    }
}

struct Done;

impl ClientAuthReader for Done {
    fn read(&mut self) -> Result<Option<Vec<u8>>, FlightStatus> {
        Ok(None)
    }
}

impl FlightClient for MockClient {
    fn authenticate_basic_token(
        &self,
        options: &CallOptions,
        username: &str,
        password: &str,
    ) -> Result<HeaderPair, FlightStatus> {
        self.basic_calls.lock().unwrap().push(BasicCall {
            options: options.clone(),
            username: username.to_string(),
            password: password.to_string(),
        });
        self.basic
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.basic_fallback.clone())
    }

    fn authenticate(
        &self,
        options: &CallOptions,
        handler: &mut dyn ClientAuthHandler,
    ) -> Result<(), FlightStatus> {
        let mut payloads = Vec::new();
        handler.authenticate(&mut Collect(&mut payloads), &mut Done)?;
        handler.token()?;
        self.handshake_calls.lock().unwrap().push(HandshakeCall {
            options: options.clone(),
            payloads,
        });
        self.handshake.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
