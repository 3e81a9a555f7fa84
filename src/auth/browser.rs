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

//! Opening the user's browser.

use std::fmt::Debug;
use std::process::{Command, Stdio};

/// Opens a URL for the user to visit.
pub trait BrowserLauncher: Send + Sync + Debug {
    /// Fire-and-forget; failures are logged, never returned.
    fn launch(&self, url: &str);
}

/// Launches the platform's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Command {
        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut command = Command::new("rundll32");
            command.arg("url.dll,FileProtocolHandler");
            command
        } else {
            Command::new("xdg-open")
        };
        command.arg(url);
        command
    }
}

impl BrowserLauncher for SystemBrowser {
    fn launch(&self, url: &str) {
        // The URL is passed as a single argument, never through a shell.
        let spawned = Self::command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            // Reap the opener in the background so it does not linger as a zombie.
            Ok(mut child) => {
                std::thread::spawn(move || child.wait());
            }
            Err(error) => {
                tracing::warn!(%error, "could not open a browser; open the OAuth URL manually");
            }
        }
    }
}
