// Copyright 2024 FastLabs Developers
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

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use tagroute::Endpoint;
use tagroute::FileConfig;
use tagroute::Tags;
use tagroute::Transport;

/// One delivery observed by [`RecordingTransport`].
#[derive(Clone, Debug)]
pub struct Delivery {
    pub url: String,
    pub method: String,
    pub body: String,
}

/// A transport double that records every delivery and fails urls on demand.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    sent: Vec<Delivery>,
    failing: Vec<String>,
}

impl RecordingTransport {
    pub fn new() -> RecordingTransport {
        RecordingTransport::default()
    }

    /// Makes every delivery to a url containing `fragment` fail.
    pub fn fail_url(&self, fragment: &str) {
        self.state.lock().unwrap().failing.push(fragment.to_string());
    }

    /// Every delivery handed to the transport, in order.
    pub fn sent(&self) -> Vec<Delivery> {
        self.state.lock().unwrap().sent.clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, endpoint: &Endpoint, body: &[u8]) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.sent.push(Delivery {
            url: endpoint.url().to_string(),
            method: endpoint.method().to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
        });
        if state
            .failing
            .iter()
            .any(|fragment| endpoint.url().contains(fragment))
        {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

pub fn file_target(dir: &Path, name: &str, tags: impl Into<Tags>) -> (FileConfig, PathBuf) {
    let path = dir.join(name);
    let config = FileConfig {
        tags: tags.into(),
        path: Some(path.clone()),
    };
    (config, path)
}

/// Reads a log file back as lines, treating a missing file as empty.
pub fn lines(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}
