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

use std::io;
use std::path::PathBuf;

/// Fatal errors raised while loading configuration or building the target
/// registry.
///
/// None of these are recoverable; they are reported once at startup and the
/// registry is never rebuilt afterwards. Delivery failures at runtime do not
/// surface here — they are rerouted through fallback tags instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(
        "console targets must set 'stdstream' to one of 'stdout', 'stderr', or 'stdin', got {0:?}"
    )]
    InvalidStream(String),
    #[error("network targets must set 'url' in full, including the protocol and port")]
    MissingUrl,
    #[error("unsupported network url {0:?}: only http and https urls are accepted")]
    UnsupportedUrl(String),
    #[error("failed to open log file at {path} for appending: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
