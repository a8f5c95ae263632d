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

//! Configuration model for the router.
//!
//! Configurations are plain JSON with one list per target kind:
//!
//! ```json
//! {
//!   "file":    [ { "tags": "all" } ],
//!   "console": [ { "tags": ["error"], "stdstream": "stderr" } ],
//!   "network": [ { "tags": "audit", "url": "http://collector:9000/logs",
//!                  "fallbackTags": "httpErrors" } ]
//! }
//! ```
//!
//! Tag fields accept either a single string or a list of strings; the
//! registry normalizes both forms into a set at build time, exactly once.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable supplying the url of the built-in default network
/// target. When unset, the default configuration carries no network target.
pub const DEFAULT_SERVER_URL_VAR: &str = "TAGROUTE_SERVER_URL";

/// A tag field that accepts a single string or a list of strings.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Tags {
    /// A single tag, e.g. `"tags": "error"`.
    One(String),
    /// A list of tags, e.g. `"tags": ["all", "log"]`.
    Many(Vec<String>),
}

impl Tags {
    pub(crate) fn into_set(self) -> BTreeSet<String> {
        match self {
            Tags::One(tag) => BTreeSet::from([tag]),
            Tags::Many(tags) => tags.into_iter().collect(),
        }
    }
}

impl Default for Tags {
    fn default() -> Tags {
        Tags::Many(Vec::new())
    }
}

impl From<&str> for Tags {
    fn from(tag: &str) -> Tags {
        Tags::One(tag.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for Tags {
    fn from(tags: [&str; N]) -> Tags {
        Tags::Many(tags.iter().map(|tag| tag.to_string()).collect())
    }
}

/// Declaration of one file target.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub tags: Tags,
    /// Path to append records to. Defaults to a timestamp-derived file name
    /// in the working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Declaration of one console target.
#[derive(Clone, Debug, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub tags: Tags,
    /// One of `stdout`, `stderr`, or `stdin`.
    pub stdstream: String,
}

/// Declaration of one network target.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub tags: Tags,
    /// Full destination url, including the protocol and port.
    #[serde(default)]
    pub url: Option<String>,
    /// HTTP method; defaults to `POST`.
    #[serde(default)]
    pub method: Option<String>,
    /// Request headers; `content-type: text/plain` is inserted when absent.
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    /// Tags selecting the targets notified when delivery to this one fails.
    #[serde(default, rename = "fallbackTags")]
    pub fallback_tags: Tags,
}

/// The declared set of delivery targets, before the registry resolves ids,
/// normalizes tags, and opens sinks.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub file: Vec<FileConfig>,
    #[serde(default)]
    pub console: Vec<ConsoleConfig>,
    #[serde(default)]
    pub network: Vec<NetworkConfig>,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if the text is not valid JSON of
    /// the expected shape.
    pub fn from_json(text: &str) -> Result<Config, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Malformed`] if its content does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_json(&text)
    }

    /// Reads a configuration file, substituting the built-in defaults when
    /// the file does not exist.
    ///
    /// A missing file is an advisory, not an error; malformed content in an
    /// existing file is still fatal.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        match Config::from_path(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "no configuration found at {}; using the built-in default targets",
                    path.display()
                );
                Ok(Config::builtin())
            }
            Err(err) => Err(err),
        }
    }

    /// The built-in default target set: one file target tagged `all`, one
    /// console target per severity tag on the appropriate stream, and an
    /// inert network target tagged `none` when [`DEFAULT_SERVER_URL_VAR`]
    /// supplies a url.
    pub fn builtin() -> Config {
        let console = [
            ("error", "stderr"),
            ("warn", "stdout"),
            ("info", "stdout"),
            ("verbose", "stdout"),
        ]
        .into_iter()
        .map(|(tag, stream)| ConsoleConfig {
            tags: Tags::from(tag),
            stdstream: stream.to_string(),
        })
        .chain([ConsoleConfig {
            tags: Tags::from(["all", "log"]),
            stdstream: "stdout".to_string(),
        }])
        .collect();

        let network = match env::var(DEFAULT_SERVER_URL_VAR) {
            Ok(url) => vec![NetworkConfig {
                tags: Tags::from("none"),
                url: Some(url),
                ..NetworkConfig::default()
            }],
            Err(_) => Vec::new(),
        };

        Config {
            file: vec![FileConfig {
                tags: Tags::from("all"),
                path: None,
            }],
            console,
            network,
        }
    }
}
