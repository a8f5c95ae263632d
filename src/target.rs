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

//! Delivery targets and the registry built from configuration.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use jiff::Timestamp;
use rand::Rng;

use crate::config::Config;
use crate::config::ConsoleConfig;
use crate::config::FileConfig;
use crate::config::NetworkConfig;
use crate::error::ConfigError;
use crate::sink::ConsoleSink;
use crate::sink::ConsoleStream;
use crate::sink::FileSink;
use crate::sink::RecordSink;
use crate::transport::Endpoint;

/// Stable identity of a target within one registry.
///
/// Ids are assigned at build time and never change for the life of the
/// registry; they are the de-duplication key for dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(String);

impl TargetId {
    fn generated() -> TargetId {
        let bits: u64 = rand::rng().random();
        TargetId(format!("{bits:016x}"))
    }

    fn named(name: &str) -> TargetId {
        TargetId(name.to_string())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a delivery target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Console,
    Network,
}

impl TargetKind {
    /// The kind's configuration section name.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::File => "file",
            TargetKind::Console => "console",
            TargetKind::Network => "network",
        }
    }
}

#[derive(Debug)]
pub(crate) enum TargetSink {
    /// A locally writable sink: file or console.
    Writer(Box<dyn RecordSink>),
    /// A network destination; deliveries go through a [`crate::Transport`].
    Network(Endpoint),
}

/// A configured delivery destination.
#[derive(Debug)]
pub struct Target {
    id: TargetId,
    kind: TargetKind,
    tags: BTreeSet<String>,
    fallback_tags: BTreeSet<String>,
    sink: TargetSink,
}

impl Target {
    /// The target's stable identity.
    pub fn id(&self) -> &TargetId {
        &self.id
    }

    /// The target's kind.
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// The tags this target is reachable through.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Tags selecting the targets notified when delivery to this one fails.
    /// Empty for anything but network targets.
    pub fn fallback_tags(&self) -> &BTreeSet<String> {
        &self.fallback_tags
    }

    pub(crate) fn sink(&self) -> &TargetSink {
        &self.sink
    }
}

/// The full set of delivery targets, built once at startup and read-only for
/// the rest of the process lifetime.
///
/// Targets are stored grouped by kind — files first, then consoles, then
/// network targets — preserving declaration order within a kind, so tag
/// resolution stays deterministic.
#[derive(Debug)]
pub struct Registry {
    targets: Vec<Target>,
}

impl Registry {
    /// Builds a registry from an owned configuration: assigns ids,
    /// normalizes tag fields into sets, and opens every sink.
    ///
    /// # Errors
    ///
    /// Fails fatally when a console target names an unknown stream, a
    /// network target lacks a usable url, or a log file cannot be opened
    /// for appending.
    pub fn build(config: Config) -> Result<Registry, ConfigError> {
        let mut targets = Vec::new();
        for file in config.file {
            targets.push(build_file(file)?);
        }
        for console in config.console {
            targets.push(build_console(console)?);
        }
        for network in config.network {
            targets.push(build_network(network)?);
        }
        Ok(Registry { targets })
    }

    /// All targets, ordered file → console → network.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the registry holds no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Flushes every buffered local sink.
    pub(crate) fn flush(&self) {
        for target in &self.targets {
            if let TargetSink::Writer(sink) = &target.sink {
                sink.flush();
            }
        }
    }
}

fn build_file(config: FileConfig) -> Result<Target, ConfigError> {
    let path = config
        .path
        .unwrap_or_else(|| PathBuf::from(format!("{}.log", Timestamp::now())));
    let sink = FileSink::open(&path).map_err(|source| ConfigError::OpenFile { path, source })?;
    Ok(Target {
        id: TargetId::generated(),
        kind: TargetKind::File,
        tags: config.tags.into_set(),
        fallback_tags: BTreeSet::new(),
        sink: TargetSink::Writer(Box::new(sink)),
    })
}

fn build_console(config: ConsoleConfig) -> Result<Target, ConfigError> {
    let stream = ConsoleStream::parse(&config.stdstream)
        .ok_or_else(|| ConfigError::InvalidStream(config.stdstream.clone()))?;
    Ok(Target {
        // There is at most one console target per standard stream, so the
        // stream name is a stable, deterministic id.
        id: TargetId::named(stream.name()),
        kind: TargetKind::Console,
        tags: config.tags.into_set(),
        fallback_tags: BTreeSet::new(),
        sink: TargetSink::Writer(Box::new(ConsoleSink::new(stream))),
    })
}

fn build_network(config: NetworkConfig) -> Result<Target, ConfigError> {
    let url = config
        .url
        .filter(|url| !url.is_empty())
        .ok_or(ConfigError::MissingUrl)?;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::UnsupportedUrl(url));
    }

    let method = config.method.unwrap_or_else(|| "POST".to_string());
    if method.eq_ignore_ascii_case("GET") {
        log::warn!(
            "network target {url} uses the GET method; delivering payloads with GET \
             is unreliable across intermediaries"
        );
    }

    let mut headers = config.headers.unwrap_or_default();
    headers
        .entry("content-type".to_string())
        .or_insert_with(|| "text/plain".to_string());

    Ok(Target {
        id: TargetId::generated(),
        kind: TargetKind::Network,
        tags: config.tags.into_set(),
        fallback_tags: config.fallback_tags.into_set(),
        sink: TargetSink::Network(Endpoint {
            url,
            method,
            headers,
        }),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::Tags;

    fn file_config(dir: &tempfile::TempDir, name: &str, tags: Tags) -> FileConfig {
        FileConfig {
            tags,
            path: Some(dir.path().join(name)),
        }
    }

    #[test]
    fn targets_are_ordered_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            network: vec![NetworkConfig {
                tags: Tags::from("net"),
                url: Some("http://collector.invalid/logs".to_string()),
                ..NetworkConfig::default()
            }],
            console: vec![ConsoleConfig {
                tags: Tags::from("error"),
                stdstream: "stderr".to_string(),
            }],
            file: vec![file_config(&dir, "a.log", Tags::from("all"))],
        };

        let registry = Registry::build(config).unwrap();
        let kinds: Vec<TargetKind> = registry.targets().iter().map(|t| t.kind()).collect();
        assert_eq!(
            kinds,
            vec![TargetKind::File, TargetKind::Console, TargetKind::Network]
        );
    }

    #[test]
    fn generated_ids_are_unique_and_console_ids_are_stream_names() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            file: vec![
                file_config(&dir, "a.log", Tags::from("a")),
                file_config(&dir, "b.log", Tags::from("b")),
            ],
            console: vec![ConsoleConfig {
                tags: Tags::from("error"),
                stdstream: "stderr".to_string(),
            }],
            network: vec![],
        };

        let registry = Registry::build(config).unwrap();
        assert_ne!(registry.targets()[0].id(), registry.targets()[1].id());
        assert_eq!(registry.targets()[2].id().as_str(), "stderr");
    }

    #[test]
    fn unknown_console_stream_is_fatal() {
        let config = Config {
            console: vec![ConsoleConfig {
                tags: Tags::default(),
                stdstream: "tty0".to_string(),
            }],
            ..Config::default()
        };
        let err = Registry::build(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStream(name) if name == "tty0"));
    }

    #[test]
    fn network_target_without_url_is_fatal() {
        let config = Config {
            network: vec![NetworkConfig::default()],
            ..Config::default()
        };
        assert!(matches!(
            Registry::build(config).unwrap_err(),
            ConfigError::MissingUrl
        ));
    }

    #[test]
    fn network_target_with_bare_host_is_fatal() {
        let config = Config {
            network: vec![NetworkConfig {
                url: Some("collector.invalid:9000".to_string()),
                ..NetworkConfig::default()
            }],
            ..Config::default()
        };
        assert!(matches!(
            Registry::build(config).unwrap_err(),
            ConfigError::UnsupportedUrl(_)
        ));
    }

    #[test]
    fn network_defaults_fill_method_and_content_type() {
        let config = Config {
            network: vec![NetworkConfig {
                url: Some("http://collector.invalid/logs".to_string()),
                ..NetworkConfig::default()
            }],
            ..Config::default()
        };
        let registry = Registry::build(config).unwrap();
        let TargetSink::Network(endpoint) = registry.targets()[0].sink() else {
            panic!("expected a network sink");
        };
        assert_eq!(endpoint.method(), "POST");
        let headers: Vec<(&str, &str)> = endpoint.headers().collect();
        assert_eq!(headers, vec![("content-type", "text/plain")]);
    }

    #[test]
    fn get_method_is_kept_after_the_advisory() {
        let config = Config {
            network: vec![NetworkConfig {
                url: Some("http://collector.invalid/logs".to_string()),
                method: Some("GET".to_string()),
                ..NetworkConfig::default()
            }],
            ..Config::default()
        };
        // GET is discouraged but legal; the build must not fail.
        let registry = Registry::build(config).unwrap();
        let TargetSink::Network(endpoint) = registry.targets()[0].sink() else {
            panic!("expected a network sink");
        };
        assert_eq!(endpoint.method(), "GET");
    }

    #[test]
    fn console_targets_sharing_a_stream_share_an_id() {
        // The built-in defaults declare several stdout targets; they all
        // carry the stream-name id, so one call writes stdout at most once.
        let config = Config {
            console: vec![
                ConsoleConfig {
                    tags: Tags::from("warn"),
                    stdstream: "stdout".to_string(),
                },
                ConsoleConfig {
                    tags: Tags::from(["all", "log"]),
                    stdstream: "stdout".to_string(),
                },
            ],
            ..Config::default()
        };
        let registry = Registry::build(config).unwrap();
        assert_eq!(registry.targets()[0].id().as_str(), "stdout");
        assert_eq!(registry.targets()[0].id(), registry.targets()[1].id());
    }

    #[test]
    fn declared_headers_are_kept_alongside_the_default() {
        let config = Config {
            network: vec![NetworkConfig {
                url: Some("http://collector.invalid/logs".to_string()),
                headers: Some(BTreeMap::from([(
                    "authorization".to_string(),
                    "Bearer token".to_string(),
                )])),
                ..NetworkConfig::default()
            }],
            ..Config::default()
        };
        let registry = Registry::build(config).unwrap();
        let TargetSink::Network(endpoint) = registry.targets()[0].sink() else {
            panic!("expected a network sink");
        };
        let headers: BTreeMap<&str, &str> = endpoint.headers().collect();
        assert_eq!(headers.get("authorization"), Some(&"Bearer token"));
        assert_eq!(headers.get("content-type"), Some(&"text/plain"));
    }

    #[test]
    fn empty_tags_are_legal() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            file: vec![file_config(&dir, "untagged.log", Tags::default())],
            ..Config::default()
        };
        let registry = Registry::build(config).unwrap();
        assert!(registry.targets()[0].tags().is_empty());
    }
}
