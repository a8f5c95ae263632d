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

//! Tagroute is a multiplexed log-record router. A log call carries a free
//! form payload plus an optional set of classification tags; the router
//! formats the payload into one timestamped record and delivers it, exactly
//! once per call, to every configured target whose declared tags intersect
//! the call's tags. Targets tagged `all` form an always-on class that
//! receives every record.
//!
//! Targets come in three kinds, resolved in a fixed order: files, console
//! streams, and network endpoints. When delivery to a network target fails,
//! the record is rerouted once to the targets matching that target's
//! `fallbackTags`, wrapped in an error notice — the failing target itself is
//! excluded, and failures during rerouting are absorbed.
//!
//! # Examples
//!
//! ```no_run
//! let config = tagroute::Config::load_or_default("tagroute.conf.json")?;
//! let router = tagroute::Router::new(config)?;
//!
//! tagroute::log!(router, "service started");
//! tagroute::logt!(router, "verbose", "download progress: {}/{}", 51, 106);
//! tagroute::logt!(router, ["error", "info"], "failed to parse json at {}", "data.json");
//!
//! router.shutdown();
//! # Ok::<(), tagroute::ConfigError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod config;
mod error;
mod index;
mod macros;
mod record;
mod router;
mod sink;
mod target;
mod transport;
mod worker;

pub use config::Config;
pub use config::ConsoleConfig;
pub use config::DEFAULT_SERVER_URL_VAR;
pub use config::FileConfig;
pub use config::NetworkConfig;
pub use config::Tags;
pub use error::ConfigError;
pub use record::Record;
pub use router::ALL_TAG;
pub use router::Router;
pub use router::TagQuery;
pub use target::Registry;
pub use target::Target;
pub use target::TargetId;
pub use target::TargetKind;
pub use transport::Endpoint;
pub use transport::HttpTransport;
pub use transport::Transport;
