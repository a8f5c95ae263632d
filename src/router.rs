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

//! The dispatch engine: tag resolution, de-duplication, and delivery.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;

use crate::config::Config;
use crate::error::ConfigError;
use crate::index::TagIndex;
use crate::record::Record;
use crate::target::Registry;
use crate::target::TargetId;
use crate::target::TargetSink;
use crate::transport::HttpTransport;
use crate::transport::Transport;
use crate::worker::Job;
use crate::worker::Worker;

/// The reserved tag marking the always-on target class. Targets declaring it
/// receive every record regardless of call-specific tags.
pub const ALL_TAG: &str = "all";

/// Tags attached to a single log call. Converts from a single tag or any of
/// the common collection shapes.
#[derive(Clone, Debug)]
pub struct TagQuery(pub(crate) Vec<String>);

impl From<&str> for TagQuery {
    fn from(tag: &str) -> TagQuery {
        TagQuery(vec![tag.to_string()])
    }
}

impl From<String> for TagQuery {
    fn from(tag: String) -> TagQuery {
        TagQuery(vec![tag])
    }
}

impl From<Vec<String>> for TagQuery {
    fn from(tags: Vec<String>) -> TagQuery {
        TagQuery(tags)
    }
}

impl From<Vec<&str>> for TagQuery {
    fn from(tags: Vec<&str>) -> TagQuery {
        TagQuery(tags.iter().map(|tag| tag.to_string()).collect())
    }
}

impl From<&[&str]> for TagQuery {
    fn from(tags: &[&str]) -> TagQuery {
        TagQuery(tags.iter().map(|tag| tag.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TagQuery {
    fn from(tags: [&str; N]) -> TagQuery {
        TagQuery(tags.iter().map(|tag| tag.to_string()).collect())
    }
}

/// Registry and index shared between the caller-facing router and the
/// network delivery worker. Read-only after construction.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) registry: Registry,
    pub(crate) index: TagIndex,
}

/// An owned handle over a built registry, dispatching records to every
/// target whose tags intersect a call's tags.
///
/// File and console writes happen synchronously on the calling thread;
/// network deliveries are queued to a background worker and never block the
/// caller. Dropping the router (or calling [`Router::shutdown`]) drains the
/// queue and flushes every sink.
#[derive(Debug)]
pub struct Router {
    shared: Arc<Shared>,
    always_on: Vec<usize>,
    jobs: Option<Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Router {
    /// Builds a router from `config`, opening every configured sink and
    /// starting the network delivery worker.
    ///
    /// # Errors
    ///
    /// Fails with the registry's fatal configuration errors; see
    /// [`Registry::build`].
    pub fn new(config: Config) -> Result<Router, ConfigError> {
        Router::with_transport(config, HttpTransport::new())
    }

    /// Like [`Router::new`], with a caller-supplied [`Transport`] for
    /// network deliveries.
    pub fn with_transport<T: Transport>(
        config: Config,
        transport: T,
    ) -> Result<Router, ConfigError> {
        let registry = Registry::build(config)?;
        let index = TagIndex::new(&registry);
        let shared = Arc::new(Shared { registry, index });
        let always_on = shared.index.resolve([ALL_TAG]);

        let (jobs, queue) = crossbeam_channel::unbounded();
        let worker = Worker::new(shared.clone(), transport, queue).spawn();

        Ok(Router {
            shared,
            always_on,
            jobs: Some(jobs),
            worker: Some(worker),
        })
    }

    /// Delivers `args` to every target in the always-on class.
    pub fn log(&self, args: fmt::Arguments<'_>) {
        let record = Record::from_args(args);
        let mut used = HashSet::new();
        self.write_slots(&self.always_on, &record, &mut used);
    }

    /// Delivers `args` exactly once to every target matching one of `tags`,
    /// then to the always-on class, skipping targets already written within
    /// this call.
    ///
    /// De-duplication is per call: the same target addressed by two separate
    /// calls receives two records.
    pub fn logt(&self, tags: impl Into<TagQuery>, args: fmt::Arguments<'_>) {
        let tags = tags.into();
        let record = Record::from_args(args);
        let matched = self.shared.index.resolve(&tags.0);
        let mut used = HashSet::new();
        self.write_slots(&matched, &record, &mut used);
        self.write_slots(&self.always_on, &record, &mut used);
    }

    fn write_slots(&self, slots: &[usize], record: &Record, used: &mut HashSet<TargetId>) {
        for &slot in slots {
            let target = &self.shared.registry.targets()[slot];
            if !used.insert(target.id().clone()) {
                continue;
            }
            match target.sink() {
                TargetSink::Writer(sink) => {
                    if let Err(err) = sink.write(record) {
                        log::warn!(
                            "failed to write to {} target {}: {err}",
                            target.kind().as_str(),
                            target.id()
                        );
                    }
                }
                TargetSink::Network(_) => {
                    if let Some(jobs) = &self.jobs {
                        let _ = jobs.send(Job {
                            slot,
                            record: record.clone(),
                        });
                    }
                }
            }
        }
    }

    /// The registry this router dispatches over.
    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    /// Flushes buffered file and console sinks. Queued network deliveries
    /// are unaffected.
    pub fn flush(&self) {
        self.shared.registry.flush();
    }

    /// Stops the network worker after draining queued deliveries, then
    /// flushes every sink. Runs automatically on drop.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        drop(self.jobs.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.shared.registry.flush();
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        self.teardown();
    }
}
