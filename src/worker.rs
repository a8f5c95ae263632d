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

//! Background delivery of network records and failure rerouting.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;

use crate::record::Record;
use crate::router::Shared;
use crate::target::Target;
use crate::target::TargetSink;
use crate::transport::Transport;

/// One queued network delivery: the registry slot of the target and the
/// record produced at call time, so every target of one call sees the same
/// timestamp.
#[derive(Debug)]
pub(crate) struct Job {
    pub(crate) slot: usize,
    pub(crate) record: Record,
}

/// Consumes queued deliveries on a dedicated thread.
///
/// Delivery completions, and therefore all fallback routing, happen here, in
/// submission order. The worker exits once every sender is dropped and the
/// queue has drained.
pub(crate) struct Worker<T> {
    shared: Arc<Shared>,
    transport: T,
    jobs: Receiver<Job>,
}

impl<T: Transport> Worker<T> {
    pub(crate) fn new(shared: Arc<Shared>, transport: T, jobs: Receiver<Job>) -> Worker<T> {
        Worker {
            shared,
            transport,
            jobs,
        }
    }

    pub(crate) fn spawn(self) -> thread::JoinHandle<()> {
        thread::Builder::new()
            .name("tagroute-network".to_string())
            .spawn(move || self.run())
            .expect("failed to spawn the network delivery worker thread")
    }

    fn run(self) {
        while let Ok(job) = self.jobs.recv() {
            self.deliver(job);
        }
    }

    fn deliver(&self, job: Job) {
        let target = &self.shared.registry.targets()[job.slot];
        let TargetSink::Network(endpoint) = target.sink() else {
            return;
        };
        let body = job.record.render().into_bytes();
        if self.transport.send(endpoint, &body).is_err() {
            self.reroute(target, job.record.message());
        }
    }

    /// Routes a failure notice to the targets matching the failed target's
    /// fallback tags, excluding the failed target itself.
    ///
    /// Single hop: failures here are absorbed, never rerouted again.
    fn reroute(&self, failed: &Target, message: &str) {
        let wrapped = Record::new(format!("error writing to network target: {message}"));
        let mut used = HashSet::new();
        used.insert(failed.id().clone());
        for slot in self.shared.index.resolve(failed.fallback_tags()) {
            let target = &self.shared.registry.targets()[slot];
            if !used.insert(target.id().clone()) {
                continue;
            }
            match target.sink() {
                TargetSink::Writer(sink) => {
                    if let Err(err) = sink.write(&wrapped) {
                        log::warn!(
                            "failed to write fallback record to {} target {}: {err}",
                            target.kind().as_str(),
                            target.id()
                        );
                    }
                }
                TargetSink::Network(endpoint) => {
                    let body = wrapped.render().into_bytes();
                    let _ = self.transport.send(endpoint, &body);
                }
            }
        }
    }
}
