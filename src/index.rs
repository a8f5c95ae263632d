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

//! A queryable tag index over the registry.

use std::collections::HashMap;

use crate::target::Registry;

/// Maps tags to the registry slots of the targets declaring them.
///
/// Resolution preserves the registry's kind-then-declaration order and
/// returns one entry per matching tag, so a target matching several query
/// tags appears several times. De-duplication is the dispatcher's job, not
/// the index's.
#[derive(Debug)]
pub(crate) struct TagIndex {
    by_tag: HashMap<String, Vec<usize>>,
}

impl TagIndex {
    pub(crate) fn new(registry: &Registry) -> TagIndex {
        let mut by_tag: HashMap<String, Vec<usize>> = HashMap::new();
        for (slot, target) in registry.targets().iter().enumerate() {
            for tag in target.tags() {
                by_tag.entry(tag.clone()).or_default().push(slot);
            }
        }
        TagIndex { by_tag }
    }

    /// Resolves every target whose tag set intersects `tags`.
    pub(crate) fn resolve<I>(&self, tags: I) -> Vec<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut slots = Vec::new();
        for tag in tags {
            if let Some(found) = self.by_tag.get(tag.as_ref()) {
                slots.extend_from_slice(found);
            }
        }
        // Registry slots already run file -> console -> network in
        // declaration order; sorting restores it across query tags.
        slots.sort_unstable();
        slots
    }
}
