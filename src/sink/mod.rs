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

//! Sink writers for the local target kinds.

use std::fmt;

use crate::record::Record;

mod console;
mod file;

pub(crate) use self::console::ConsoleSink;
pub(crate) use self::console::ConsoleStream;
pub(crate) use self::file::FileSink;

/// A destination that accepts rendered records.
///
/// Writes are buffered; nothing reaches the underlying stream until it fills
/// or [`RecordSink::flush`] runs.
pub(crate) trait RecordSink: fmt::Debug + Send + Sync + 'static {
    /// Appends one record.
    fn write(&self, record: &Record) -> anyhow::Result<()>;

    /// Flushes any buffered records.
    fn flush(&self) {}
}
