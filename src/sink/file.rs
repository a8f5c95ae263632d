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

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::record::Record;
use crate::sink::RecordSink;

/// A buffered, append-only file sink.
#[derive(Debug)]
pub(crate) struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Opens `path` for appending, creating it if necessary.
    pub(crate) fn open(path: &Path) -> io::Result<FileSink> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(FileSink {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl RecordSink for FileSink {
    fn write(&self, record: &Record) -> anyhow::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writer.write_all(record.render().as_bytes())?;
        Ok(())
    }

    fn flush(&self) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writer.flush() {
            log::warn!("failed to flush log file {}: {err}", self.path.display());
        }
    }
}
