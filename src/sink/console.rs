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

use std::io::Write;

use crate::record::Record;
use crate::sink::RecordSink;

/// The process streams a console target may bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ConsoleStream {
    Stdout,
    Stderr,
    Stdin,
}

impl ConsoleStream {
    pub(crate) fn parse(name: &str) -> Option<ConsoleStream> {
        match name {
            "stdout" => Some(ConsoleStream::Stdout),
            "stderr" => Some(ConsoleStream::Stderr),
            "stdin" => Some(ConsoleStream::Stdin),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
            ConsoleStream::Stdin => "stdin",
        }
    }
}

/// A sink bound to one of the already-open process streams.
#[derive(Debug)]
pub(crate) struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    pub(crate) fn new(stream: ConsoleStream) -> ConsoleSink {
        ConsoleSink { stream }
    }
}

impl RecordSink for ConsoleSink {
    fn write(&self, record: &Record) -> anyhow::Result<()> {
        let rendered = record.render();
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().write_all(rendered.as_bytes())?,
            ConsoleStream::Stderr => std::io::stderr().write_all(rendered.as_bytes())?,
            // The configuration contract admits stdin as a selector, but the
            // process cannot write to its own stdin; records land nowhere.
            ConsoleStream::Stdin => {}
        }
        Ok(())
    }

    fn flush(&self) {
        match self.stream {
            ConsoleStream::Stdout => {
                let _ = std::io::stdout().flush();
            }
            ConsoleStream::Stderr => {
                let _ = std::io::stderr().flush();
            }
            ConsoleStream::Stdin => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_only_standard_streams() {
        assert_eq!(ConsoleStream::parse("stdout"), Some(ConsoleStream::Stdout));
        assert_eq!(ConsoleStream::parse("stderr"), Some(ConsoleStream::Stderr));
        assert_eq!(ConsoleStream::parse("stdin"), Some(ConsoleStream::Stdin));
        assert_eq!(ConsoleStream::parse("tty"), None);
        assert_eq!(ConsoleStream::parse(""), None);
    }

    #[test]
    fn stdin_writes_are_discarded() {
        let sink = ConsoleSink::new(ConsoleStream::Stdin);
        sink.write(&Record::new("nowhere")).unwrap();
        sink.flush();
    }
}
