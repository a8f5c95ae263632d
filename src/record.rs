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

//! Formatted log records.

use std::fmt;

use jiff::Timestamp;

/// One formatted, timestamped log line.
///
/// A record is produced fresh for every log call and never mutated
/// afterwards. [`Record::render`] appends the trailing newline so the result
/// can be handed to a sink as-is.
#[derive(Clone, Debug)]
pub struct Record {
    timestamp: Timestamp,
    message: String,
}

impl Record {
    /// Creates a record carrying `message`, stamped with the current time.
    pub fn new(message: impl Into<String>) -> Record {
        Record {
            timestamp: Timestamp::now(),
            message: message.into(),
        }
    }

    pub(crate) fn from_args(args: fmt::Arguments<'_>) -> Record {
        Record::new(args.to_string())
    }

    /// The message without timestamp or terminator.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The time the record was produced.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Renders the record into its wire form: timestamp, message, newline.
    pub fn render(&self) -> String {
        format!("{} - {}\n", self.timestamp, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_ends_with_newline() {
        let record = Record::new("boom");
        let rendered = record.render();
        assert!(rendered.ends_with("boom\n"));
        assert!(rendered.contains(" - "));
    }

    #[test]
    fn from_args_formats_payload() {
        let record = Record::from_args(format_args!("{} + {}", 1, 2));
        assert_eq!(record.message(), "1 + 2");
    }
}
