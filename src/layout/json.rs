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

use jiff::Zoned;
use jiff::tz::TimeZone;
use serde::Serialize;

use crate::Error;
use crate::layout::FileRecord;
use crate::layout::Layout;
use crate::layout::zoned;
use crate::platform::render_error;

/// A JSON layout for formatting file records.
///
/// Output format:
///
/// ```json
/// {"timestamp":"2024-08-11T22:44:57.172+08:00","level":"ERROR","tag":"Repo","message":"fetch failed","error":"connection reset"}
/// {"timestamp":"2024-08-11T22:44:57.172+08:00","level":"INFO","tag":"Repo","message":"fetched 12 rows"}
/// ```
///
/// # Examples
///
/// ```
/// use flexilog::layout::JsonLayout;
///
/// let json_layout = JsonLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    tz: Option<TimeZone>,
}

impl JsonLayout {
    /// Render timestamps in the given timezone instead of the system one.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    #[serde(serialize_with = "serialize_time")]
    timestamp: Zoned,
    level: &'a str,
    tag: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn serialize_time<S>(timestamp: &Zoned, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&timestamp.strftime("%Y-%m-%dT%H:%M:%S.%3f%:z"))
}

impl Layout for JsonLayout {
    fn format(&self, record: &FileRecord<'_>) -> Result<Vec<u8>, Error> {
        let line = RecordLine {
            timestamp: zoned(record.timestamp, self.tz.as_ref())?,
            level: record.log_type.as_str(),
            tag: record.tag,
            message: record.message,
            error: record.error.map(render_error),
        };

        serde_json::to_vec(&line)
            .map_err(|err| Error::new("failed to serialize record").with_source(err))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::LogType;

    #[test]
    fn test_json_layout() {
        let layout = JsonLayout::default().timezone(TimeZone::UTC);
        let err = io::Error::other("connection reset");
        let record = FileRecord {
            timestamp: 1_723_387_497_172,
            log_type: LogType::Error,
            tag: "Repo",
            message: "fetch failed",
            error: Some(&err),
        };

        let bytes = layout.format(&record).unwrap();
        let line: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(line["timestamp"], "2024-08-11T14:44:57.172+00:00");
        assert_eq!(line["level"], "ERROR");
        assert_eq!(line["tag"], "Repo");
        assert_eq!(line["message"], "fetch failed");
        assert_eq!(line["error"], "connection reset");
    }
}
