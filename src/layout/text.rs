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

use std::fmt::Write;

use jiff::tz::TimeZone;

use crate::Error;
use crate::layout::FileRecord;
use crate::layout::Layout;
use crate::layout::zoned;
use crate::platform::render_error;

/// A layout that formats file records as plain text.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172+08:00   ERROR Repo: fetch failed | connection reset
/// 2024-08-11T22:44:57.172+08:00    WARN Repo: retrying
/// 2024-08-11T22:44:57.172+08:00    INFO Repo: fetched 12 rows
/// ```
///
/// Attached errors follow the message after ` | `, causes separated the same way, so every
/// record stays on one line.
///
/// # Examples
///
/// ```
/// use flexilog::layout::TextLayout;
///
/// let text_layout = TextLayout::default();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    tz: Option<TimeZone>,
}

impl TextLayout {
    /// Render timestamps in the given timezone instead of the system one.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use flexilog::layout::TextLayout;
    ///
    /// let text_layout = TextLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &FileRecord<'_>) -> Result<Vec<u8>, Error> {
        let time = zoned(record.timestamp, self.tz.as_ref())?;
        let time = time.strftime("%Y-%m-%dT%H:%M:%S.%3f%:z");
        let level = record.log_type.as_str();

        let mut text = String::new();
        write!(&mut text, "{time} {level:>7} {}: {}", record.tag, record.message)
            .map_err(|err| Error::new("failed to format record").with_source(err))?;
        if let Some(error) = record.error {
            let rendered = render_error(error).replace("\n    caused by: ", " | ");
            text.push_str(" | ");
            text.push_str(&rendered);
        }

        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::LogType;

    #[test]
    fn test_text_layout() {
        let layout = TextLayout::default().timezone(TimeZone::UTC);
        let record = FileRecord {
            timestamp: 1_723_387_497_172,
            log_type: LogType::Info,
            tag: "Repo",
            message: "fetched 12 rows",
            error: None,
        };

        let line = String::from_utf8(layout.format(&record).unwrap()).unwrap();
        assert_eq!(line, "2024-08-11T14:44:57.172+00:00    INFO Repo: fetched 12 rows");
    }

    #[test]
    fn test_text_layout_with_error() {
        let layout = TextLayout::default().timezone(TimeZone::UTC);
        let err = io::Error::other("connection reset");
        let record = FileRecord {
            timestamp: 0,
            log_type: LogType::Error,
            tag: "Repo",
            message: "fetch failed",
            error: Some(&err),
        };

        let line = String::from_utf8(layout.format(&record).unwrap()).unwrap();
        assert_eq!(
            line,
            "1970-01-01T00:00:00.000+00:00   ERROR Repo: fetch failed | connection reset"
        );
    }
}
