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

//! Layouts turning a file record into bytes.

use std::error::Error as StdError;
use std::fmt;

use crate::Error;
use crate::LogType;

#[cfg(feature = "layout-json")]
mod json;
mod text;

#[cfg(feature = "layout-json")]
pub use self::json::JsonLayout;
pub use self::text::TextLayout;

/// One event as handed to [`FlexiLog::write_log_to_file`](crate::FlexiLog::write_log_to_file).
#[derive(Clone, Copy, Debug)]
pub struct FileRecord<'a> {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub log_type: LogType,
    pub tag: &'a str,
    pub message: &'a str,
    pub error: Option<&'a (dyn StdError + 'static)>,
}

/// A layout for formatting file records.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Format a record into one line, without the trailing newline.
    fn format(&self, record: &FileRecord<'_>) -> Result<Vec<u8>, Error>;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

fn zoned(timestamp: i64, tz: Option<&jiff::tz::TimeZone>) -> Result<jiff::Zoned, Error> {
    let ts = jiff::Timestamp::from_millisecond(timestamp).map_err(|err| {
        Error::new("invalid log timestamp")
            .with_context("timestamp", timestamp)
            .with_source(err)
    })?;
    Ok(match tz {
        Some(tz) => ts.to_zoned(tz.clone()),
        None => ts.to_zoned(jiff::tz::TimeZone::system()),
    })
}
