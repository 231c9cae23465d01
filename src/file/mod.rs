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

//! A ready-made file sink for [`FlexiLog::write_log_to_file`](crate::FlexiLog::write_log_to_file).

use std::error::Error as StdError;
use std::path::PathBuf;
use std::time::Duration;

use crate::Error;
use crate::LogType;
use crate::layout::FileRecord;
use crate::layout::Layout;
use crate::layout::TextLayout;
use crate::non_blocking::NonBlocking;
use crate::non_blocking::NonBlockingBuilder;
use crate::non_blocking::WorkerGuard;

mod writer;

use self::writer::FileWriter;

/// A builder to configure and create a [`FileSink`].
#[derive(Debug)]
pub struct FileSinkBuilder {
    path: PathBuf,
    layout: Box<dyn Layout>,

    // non-blocking options
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Option<Duration>,
}

impl FileSinkBuilder {
    /// Create a new builder writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            layout: Box::new(TextLayout::default()),

            thread_name: "flexilog-file".to_string(),
            buffered_lines_limit: None,
            shutdown_timeout: None,
        }
    }

    /// Set the layout for the lines.
    ///
    /// Default to [`TextLayout`].
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the buffer size of pending lines.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Set how long dropping the guard waits for pending lines.
    pub fn shutdown_timeout(mut self, shutdown_timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// Set the name of the background writer thread.
    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Open the file and start the writer thread.
    ///
    /// Keep the returned [`WorkerGuard`] alive for as long as the sink is used.
    ///
    /// # Errors
    ///
    /// Return an error if the log file cannot be opened or the thread cannot be spawned.
    pub fn build(self) -> Result<(FileSink, WorkerGuard), Error> {
        let FileSinkBuilder {
            path,
            layout,
            thread_name,
            buffered_lines_limit,
            shutdown_timeout,
        } = self;
        let writer = FileWriter::open(path)?;
        let (writer, guard) = NonBlockingBuilder::new(thread_name, writer)
            .buffered_lines_limit(buffered_lines_limit)
            .shutdown_timeout(shutdown_timeout)
            .build()?;
        Ok((FileSink { layout, writer }, guard))
    }
}

/// A sink appending formatted records to a file from a background thread.
///
/// # Examples
///
/// ```no_run
/// use std::error::Error;
///
/// use flexilog::FlexiLog;
/// use flexilog::LogType;
/// use flexilog::file::FileSink;
///
/// struct AppLog {
///     file: FileSink,
/// }
///
/// impl FlexiLog for AppLog {
///     fn can_log_to_console(&self, _: LogType) -> bool {
///         true
///     }
///     fn should_report(&self, _: LogType) -> bool {
///         false
///     }
///     fn should_report_exception(&self, _: &(dyn Error + 'static)) -> bool {
///         false
///     }
///     fn report(&self, _: LogType, _: &str, _: &str) {}
///     fn report_exception(&self, _: LogType, _: &str, _: &str, _: &(dyn Error + 'static)) {}
///
///     fn should_log_to_file(&self, log_type: LogType) -> bool {
///         log_type != LogType::Verbose
///     }
///
///     fn write_log_to_file(
///         &self,
///         timestamp: i64,
///         log_type: LogType,
///         tag: &str,
///         message: &str,
///         error: Option<&(dyn Error + 'static)>,
///     ) {
///         if let Err(err) = self.file.write(timestamp, log_type, tag, message, error) {
///             eprintln!("{err}");
///         }
///     }
/// }
///
/// let (file, _guard) = FileSink::builder("logs/app.log").build().unwrap();
/// let _log = AppLog { file };
/// ```
#[derive(Debug)]
pub struct FileSink {
    layout: Box<dyn Layout>,
    writer: NonBlocking,
}

impl FileSink {
    /// Create a [`FileSinkBuilder`] writing to `path`.
    pub fn builder(path: impl Into<PathBuf>) -> FileSinkBuilder {
        FileSinkBuilder::new(path)
    }

    /// Format one record and queue it for writing.
    pub fn write(
        &self,
        timestamp: i64,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) -> Result<(), Error> {
        let record = FileRecord {
            timestamp,
            log_type,
            tag,
            message,
            error,
        };
        let mut bytes = self.layout.format(&record)?;
        bytes.push(b'\n');
        self.writer.send(bytes)
    }

    /// Block until every queued record is on disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.writer.flush()
    }
}
