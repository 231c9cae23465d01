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

#![cfg(feature = "append-file")]

use std::error::Error as StdError;
use std::fs;
use std::io;
use std::time::Duration;

use flexilog::Event;
use flexilog::FlexiLog;
use flexilog::LogType;
use flexilog::file::FileSink;
use flexilog::layout::TextLayout;
use jiff::tz::TimeZone;
use tempfile::TempDir;

struct FileOnly {
    file: FileSink,
}

impl FlexiLog for FileOnly {
    fn can_log_to_console(&self, _: LogType) -> bool {
        false
    }

    fn should_report(&self, _: LogType) -> bool {
        false
    }

    fn should_report_exception(&self, _: &(dyn StdError + 'static)) -> bool {
        false
    }

    fn report(&self, _: LogType, _: &str, _: &str) {}

    fn report_exception(&self, _: LogType, _: &str, _: &str, _: &(dyn StdError + 'static)) {}

    fn should_log_to_file(&self, log_type: LogType) -> bool {
        log_type != LogType::Verbose
    }

    fn write_log_to_file(
        &self,
        timestamp: i64,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        self.file
            .write(timestamp, log_type, tag, message, error)
            .unwrap();
    }
}

#[test]
fn test_dispatcher_writes_file_lines() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("logs").join("app.log");

    let (file, guard) = FileSink::builder(&path)
        .layout(TextLayout::default().timezone(TimeZone::UTC))
        .thread_name("file-sink-test")
        .build()
        .unwrap();
    let log = FileOnly { file };

    let message = "z".repeat(5000);
    let err = io::Error::other("connection reset");
    log.v(Event::new("Repo").with_message("not persisted"));
    log.i(Event::new("Repo").with_message("fetched 12 rows"));
    log.e(Event::new("Repo").with_message(&message).with_error(&err));
    log.file.flush().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2, "{content}");
    assert!(lines[0].ends_with("+00:00    INFO Repo: fetched 12 rows"), "{}", lines[0]);
    assert!(
        lines[1].ends_with(&format!("   ERROR Repo: {message} | connection reset")),
        "{}",
        lines[1]
    );

    drop(log);
    drop(guard);
}

#[test]
fn test_guard_drains_pending_lines() {
    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("drain.log");

    let (file, guard) = FileSink::builder(&path)
        .shutdown_timeout(Some(Duration::from_secs(5)))
        .build()
        .unwrap();
    for i in 0..100 {
        file.write(0, LogType::Info, "T", &format!("line {i}"), None)
            .unwrap();
    }
    drop(guard);

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 100);
    assert!(content.lines().last().unwrap().ends_with("T: line 99"));
}

#[cfg(feature = "layout-json")]
#[test]
fn test_json_lines() {
    use flexilog::layout::JsonLayout;

    let dir = TempDir::new().expect("failed to create a temporary directory");
    let path = dir.path().join("app.jsonl");

    let (file, _guard) = FileSink::builder(&path)
        .layout(JsonLayout::default().timezone(TimeZone::UTC))
        .build()
        .unwrap();
    file.write(1_723_387_497_172, LogType::Warn, "Net", "slow", None)
        .unwrap();
    file.flush().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let line: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(line["level"], "WARN");
    assert_eq!(line["tag"], "Net");
    assert_eq!(line["message"], "slow");
    assert!(line.get("error").is_none());
}
