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

//! An example of console logging behind a runtime-adjustable level.

use std::error::Error;
use std::io;

use flexilog::Event;
use flexilog::FlexiLog;
use flexilog::LogType;
use flexilog::LoggingLevel;
use flexilog::platform::Platform;
use flexilog::platform::StdioPlatform;
use flexilog::platform::Stream;

#[derive(Debug)]
struct ConsoleLog {
    platform: StdioPlatform,
}

impl FlexiLog for ConsoleLog {
    fn can_log_to_console(&self, _: LogType) -> bool {
        true
    }

    fn should_report(&self, log_type: LogType) -> bool {
        matches!(log_type, LogType::Error | LogType::Assert)
    }

    fn should_report_exception(&self, error: &(dyn Error + 'static)) -> bool {
        !error.is::<io::Error>()
    }

    fn report(&self, log_type: LogType, tag: &str, message: &str) {
        eprintln!("[report] {log_type} {tag}: {message}");
    }

    fn report_exception(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: &(dyn Error + 'static),
    ) {
        eprintln!("[report] {log_type} {tag}: {message} ({error})");
    }

    fn platform(&self) -> &dyn Platform {
        &self.platform
    }
}

struct Repo;

fn main() {
    let level = LoggingLevel::from_env("FLEXILOG_LEVEL")
        .unwrap()
        .unwrap_or(LoggingLevel::Debug);
    let log = ConsoleLog {
        platform: StdioPlatform::default().stream(Stream::Stdout),
    }
    .with_level(level);

    let err = io::Error::other("connection reset");
    log.e(Event::of(&Repo).with_message("fetch failed").with_error(&err));
    log.w(Event::of(&Repo).with_message("retrying"));
    log.i(Event::of(&Repo).with_message("fetched 12 rows"));
    log.d(Event::of(&Repo).with_message("cache warm"));
    log.v(Event::of(&Repo).with_message("not shown at the default level"));

    log.set_level(LoggingLevel::Error);
    log.i(Event::of(&Repo).with_message("dropped"));
    log.wtf(Event::new("Main").with_message("dropped as well"));
}
