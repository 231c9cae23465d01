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

//! An example of persisting log lines to a single file.

use std::error::Error;

use flexilog::Event;
use flexilog::FlexiLog;
use flexilog::LogType;
use flexilog::file::FileSink;

struct FileLog {
    file: FileSink,
}

impl FlexiLog for FileLog {
    fn can_log_to_console(&self, log_type: LogType) -> bool {
        log_type != LogType::Verbose
    }

    fn should_report(&self, _: LogType) -> bool {
        false
    }

    fn should_report_exception(&self, _: &(dyn Error + 'static)) -> bool {
        false
    }

    fn report(&self, _: LogType, _: &str, _: &str) {}

    fn report_exception(&self, _: LogType, _: &str, _: &str, _: &(dyn Error + 'static)) {}

    fn should_log_to_file(&self, _: LogType) -> bool {
        true
    }

    fn write_log_to_file(
        &self,
        timestamp: i64,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn Error + 'static)>,
    ) {
        if let Err(err) = self.file.write(timestamp, log_type, tag, message, error) {
            eprintln!("failed to write log: {err}");
        }
    }
}

fn main() {
    let (file, _guard) = FileSink::builder("logs/my_app.log").build().unwrap();
    let log = FileLog { file };

    log.e(Event::new("Main").with_message("Hello single error!"));
    log.w(Event::new("Main").with_message("Hello single warn!"));
    log.i(Event::new("Main").with_message("Hello single info!"));
    log.d(Event::new("Main").with_message("Hello single debug!"));
    log.v(Event::new("Main").with_message("Hello single verbose!"));
}
