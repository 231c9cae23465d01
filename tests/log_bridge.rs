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

use std::error::Error as StdError;
use std::sync::Arc;
use std::sync::Mutex;

use flexilog::FlexiLog;
use flexilog::LogType;
use flexilog::LoggerWithLevel;
use flexilog::LoggingLevel;

#[derive(Default)]
struct Reports {
    seen: Arc<Mutex<Vec<(LogType, String, String)>>>,
}

impl FlexiLog for Reports {
    fn can_log_to_console(&self, _: LogType) -> bool {
        false
    }

    fn should_report(&self, _: LogType) -> bool {
        true
    }

    fn should_report_exception(&self, _: &(dyn StdError + 'static)) -> bool {
        true
    }

    fn report(&self, log_type: LogType, tag: &str, message: &str) {
        self.seen
            .lock()
            .unwrap()
            .push((log_type, tag.to_string(), message.to_string()));
    }

    fn report_exception(&self, _: LogType, _: &str, _: &str, _: &(dyn StdError + 'static)) {}
}

// the global logger can only be installed once per process
#[test]
fn test_log_records_are_routed_through_the_level() {
    let reports = Reports::default();
    let seen = reports.seen.clone();
    let logger = Arc::new(LoggerWithLevel::new(LoggingLevel::Info, Arc::new(reports)));

    flexilog::bridge::setup(logger.clone());
    assert!(flexilog::bridge::try_setup(logger.clone()).is_err());

    log::info!(target: "Repo", "fetched {} rows", 12);
    log::debug!(target: "Repo", "hidden");

    logger.set_level(LoggingLevel::Verbose);
    log::trace!(target: "Repo", "now visible");

    let seen = std::mem::take(&mut *seen.lock().unwrap());
    assert_eq!(
        seen,
        vec![
            (LogType::Info, "Repo".to_string(), "fetched 12 rows".to_string()),
            (LogType::Verbose, "Repo".to_string(), "now visible".to_string()),
        ]
    );
}
