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

use std::sync::Arc;

use crate::Error;
use crate::Event;
use crate::LogType;
use crate::LoggerWithLevel;

/// A [`log::Log`] implementation routing `log` records through a [`LoggerWithLevel`].
///
/// The record target becomes the tag; `Trace` maps to [`LogType::Verbose`].
#[derive(Debug)]
pub struct LogBridge {
    logger: Arc<LoggerWithLevel>,
}

impl LogBridge {
    /// Create a bridge over `logger`.
    pub fn new(logger: Arc<LoggerWithLevel>) -> Self {
        Self { logger }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.logger.can_log(LogType::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let log_type = LogType::from(record.level());
        if !self.logger.can_log(log_type) {
            return;
        }

        let message = match record.args().as_str() {
            Some(message) => message.to_string(),
            None => record.args().to_string(),
        };
        let event = Event::new(record.target()).with_message(&message);
        self.logger.log(log_type, event);
    }

    fn flush(&self) {}
}

/// Install a [`LogBridge`] over `logger` as the global `log` logger.
///
/// The global maximum level is set to `Trace` so later level changes on `logger` take effect;
/// filtering happens in the bridge.
///
/// # Errors
///
/// Return an error if a global logger has already been set.
pub fn try_setup(logger: Arc<LoggerWithLevel>) -> Result<(), Error> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))
        .map_err(|err| Error::new("log global logger has been already setup").with_source(err))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Install a [`LogBridge`] over `logger` as the global `log` logger.
///
/// # Panics
///
/// Panic if the global logger has already been set.
pub fn setup(logger: Arc<LoggerWithLevel>) {
    try_setup(logger)
        .expect("flexilog::bridge::setup must be called before the global logger initialized");
}
