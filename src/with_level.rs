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

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::Event;
use crate::FlexiLog;
use crate::LogType;
use crate::LoggingLevel;

struct State {
    level: LoggingLevel,
    logger: Arc<dyn FlexiLog>,
}

/// A [`FlexiLog`] behind a level threshold.
///
/// Calls below the threshold are dropped before they reach the logger: no console line, no
/// report and no file write. Both the logger and the level can be replaced at runtime; they are
/// swapped as a pair, so a concurrent log call sees either the old pair or the new one.
///
/// # Examples
///
/// ```
/// use std::error::Error;
/// use std::sync::Arc;
///
/// use flexilog::Event;
/// use flexilog::FlexiLog;
/// use flexilog::LogType;
/// use flexilog::LoggerWithLevel;
/// use flexilog::LoggingLevel;
///
/// struct ConsoleOnly;
///
/// impl FlexiLog for ConsoleOnly {
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
/// }
///
/// let log = LoggerWithLevel::new(LoggingLevel::Error, Arc::new(ConsoleOnly));
/// log.d(Event::new("Main").with_message("dropped"));
///
/// log.set_level(LoggingLevel::Debug);
/// log.d(Event::new("Main").with_message("printed"));
/// ```
pub struct LoggerWithLevel {
    state: ArcSwap<State>,
}

impl fmt::Debug for LoggerWithLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerWithLevel")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl LoggerWithLevel {
    /// Wrap `logger` with the given threshold.
    pub fn new(level: LoggingLevel, logger: Arc<dyn FlexiLog>) -> Self {
        Self {
            state: ArcSwap::from_pointee(State { level, logger }),
        }
    }

    /// Replace the logger, the level, or both. `None` keeps the current value.
    pub fn update_logger(
        &self,
        new_logger: Option<Arc<dyn FlexiLog>>,
        new_level: Option<LoggingLevel>,
    ) {
        self.state.rcu(|current| State {
            level: new_level.unwrap_or(current.level),
            logger: new_logger
                .clone()
                .unwrap_or_else(|| current.logger.clone()),
        });
    }

    /// Replace the level, keeping the logger.
    pub fn set_level(&self, level: LoggingLevel) {
        self.update_logger(None, Some(level));
    }

    /// Replace the logger, keeping the level.
    pub fn set_logger(&self, logger: Arc<dyn FlexiLog>) {
        self.update_logger(Some(logger), None);
    }

    /// The current threshold.
    pub fn level(&self) -> LoggingLevel {
        self.state.load().level
    }

    /// The current logger.
    pub fn logger(&self) -> Arc<dyn FlexiLog> {
        self.state.load().logger.clone()
    }

    /// Whether a call of the given type passes the current threshold.
    pub fn can_log(&self, log_type: LogType) -> bool {
        self.state.load().level.can_log(log_type)
    }

    /// Forward the event to the logger if the threshold admits `log_type`.
    pub fn log(&self, log_type: LogType, event: Event<'_>) {
        let state = self.state.load();
        if state.level.can_log(log_type) {
            state.logger.log(log_type, event);
        }
    }

    /// Log at [`LogType::Verbose`].
    pub fn v(&self, event: Event<'_>) {
        self.log(LogType::Verbose, event);
    }

    /// Log at [`LogType::Debug`].
    pub fn d(&self, event: Event<'_>) {
        self.log(LogType::Debug, event);
    }

    /// Log at [`LogType::Info`].
    pub fn i(&self, event: Event<'_>) {
        self.log(LogType::Info, event);
    }

    /// Log at [`LogType::Warn`].
    pub fn w(&self, event: Event<'_>) {
        self.log(LogType::Warn, event);
    }

    /// Log at [`LogType::Error`].
    pub fn e(&self, event: Event<'_>) {
        self.log(LogType::Error, event);
    }

    /// Log at [`LogType::Assert`].
    pub fn wtf(&self, event: Event<'_>) {
        self.log(LogType::Assert, event);
    }
}
