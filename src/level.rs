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

//! Log severities and level thresholds.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The severity of a single log call.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LogType {
    /// Very low priority, often extremely verbose, information.
    Verbose,
    /// Lower priority information.
    Debug,
    /// Useful information.
    Info,
    /// Hazardous situations.
    Warn,
    /// Very serious errors.
    Error,
    /// Conditions that should never happen ("what a terrible failure").
    Assert,
}

impl LogType {
    /// All log types, from the most verbose to the most severe.
    pub const ALL: [LogType; 6] = [
        LogType::Verbose,
        LogType::Debug,
        LogType::Info,
        LogType::Warn,
        LogType::Error,
        LogType::Assert,
    ];

    /// Return the string representation of the `LogType`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Verbose => "VERBOSE",
            LogType::Debug => "DEBUG",
            LogType::Info => "INFO",
            LogType::Warn => "WARN",
            LogType::Error => "ERROR",
            LogType::Assert => "ASSERT",
        }
    }

    /// The minimum [`LoggingLevel`] rank that admits this type.
    pub fn threshold(&self) -> u8 {
        match self {
            LogType::Verbose => LoggingLevel::Verbose.rank(),
            LogType::Debug => LoggingLevel::Debug.rank(),
            LogType::Info => LoggingLevel::Info.rank(),
            LogType::Warn | LogType::Assert => LoggingLevel::Warn.rank(),
            LogType::Error => LoggingLevel::Error.rank(),
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<log::Level> for LogType {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogType::Error,
            log::Level::Warn => LogType::Warn,
            log::Level::Info => LogType::Info,
            log::Level::Debug => LogType::Debug,
            log::Level::Trace => LogType::Verbose,
        }
    }
}

impl From<LogType> for log::Level {
    fn from(ty: LogType) -> Self {
        match ty {
            LogType::Verbose => log::Level::Trace,
            LogType::Debug => log::Level::Debug,
            LogType::Info => log::Level::Info,
            LogType::Warn => log::Level::Warn,
            LogType::Error | LogType::Assert => log::Level::Error,
        }
    }
}

/// A threshold deciding which [`LogType`]s get through.
///
/// Every level carries a rank; higher ranks are more permissive:
///
/// | level   | rank |
/// |---------|------|
/// | Verbose | 5    |
/// | Debug   | 4    |
/// | Info    | 3    |
/// | Warn    | 2    |
/// | Error   | 1    |
/// | None    | 0    |
///
/// A level admits a type if its rank is at least the type's threshold. `Assert` shares the `Warn`
/// threshold, so it is dropped only at `Error` and `None`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum LoggingLevel {
    /// Admit everything.
    #[default]
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    /// Admit nothing.
    None,
}

impl LoggingLevel {
    /// All levels, from the most permissive to the least.
    pub const ALL: [LoggingLevel; 6] = [
        LoggingLevel::Verbose,
        LoggingLevel::Debug,
        LoggingLevel::Info,
        LoggingLevel::Warn,
        LoggingLevel::Error,
        LoggingLevel::None,
    ];

    /// The numeric rank of this level.
    pub fn rank(&self) -> u8 {
        match self {
            LoggingLevel::Verbose => 5,
            LoggingLevel::Debug => 4,
            LoggingLevel::Info => 3,
            LoggingLevel::Warn => 2,
            LoggingLevel::Error => 1,
            LoggingLevel::None => 0,
        }
    }

    /// Whether a log call of the given type passes this level.
    ///
    /// # Examples
    ///
    /// ```
    /// use flexilog::LogType;
    /// use flexilog::LoggingLevel;
    ///
    /// assert!(LoggingLevel::Warn.can_log(LogType::Error));
    /// assert!(LoggingLevel::Warn.can_log(LogType::Assert));
    /// assert!(!LoggingLevel::Warn.can_log(LogType::Info));
    /// ```
    pub fn can_log(&self, ty: LogType) -> bool {
        self.rank() >= ty.threshold()
    }

    /// Return the string representation of the `LoggingLevel`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggingLevel::Verbose => "VERBOSE",
            LoggingLevel::Debug => "DEBUG",
            LoggingLevel::Info => "INFO",
            LoggingLevel::Warn => "WARN",
            LoggingLevel::Error => "ERROR",
            LoggingLevel::None => "NONE",
        }
    }

    /// Read a level from the environment variable `var`.
    ///
    /// Returns `Ok(None)` if the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but is not valid unicode or not a level name.
    ///
    /// # Examples
    ///
    /// ```
    /// use flexilog::LoggingLevel;
    ///
    /// let level = LoggingLevel::from_env("FLEXILOG_LEVEL")
    ///     .unwrap_or_default()
    ///     .unwrap_or(LoggingLevel::Info);
    /// ```
    pub fn from_env(var: &str) -> Result<Option<LoggingLevel>, Error> {
        match env::var(var) {
            Ok(value) => value
                .parse::<LoggingLevel>()
                .map(Some)
                .map_err(|err: Error| err.with_context("var", var)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(err) => Err(Error::new("failed to read logging level")
                .with_context("var", var)
                .with_source(err)),
        }
    }
}

impl fmt::Display for LoggingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LoggingLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<LoggingLevel, Self::Err> {
        let s = s.trim();
        for (names, level) in [
            (&["verbose", "v", "trace"][..], LoggingLevel::Verbose),
            (&["debug", "d"][..], LoggingLevel::Debug),
            (&["info", "i"][..], LoggingLevel::Info),
            (&["warn", "w", "warning"][..], LoggingLevel::Warn),
            (&["error", "e"][..], LoggingLevel::Error),
            (&["none", "off"][..], LoggingLevel::None),
        ] {
            if names.iter().any(|name| s.eq_ignore_ascii_case(name)) {
                return Ok(level);
            }
        }

        Err(Error::new(format!("malformed logging level: {s:?}")))
    }
}

impl From<LoggingLevel> for log::LevelFilter {
    fn from(level: LoggingLevel) -> Self {
        match level {
            LoggingLevel::Verbose => log::LevelFilter::Trace,
            LoggingLevel::Debug => log::LevelFilter::Debug,
            LoggingLevel::Info => log::LevelFilter::Info,
            LoggingLevel::Warn => log::LevelFilter::Warn,
            LoggingLevel::Error => log::LevelFilter::Error,
            LoggingLevel::None => log::LevelFilter::Off,
        }
    }
}

impl From<log::LevelFilter> for LoggingLevel {
    fn from(filter: log::LevelFilter) -> Self {
        match filter {
            log::LevelFilter::Off => LoggingLevel::None,
            log::LevelFilter::Error => LoggingLevel::Error,
            log::LevelFilter::Warn => LoggingLevel::Warn,
            log::LevelFilter::Info => LoggingLevel::Info,
            log::LevelFilter::Debug => LoggingLevel::Debug,
            log::LevelFilter::Trace => LoggingLevel::Verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_strictly_decrease() {
        let ranks = LoggingLevel::ALL.map(|l| l.rank());
        assert_eq!(ranks, [5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_can_log_matches_rank_table() {
        // columns: Verbose, Debug, Info, Warn, Error, Assert
        let table = [
            (LoggingLevel::Verbose, [true, true, true, true, true, true]),
            (LoggingLevel::Debug, [false, true, true, true, true, true]),
            (LoggingLevel::Info, [false, false, true, true, true, true]),
            (LoggingLevel::Warn, [false, false, false, true, true, true]),
            (LoggingLevel::Error, [false, false, false, false, true, false]),
            (LoggingLevel::None, [false, false, false, false, false, false]),
        ];
        for (level, expected) in table {
            for (ty, expected) in LogType::ALL.into_iter().zip(expected) {
                assert_eq!(level.can_log(ty), expected, "{level} / {ty}");
            }
        }
    }

    #[test]
    fn test_verbose_admits_all_and_none_admits_nothing() {
        for ty in LogType::ALL {
            assert!(LoggingLevel::Verbose.can_log(ty));
            assert!(!LoggingLevel::None.can_log(ty));
        }
    }

    #[test]
    fn test_debug_ranks_above_info() {
        assert!(LoggingLevel::Debug.can_log(LogType::Info));
        assert!(LoggingLevel::Debug.can_log(LogType::Debug));
        assert!(!LoggingLevel::Info.can_log(LogType::Debug));
        assert!(!LoggingLevel::Debug.can_log(LogType::Verbose));
    }

    #[test]
    fn test_assert_shares_warn_threshold() {
        assert!(LoggingLevel::Warn.can_log(LogType::Assert));
        assert!(!LoggingLevel::Error.can_log(LogType::Assert));
        assert!(LoggingLevel::Error.can_log(LogType::Error));
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("debug".parse::<LoggingLevel>().unwrap(), LoggingLevel::Debug);
        assert_eq!(" WARN ".parse::<LoggingLevel>().unwrap(), LoggingLevel::Warn);
        assert_eq!("v".parse::<LoggingLevel>().unwrap(), LoggingLevel::Verbose);
        assert_eq!("off".parse::<LoggingLevel>().unwrap(), LoggingLevel::None);

        let err = "loud".parse::<LoggingLevel>().unwrap_err();
        assert_eq!(err.to_string(), r#"malformed logging level: "loud""#);
    }

    #[test]
    fn test_log_crate_round_trip() {
        for level in LoggingLevel::ALL {
            let filter = log::LevelFilter::from(level);
            assert_eq!(LoggingLevel::from(filter), level);
        }
        assert_eq!(LogType::from(log::Level::Trace), LogType::Verbose);
        assert_eq!(log::Level::from(LogType::Assert), log::Level::Error);
    }
}
