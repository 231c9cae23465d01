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
use std::io;
use std::io::Write;

use colored::Color;
use colored::ColoredString;
use colored::Colorize;
use jiff::Zoned;
use jiff::tz::TimeZone;

use crate::CallSite;
use crate::LogType;
use crate::SkipRules;
use crate::call_site;
use crate::platform::Platform;
use crate::platform::render_error;

/// The standard stream a [`StdioPlatform`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stream {
    Stdout,
    #[default]
    Stderr,
}

/// Colors for the different log types.
#[derive(Debug, Clone)]
pub struct LevelColor {
    pub verbose: Color,
    pub debug: Color,
    pub info: Color,
    pub warn: Color,
    pub error: Color,
    pub assert: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            verbose: Color::Magenta,
            debug: Color::Blue,
            info: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            assert: Color::BrightRed,
        }
    }
}

impl LevelColor {
    fn colorize(&self, no_color: bool, log_type: LogType) -> ColoredString {
        let text = ColoredString::from(format!("{:>7}", log_type.as_str()));
        if no_color {
            return text;
        }
        let color = match log_type {
            LogType::Verbose => self.verbose,
            LogType::Debug => self.debug,
            LogType::Info => self.info,
            LogType::Warn => self.warn,
            LogType::Error => self.error,
            LogType::Assert => self.assert,
        };
        text.color(color)
    }
}

/// A platform printing to the process's standard streams.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172105+08:00   ERROR Repo: fetch failed
///     connection reset
/// 2024-08-11T22:44:57.172219+08:00    WARN Repo: retrying
/// 2024-08-11T22:44:57.172276+08:00    INFO Repo: fetched 12 rows
/// ```
///
/// Log types are coloured unless [`StdioPlatform::no_color`] is set. Call sites are found by
/// walking the stack; turn this off with [`StdioPlatform::without_call_site`].
///
/// # Examples
///
/// ```
/// use flexilog::platform::StdioPlatform;
/// use flexilog::platform::Stream;
///
/// let platform = StdioPlatform::default().stream(Stream::Stdout).no_color();
/// ```
#[derive(Debug, Clone, Default)]
pub struct StdioPlatform {
    stream: Stream,
    colors: LevelColor,
    no_color: bool,
    tz: Option<TimeZone>,
    no_call_site: bool,
}

impl StdioPlatform {
    /// Write to the given stream. Default to stderr.
    pub fn stream(mut self, stream: Stream) -> Self {
        self.stream = stream;
        self
    }

    /// Customize the colors of each log type.
    pub fn colors(mut self, colors: LevelColor) -> Self {
        self.colors = colors;
        self
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Render timestamps in the given timezone instead of the system one.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Never walk the stack; reports get no call site.
    pub fn without_call_site(mut self) -> Self {
        self.no_call_site = true;
        self
    }

    fn format(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) -> String {
        let time = match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        }
        .strftime("%Y-%m-%dT%H:%M:%S.%6f%:z");
        let level = self.colors.colorize(self.no_color, log_type);

        let mut line = format!("{time} {level} {tag}: {message}");
        if let Some(error) = error {
            line.push_str("\n    ");
            line.push_str(&render_error(error));
        }
        line.push('\n');
        line
    }
}

impl Platform for StdioPlatform {
    fn print(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        let line = self.format(log_type, tag, message, error);
        let _ = match self.stream {
            Stream::Stdout => io::stdout().lock().write_all(line.as_bytes()),
            Stream::Stderr => io::stderr().lock().write_all(line.as_bytes()),
        };
    }

    fn capture_call_site(&self, rules: &SkipRules) -> Option<CallSite> {
        if self.no_call_site {
            return None;
        }
        call_site::capture(rules)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_format_without_color() {
        let platform = StdioPlatform::default()
            .no_color()
            .timezone(TimeZone::UTC);
        let line = platform.format(LogType::Warn, "Repo", "retrying", None);

        assert!(line.ends_with("    WARN Repo: retrying\n"), "{line}");
        assert!(line.contains("+00:00"), "{line}");
    }

    #[test]
    fn test_format_appends_error() {
        let platform = StdioPlatform::default().no_color();
        let err = io::Error::other("connection reset");
        let line = platform.format(LogType::Error, "Repo", "fetch failed", Some(&err));

        assert!(
            line.ends_with("ERROR Repo: fetch failed\n    connection reset\n"),
            "{line}"
        );
    }

    #[test]
    fn test_call_site_can_be_disabled() {
        let platform = StdioPlatform::default().without_call_site();
        assert!(platform.capture_call_site(&SkipRules::new()).is_none());
    }
}
