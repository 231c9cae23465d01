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

//! The leveled dispatch pipeline.

use std::any::type_name;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::CallSite;
use crate::LogType;
use crate::LoggerWithLevel;
use crate::LoggingLevel;
use crate::SkipRules;
use crate::platform::Platform;
use crate::platform::default_platform;
use crate::platform::simple_name_of_val;

/// Messages longer than this many characters are printed to the console in pieces.
pub const MAX_CHUNK_CHARS: usize = 4000;

/// The arguments of a single log call.
///
/// # Examples
///
/// ```
/// use std::io;
///
/// use flexilog::Event;
///
/// let err = io::Error::other("connection reset");
/// let event = Event::new("Repo")
///     .with_message("fetch failed")
///     .with_error(&err)
///     .with_force_report(true);
/// assert_eq!(event.tag(), "Repo");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Event<'a> {
    tag: &'a str,
    message: &'a str,
    error: Option<&'a (dyn StdError + 'static)>,
    force_report: bool,
}

impl<'a> Event<'a> {
    /// Create an event with the given tag and an empty message.
    pub fn new(tag: &'a str) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    /// Create an event tagged with the simple type name of `caller`.
    ///
    /// ```
    /// use flexilog::Event;
    ///
    /// struct Repo;
    ///
    /// assert_eq!(Event::of(&Repo).tag(), "Repo");
    /// ```
    pub fn of<T: ?Sized>(caller: &T) -> Self {
        Self::new(simple_name_of_val(caller))
    }

    /// Set the message.
    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = message;
        self
    }

    /// Attach an error.
    pub fn with_error(mut self, error: &'a (dyn StdError + 'static)) -> Self {
        self.error = Some(error);
        self
    }

    /// Report the event even if [`FlexiLog::should_report`] declines it.
    pub fn with_force_report(mut self, force_report: bool) -> Self {
        self.force_report = force_report;
        self
    }

    pub fn tag(&self) -> &'a str {
        self.tag
    }

    pub fn message(&self) -> &'a str {
        self.message
    }

    pub fn error(&self) -> Option<&'a (dyn StdError + 'static)> {
        self.error
    }

    pub fn force_report(&self) -> bool {
        self.force_report
    }
}

/// A logger fanning each call out to the console, a crash reporter and optionally a file.
///
/// Implementors decide, per [`LogType`], which of the three sinks fire:
///
/// 1. Messages longer than [`MAX_CHUNK_CHARS`] are split; each piece goes to
///    [`FlexiLog::log_to_console`] and only the last one carries the error.
/// 2. If the event is force-reported or [`FlexiLog::should_report`] agrees, the full message is
///    reported once. Events with an error are reported only if
///    [`FlexiLog::should_report_exception`] accepts the error.
/// 3. If [`FlexiLog::should_log_to_file`] agrees, [`FlexiLog::write_log_to_file`] receives the
///    full message with the current timestamp.
///
/// Hooks are called on the caller's thread. A panicking hook is not caught.
///
/// # Examples
///
/// ```
/// use std::error::Error;
///
/// use flexilog::Event;
/// use flexilog::FlexiLog;
/// use flexilog::LogType;
///
/// struct AppLog;
///
/// impl FlexiLog for AppLog {
///     fn can_log_to_console(&self, _: LogType) -> bool {
///         cfg!(debug_assertions)
///     }
///
///     fn should_report(&self, log_type: LogType) -> bool {
///         matches!(log_type, LogType::Error | LogType::Assert)
///     }
///
///     fn should_report_exception(&self, error: &(dyn Error + 'static)) -> bool {
///         !error.is::<std::io::Error>()
///     }
///
///     fn report(&self, log_type: LogType, tag: &str, message: &str) {
///         // forward to a crash reporter
///     }
///
///     fn report_exception(
///         &self,
///         log_type: LogType,
///         tag: &str,
///         message: &str,
///         error: &(dyn Error + 'static),
///     ) {
///         // forward to a crash reporter
///     }
/// }
///
/// AppLog.i(Event::new("Main").with_message("started"));
/// ```
pub trait FlexiLog: Send + Sync + 'static {
    /// Whether events of this type are printed to the console.
    fn can_log_to_console(&self, log_type: LogType) -> bool;

    /// Whether events of this type are sent to the crash reporter.
    fn should_report(&self, log_type: LogType) -> bool;

    /// Whether an event carrying `error` is sent to the crash reporter.
    ///
    /// Use this to keep expected failures, like cancellations or unreachable networks, out of
    /// crash reports while still printing them.
    fn should_report_exception(&self, error: &(dyn StdError + 'static)) -> bool;

    /// Send an event without an error to the crash reporter.
    fn report(&self, log_type: LogType, tag: &str, message: &str);

    /// Send an event with an error to the crash reporter.
    fn report_exception(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: &(dyn StdError + 'static),
    );

    /// Send an event without an error, together with the location of the log call.
    ///
    /// Only called with a call site when [`FlexiLog::capture_call_sites`] is on. Default to
    /// [`FlexiLog::report`].
    fn report_with_call_site(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        call_site: Option<&CallSite>,
    ) {
        let _ = call_site;
        self.report(log_type, tag, message);
    }

    /// Send an event with an error, together with the location of the log call.
    ///
    /// Default to [`FlexiLog::report_exception`].
    fn report_exception_with_call_site(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: &(dyn StdError + 'static),
        call_site: Option<&CallSite>,
    ) {
        let _ = call_site;
        self.report_exception(log_type, tag, message, error);
    }

    /// Whether to walk the stack for the caller's location before reporting.
    ///
    /// Default to `false`.
    fn capture_call_sites(&self) -> bool {
        false
    }

    /// Whether events of this type are written to a file.
    ///
    /// Default to `false`.
    fn should_log_to_file(&self, log_type: LogType) -> bool {
        let _ = log_type;
        false
    }

    /// Persist an event. `timestamp` is in milliseconds since the Unix epoch.
    ///
    /// Default to a no-op.
    fn write_log_to_file(
        &self,
        timestamp: i64,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        let _ = (timestamp, log_type, tag, message, error);
    }

    /// Extra path prefixes whose frames are never taken as the call site.
    fn additional_skip_packages(&self) -> Vec<String> {
        Vec::new()
    }

    /// The rules used to find the call site.
    ///
    /// Default to the internal rules plus [`FlexiLog::additional_skip_packages`]. The
    /// implementing type itself is always registered on top of these.
    fn skip_rules(&self) -> SkipRules {
        SkipRules::new().skip_prefixes(self.additional_skip_packages())
    }

    /// The platform used to print and tell the time.
    ///
    /// Default to a process-wide [`StdioPlatform`](crate::platform::StdioPlatform).
    fn platform(&self) -> &dyn Platform {
        default_platform()
    }

    /// Print one console line if [`FlexiLog::can_log_to_console`] allows it.
    fn log_to_console(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        if self.can_log_to_console(log_type) {
            self.platform().print(log_type, tag, message, error);
        }
    }

    /// Run an event of the given type through the console, report and file sinks.
    fn log(&self, log_type: LogType, event: Event<'_>) {
        let Event {
            tag,
            message,
            error,
            force_report,
        } = event;

        let pieces = chunks(message, MAX_CHUNK_CHARS);
        match pieces.split_last() {
            Some((last, init)) if !init.is_empty() => {
                for piece in init {
                    self.log_to_console(log_type, tag, piece, None);
                }
                self.log_to_console(log_type, tag, last, error);
            }
            _ => self.log_to_console(log_type, tag, message, error),
        }

        if force_report || self.should_report(log_type) {
            report_event(self, log_type, tag, message, error);
        }

        if self.should_log_to_file(log_type) {
            let timestamp = self.platform().now();
            self.write_log_to_file(timestamp, log_type, tag, message, error);
        }
    }

    /// Log at [`LogType::Verbose`].
    fn v(&self, event: Event<'_>) {
        self.log(LogType::Verbose, event);
    }

    /// Log at [`LogType::Debug`].
    fn d(&self, event: Event<'_>) {
        self.log(LogType::Debug, event);
    }

    /// Log at [`LogType::Info`].
    fn i(&self, event: Event<'_>) {
        self.log(LogType::Info, event);
    }

    /// Log at [`LogType::Warn`].
    fn w(&self, event: Event<'_>) {
        self.log(LogType::Warn, event);
    }

    /// Log at [`LogType::Error`].
    fn e(&self, event: Event<'_>) {
        self.log(LogType::Error, event);
    }

    /// Log at [`LogType::Assert`].
    fn wtf(&self, event: Event<'_>) {
        self.log(LogType::Assert, event);
    }

    /// Run `f` with this logger only if `condition` holds.
    fn on_condition<F>(&self, condition: bool, f: F)
    where
        F: FnOnce(&Self),
        Self: Sized,
    {
        if condition {
            f(self);
        }
    }

    /// Wrap this logger with a level threshold.
    fn with_level(self, level: LoggingLevel) -> LoggerWithLevel
    where
        Self: Sized,
    {
        LoggerWithLevel::new(level, Arc::new(self))
    }
}

fn report_event<L: FlexiLog + ?Sized>(
    logger: &L,
    log_type: LogType,
    tag: &str,
    message: &str,
    error: Option<&(dyn StdError + 'static)>,
) {
    if let Some(error) = error {
        if !logger.should_report_exception(error) {
            return;
        }
    }

    let call_site = if logger.capture_call_sites() {
        let rules = logger.skip_rules().logger_type(type_name::<L>());
        logger.platform().capture_call_site(&rules)
    } else {
        None
    };

    match error {
        None => logger.report_with_call_site(log_type, tag, message, call_site.as_ref()),
        Some(error) => logger.report_exception_with_call_site(
            log_type,
            tag,
            message,
            error,
            call_site.as_ref(),
        ),
    }
}

/// Split `message` into consecutive pieces of at most `max_chars` characters.
///
/// An empty message yields no pieces.
pub fn chunks(message: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut rest = message;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(idx, _)| idx);
        let (piece, tail) = rest.split_at(end);
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_of_long_message() {
        let message = "x".repeat(8500);
        let pieces = chunks(&message, MAX_CHUNK_CHARS);

        assert_eq!(
            pieces.iter().map(|p| p.len()).collect::<Vec<_>>(),
            vec![4000, 4000, 500]
        );
        assert_eq!(pieces.concat(), message);
    }

    #[test]
    fn test_chunks_respect_char_boundaries() {
        let message = "é".repeat(5);
        let pieces = chunks(&message, 2);

        assert_eq!(pieces, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_chunks_of_short_and_empty_messages() {
        assert_eq!(chunks("hello", MAX_CHUNK_CHARS), vec!["hello"]);
        assert!(chunks("", MAX_CHUNK_CHARS).is_empty());

        let exact = "y".repeat(MAX_CHUNK_CHARS);
        assert_eq!(chunks(&exact, MAX_CHUNK_CHARS).len(), 1);
    }

    #[test]
    fn test_event_builder() {
        struct Repo;

        let event = Event::of(&Repo).with_message("hello").with_force_report(true);
        assert_eq!(event.tag(), "Repo");
        assert_eq!(event.message(), "hello");
        assert!(event.error().is_none());
        assert!(event.force_report());
    }
}
