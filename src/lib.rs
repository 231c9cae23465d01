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

//! Flexilog is a leveled logging dispatcher that fans every log call out to the console, a crash
//! reporter and an optional file sink.
//!
//! # Overview
//!
//! Implement [`FlexiLog`] to decide, per [`LogType`], whether an event is printed, reported or
//! persisted. The provided methods do the rest: long messages are split into console-sized
//! chunks, errors can be filtered out of crash reports, and reports may carry the [`CallSite`]
//! that issued the log call. Wrap the logger in a [`LoggerWithLevel`] to drop events below a
//! runtime-adjustable [`LoggingLevel`].
//!
//! # Examples
//!
//! ```
//! use std::error::Error;
//! use std::io;
//!
//! use flexilog::Event;
//! use flexilog::FlexiLog;
//! use flexilog::LogType;
//! use flexilog::LoggingLevel;
//!
//! struct AppLog;
//!
//! impl FlexiLog for AppLog {
//!     fn can_log_to_console(&self, _: LogType) -> bool {
//!         true
//!     }
//!
//!     fn should_report(&self, log_type: LogType) -> bool {
//!         matches!(log_type, LogType::Error | LogType::Assert)
//!     }
//!
//!     fn should_report_exception(&self, _: &(dyn Error + 'static)) -> bool {
//!         true
//!     }
//!
//!     fn report(&self, _: LogType, _: &str, _: &str) {}
//!
//!     fn report_exception(&self, _: LogType, _: &str, _: &str, _: &(dyn Error + 'static)) {}
//! }
//!
//! let log = AppLog.with_level(LoggingLevel::Info);
//!
//! let err = io::Error::other("connection reset");
//! log.e(Event::new("Repo").with_message("fetch failed").with_error(&err));
//! log.d(Event::new("Repo").with_message("not printed"));
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod layout;
pub mod platform;

#[cfg(feature = "append-file")]
pub mod file;
#[cfg(feature = "internal-non-blocking")]
pub mod non_blocking;

pub mod call_site;
mod dispatch;
mod error;
mod level;
mod with_level;

pub use self::call_site::CallSite;
pub use self::call_site::SkipRules;
pub use self::dispatch::Event;
pub use self::dispatch::FlexiLog;
pub use self::dispatch::MAX_CHUNK_CHARS;
pub use self::dispatch::chunks;
pub use self::error::Error;
pub use self::level::LogType;
pub use self::level::LoggingLevel;
pub use self::with_level::LoggerWithLevel;
