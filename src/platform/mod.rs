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

//! Per-target capabilities the dispatcher relies on.
//!
//! A [`Platform`] prints to the console, tells the time and, where the target allows it, walks
//! the stack to find the caller. One adapter exists per output target:
//!
//! - [`StdioPlatform`] writes coloured lines to stderr or stdout;
//! - [`LogFacadePlatform`] forwards into the `log` crate facade;
//! - [`Testing`] writes through `eprintln!` so the test harness captures it.

use std::any::type_name;
use std::error::Error as StdError;
use std::fmt;
use std::sync::LazyLock;

use crate::CallSite;
use crate::LogType;
use crate::SkipRules;

mod log_facade;
mod stdio;
mod testing;

pub use self::log_facade::LogFacadePlatform;
pub use self::stdio::LevelColor;
pub use self::stdio::StdioPlatform;
pub use self::stdio::Stream;
pub use self::testing::Testing;

/// Placeholder used when a type has no usable name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Console printing, time and stack introspection for one target.
pub trait Platform: fmt::Debug + Send + Sync + 'static {
    /// Print one console line. Must not fail observably.
    fn print(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    );

    /// Milliseconds since the Unix epoch.
    fn now(&self) -> i64 {
        jiff::Timestamp::now().as_millisecond()
    }

    /// Find the code location that issued the current log call.
    ///
    /// Default to "unsupported", i.e. always `None`.
    fn capture_call_site(&self, rules: &SkipRules) -> Option<CallSite> {
        let _ = rules;
        None
    }
}

impl<T: Platform> From<T> for Box<dyn Platform> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

static DEFAULT_PLATFORM: LazyLock<StdioPlatform> = LazyLock::new(StdioPlatform::default);

/// The process-wide platform used by dispatchers that do not pick their own.
pub fn default_platform() -> &'static dyn Platform {
    &*DEFAULT_PLATFORM
}

/// The simple name of type `T`, e.g. `Repo` for `app::data::Repo<u8>`.
///
/// # Examples
///
/// ```
/// struct Repo;
///
/// assert_eq!(flexilog::platform::simple_name::<Repo>(), "Repo");
/// ```
pub fn simple_name<T: ?Sized>() -> &'static str {
    simple_name_from_path(type_name::<T>())
}

/// The simple name of the type of `value`.
pub fn simple_name_of_val<T: ?Sized>(value: &T) -> &'static str {
    let _ = value;
    simple_name::<T>()
}

fn simple_name_from_path(path: &'static str) -> &'static str {
    let path = path.trim_start_matches('&').trim_start_matches("mut ");
    let path = match path.find('<') {
        Some(idx) => &path[..idx],
        None => path,
    };
    let name = match path.rfind("::") {
        Some(idx) => &path[idx + 2..],
        None => path,
    };
    if name.is_empty() { UNKNOWN_NAME } else { name }
}

/// Render an error and its `source()` chain, one cause per line.
pub(crate) fn render_error(error: &(dyn StdError + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str("\n    caused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
