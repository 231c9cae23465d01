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

//! Best-effort discovery of the code location that issued a log call.

use std::fmt;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// The location where a log call was made.
///
/// Crash reporters use it to point at the caller instead of the logging internals.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// The fully qualified type or module path, e.g. `app::data::Repo`.
    pub class_name: String,
    /// The function name, e.g. `fetch`.
    pub method_name: String,
    /// The source file name, if known.
    pub file_name: Option<String>,
    /// The line in the source file, or `-1` if unknown.
    pub line_number: i64,
}

impl CallSite {
    /// Create a new call site.
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        file_name: Option<String>,
        line_number: i64,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            file_name,
            line_number,
        }
    }

    /// The last path segment of [`CallSite::class_name`].
    pub fn simple_class_name(&self) -> &str {
        let name = match self.class_name.rfind("::") {
            Some(idx) => &self.class_name[idx + 2..],
            None => &self.class_name,
        };
        match name.rfind('.') {
            Some(idx) => &name[idx + 1..],
            None => name,
        }
    }

    /// Render as `Type.method(File.rs:12)`.
    ///
    /// The line is omitted when it is unknown; the whole parenthetical is omitted when the file
    /// is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use flexilog::CallSite;
    ///
    /// let site = CallSite::new("com.x.Y", "f", Some("Y.kt".to_string()), 12);
    /// assert_eq!(site.to_formatted_string(), "Y.f(Y.kt:12)");
    ///
    /// let site = CallSite::new("com.x.Y", "f", None, 12);
    /// assert_eq!(site.to_formatted_string(), "Y.f");
    /// ```
    pub fn to_formatted_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.simple_class_name(), self.method_name)?;
        match &self.file_name {
            Some(file) if self.line_number > 0 => write!(f, "({file}:{})", self.line_number),
            Some(file) => write!(f, "({file})"),
            None => Ok(()),
        }
    }
}

/// Prefixes of frames that never count as the caller.
const INTERNAL_SKIP_PREFIXES: &[&str] = &[
    concat!(env!("CARGO_CRATE_NAME"), "::"),
    concat!("<", env!("CARGO_CRATE_NAME"), "::"),
    "std::",
    "<std::",
    "core::",
    "<core::",
    "alloc::",
    "<alloc::",
    "backtrace::",
    "<backtrace::",
    "tokio::",
    "<tokio::",
    "futures_util::",
    "<futures_util::",
    "rust_begin_unwind",
    "__rust",
];

/// Path of the dispatcher trait as it shows up in `<T as Trait>::method` symbols.
const DISPATCHER_TRAIT: &str = concat!(env!("CARGO_CRATE_NAME"), "::dispatch::FlexiLog");

type WrapperPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Decides which stack frames belong to logging machinery and are skipped during capture.
///
/// A frame is skipped if its declaring path starts with one of:
///
/// - the crate's own namespace, the standard library or async runtime machinery;
/// - any prefix passed to [`SkipRules::skip_prefix`];
/// - any type registered via [`SkipRules::logger_type`].
///
/// Frames of types implementing `FlexiLog` are skipped too, as is any frame the
/// [`SkipRules::wrapper_predicate`] claims. A panicking predicate counts as "no match".
#[derive(Clone, Default)]
pub struct SkipRules {
    prefixes: Vec<String>,
    logger_types: Vec<String>,
    predicate: Option<WrapperPredicate>,
}

impl fmt::Debug for SkipRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipRules")
            .field("prefixes", &self.prefixes)
            .field("logger_types", &self.logger_types)
            .field("predicate", &self.predicate.as_ref().map(|_| ".."))
            .finish()
    }
}

impl SkipRules {
    /// Create rules that skip only the internal frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip every frame whose path starts with `prefix`.
    pub fn skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Skip every frame whose path starts with one of `prefixes`.
    pub fn skip_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes.extend(prefixes.into_iter().map(Into::into));
        self
    }

    /// Register a logger wrapper type by its full path (as returned by
    /// [`std::any::type_name`]); its frames are skipped.
    pub fn logger_type(mut self, type_path: impl Into<String>) -> Self {
        self.logger_types.push(type_path.into());
        self
    }

    /// Skip frames whose declaring path the predicate accepts.
    pub fn wrapper_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Whether the frame named `symbol` (a demangled path without hash) is logging machinery.
    pub fn is_skipped(&self, symbol: &str) -> bool {
        let declaring = declaring_path(symbol);

        if INTERNAL_SKIP_PREFIXES
            .iter()
            .any(|p| symbol.starts_with(p) || declaring.starts_with(p))
        {
            return true;
        }
        if implements_dispatcher(symbol) {
            return true;
        }
        if self
            .prefixes
            .iter()
            .any(|p| symbol.starts_with(p.as_str()) || declaring.starts_with(p.as_str()))
        {
            return true;
        }
        if self
            .logger_types
            .iter()
            .any(|t| {
                declaring == t.as_str() || strip_generics(declaring) == strip_generics(t)
            })
        {
            return true;
        }

        match &self.predicate {
            Some(predicate) => panic::catch_unwind(AssertUnwindSafe(|| predicate(declaring)))
                .unwrap_or(false),
            None => false,
        }
    }
}

/// Walk the current stack and return the first frame not claimed by `rules`.
///
/// Returns `None` if no symbol information is available or every frame is skipped.
pub fn capture(rules: &SkipRules) -> Option<CallSite> {
    let mut found = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let Some(name) = symbol.name() else { return };
            let name = format!("{name:#}");
            if name.is_empty() || rules.is_skipped(&name) {
                return;
            }
            let file_name = symbol
                .filename()
                .and_then(|path| path.file_name())
                .map(|file| file.to_string_lossy().into_owned());
            let line_number = symbol.lineno().map(i64::from).unwrap_or(-1);
            found = Some(frame_to_call_site(&name, file_name, line_number));
        });
        found.is_none()
    });

    found
}

fn frame_to_call_site(symbol: &str, file_name: Option<String>, line_number: i64) -> CallSite {
    let (class_name, method_name) = match symbol.rfind("::") {
        Some(idx) => (declaring_path(symbol), &symbol[idx + 2..]),
        None => ("", symbol),
    };
    CallSite::new(class_name, method_name, file_name, line_number)
}

/// The part of a symbol naming the type or module the function belongs to.
///
/// `app::Repo::fetch` declares in `app::Repo`; `<app::Log as some::Trait>::e` declares in
/// `app::Log`.
fn declaring_path(symbol: &str) -> &str {
    if let Some(rest) = symbol.strip_prefix('<') {
        if let Some(end) = find_impl_end(rest) {
            let inner = &rest[..end];
            return match inner.find(" as ") {
                Some(idx) => &inner[..idx],
                None => inner,
            };
        }
    }
    match symbol.rfind("::") {
        Some(idx) => &symbol[..idx],
        None => symbol,
    }
}

/// Whether the symbol is a `<T as FlexiLog>::method` frame.
fn implements_dispatcher(symbol: &str) -> bool {
    let Some(rest) = symbol.strip_prefix('<') else {
        return false;
    };
    let Some(end) = find_impl_end(rest) else {
        return false;
    };
    match rest[..end].find(" as ") {
        Some(idx) => strip_generics(&rest[..end][idx + 4..]) == DISPATCHER_TRAIT,
        None => false,
    }
}

/// Index of the `>` closing a leading `<` (already stripped), honouring nesting.
fn find_impl_end(rest: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, c) in rest.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_generics(path: &str) -> &str {
    match path.find('<') {
        Some(idx) => &path[..idx],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_string() {
        let site = CallSite::new("com.x.Y", "f", Some("Y.kt".to_string()), 12);
        assert_eq!(site.to_formatted_string(), "Y.f(Y.kt:12)");

        let site = CallSite::new("com.x.Y", "f", None, 12);
        assert_eq!(site.to_formatted_string(), "Y.f");

        let site = CallSite::new("app::data::Repo", "fetch", Some("repo.rs".to_string()), -1);
        assert_eq!(site.to_string(), "Repo.fetch(repo.rs)");
        assert_eq!(site.simple_class_name(), "Repo");
    }

    #[test]
    fn test_declaring_path() {
        assert_eq!(declaring_path("app::Repo::fetch"), "app::Repo");
        assert_eq!(declaring_path("<app::Log as other::Trait>::e"), "app::Log");
        assert_eq!(
            declaring_path("<app::Wrap<app::Inner> as other::Trait>::e"),
            "app::Wrap<app::Inner>"
        );
        assert_eq!(declaring_path("main"), "main");
    }

    #[test]
    fn test_internal_frames_are_skipped() {
        let rules = SkipRules::new();
        assert!(rules.is_skipped("std::rt::lang_start"));
        assert!(rules.is_skipped("core::ops::function::FnOnce::call_once"));
        assert!(rules.is_skipped(concat!(env!("CARGO_CRATE_NAME"), "::dispatch::FlexiLog::e")));
        assert!(!rules.is_skipped("app::Repo::fetch"));
    }

    #[test]
    fn test_dispatcher_implementors_are_skipped() {
        let rules = SkipRules::new();
        let symbol = format!("<app::Log as {DISPATCHER_TRAIT}>::log_to_console");
        assert!(rules.is_skipped(&symbol));
        assert!(!rules.is_skipped("<app::Log as core_fmt::Display>::fmt"));
    }

    #[test]
    fn test_caller_prefixes_and_registered_types_are_skipped() {
        let rules = SkipRules::new()
            .skip_prefix("app::util::")
            .logger_type("app::AppLog");
        assert!(rules.is_skipped("app::util::log_helper"));
        assert!(rules.is_skipped("app::AppLog::network"));
        assert!(!rules.is_skipped("app::AppLogger::network"));
        assert!(!rules.is_skipped("app::service::run"));
    }

    #[test]
    fn test_generic_logger_types_are_skipped() {
        // type_name gives the concrete arguments, symbols give the declared parameters
        let rules = SkipRules::new().logger_type("app::AppLog<app::Tagged>");
        assert!(rules.is_skipped("app::AppLog<P>::network"));
        assert!(rules.is_skipped("app::AppLog<app::Tagged>::network"));
        assert!(!rules.is_skipped("app::AppLogger<P>::network"));
        assert!(!rules.is_skipped("app::service::run"));
    }

    #[test]
    fn test_panicking_predicate_is_treated_as_no_match() {
        let rules = SkipRules::new().wrapper_predicate(|path| {
            if path.contains("Broken") {
                panic!("type lookup failed");
            }
            path.ends_with("Wrapper")
        });
        assert!(rules.is_skipped("app::LogWrapper::e"));
        assert!(!rules.is_skipped("app::Broken::e"));
        assert!(!rules.is_skipped("app::service::run"));
    }

    #[test]
    fn test_frame_to_call_site() {
        let site = frame_to_call_site("app::Repo::fetch", Some("repo.rs".to_string()), 7);
        assert_eq!(site.class_name, "app::Repo");
        assert_eq!(site.method_name, "fetch");
        assert_eq!(site.to_string(), "Repo.fetch(repo.rs:7)");
    }
}
