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
use std::io;

/// The error struct of flexilog.
///
/// Errors only arise around the dispatcher: parsing levels, opening or writing log files and
/// installing the `log` bridge. The dispatch path itself never produces one.
pub struct Error {
    message: String,
    context: Vec<(&'static str, String)>,
    sources: Vec<anyhow::Error>,
}

impl Error {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: vec![],
            sources: vec![],
        }
    }

    /// Attach a key-value pair describing where the error happened.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Attach an underlying cause.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }

    /// The message this error was created with.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Look up a context value by key.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn from_io_error(err: io::Error) -> Error {
        Error::new("failed to perform io").with_source(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        if !self.context.is_empty() {
            let pairs = self
                .context
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>();
            write!(f, " ({})", pairs.join(", "))?;
        }

        for source in &self.sources {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("message", &self.message)
                .field("context", &self.context)
                .field("sources", &self.sources)
                .finish();
        }

        writeln!(f, "{}", self.message)?;
        for (k, v) in &self.context {
            writeln!(f, "    {k}: {v}")?;
        }
        for source in &self.sources {
            writeln!(f, "caused by: {source:#}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::from_io_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context_and_source() {
        let err = Error::new("failed to open log file")
            .with_context("path", "/tmp/app.log")
            .with_source(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));

        assert_eq!(
            err.to_string(),
            "failed to open log file (path=/tmp/app.log): denied"
        );
        assert_eq!(err.context("path"), Some("/tmp/app.log"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_plain_message() {
        let err = Error::new("boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.message(), "boom");
        assert!(err.context("path").is_none());
    }
}
