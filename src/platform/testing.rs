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

use crate::LogType;
use crate::platform::Platform;
use crate::platform::render_error;

/// A platform that writes console lines that can be captured by a test harness (like
/// `cargo test`), and thus the outputs are suppressed unless `--nocapture` or `--show-output` is
/// specified.
///
/// It never inspects the stack, so reports made through it carry no call site.
///
/// # Examples
///
/// ```
/// use flexilog::platform::Testing;
///
/// let platform = Testing::default();
/// ```
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct Testing {}

impl Platform for Testing {
    fn print(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        match error {
            Some(error) => eprintln!("{log_type:>7} {tag}: {message}\n    {}", render_error(error)),
            None => eprintln!("{log_type:>7} {tag}: {message}"),
        }
    }
}
