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

use crate::CallSite;
use crate::LogType;
use crate::SkipRules;
use crate::call_site;
use crate::platform::Platform;
use crate::platform::render_error;

/// A platform forwarding console lines into the [`log`] crate facade.
///
/// The tag becomes the record target and `Assert` is mapped to [`log::Level::Error`]. Use this
/// when the host application already installed a `log` implementation.
///
/// Do not combine it with [`crate::bridge::LogBridge`]: the bridge routes `log` records back into
/// the dispatcher, so the two together loop.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct LogFacadePlatform {}

impl Platform for LogFacadePlatform {
    fn print(
        &self,
        log_type: LogType,
        tag: &str,
        message: &str,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        let level = log::Level::from(log_type);
        if level > log::max_level() {
            return;
        }

        let logger = log::logger();
        match error {
            None => logger.log(
                &log::Record::builder()
                    .args(format_args!("{message}"))
                    .level(level)
                    .target(tag)
                    .build(),
            ),
            Some(error) => logger.log(
                &log::Record::builder()
                    .args(format_args!("{message}\n    {}", render_error(error)))
                    .level(level)
                    .target(tag)
                    .build(),
            ),
        }
    }

    fn capture_call_site(&self, rules: &SkipRules) -> Option<CallSite> {
        call_site::capture(rules)
    }
}
