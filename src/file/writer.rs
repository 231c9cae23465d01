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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use crate::Error;

/// An append-only log file.
#[derive(Debug)]
pub(crate) struct FileWriter {
    file: File,
}

impl FileWriter {
    /// Open `path` for appending, creating it and its parent directories if needed.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| {
                Error::new("failed to create log directory")
                    .with_context("path", dir.display())
                    .with_source(err)
            })?;
        }
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|err| {
                Error::new("failed to open log file")
                    .with_context("path", path.display())
                    .with_source(err)
            })?;
        Ok(Self { file })
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_open_creates_directories_and_appends() {
        let dir = TempDir::new().expect("failed to create a temporary directory");
        let path = dir.path().join("nested").join("app.log");

        let payload = generate_random_string();
        let mut writer = FileWriter::open(&path).unwrap();
        assert_eq!(writer.write(payload.as_bytes()).unwrap(), payload.len());
        writer.flush().unwrap();
        drop(writer);

        let mut writer = FileWriter::open(&path).unwrap();
        writer.write_all(b"!").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), format!("{payload}!"));
    }

    fn generate_random_string() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(50..=100);
        std::iter::repeat_with(|| char::from(rng.sample(Alphanumeric)))
            .take(len)
            .collect()
    }
}
