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

use std::io::Write;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;

use super::Message;
use super::worker::Worker;
use crate::Error;

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

/// A guard that flushes lines buffered in a [`NonBlocking`] writer on drop.
///
/// Lines sent to a [`NonBlocking`] writer are written by a background thread at some later
/// point. If the program exits abruptly, buffered lines may be lost. Keep the guard alive in
/// `main` (or whatever the entrypoint is) so that dropping it drains the buffer, waiting at most
/// the configured shutdown timeout.
#[derive(Debug)]
pub struct WorkerGuard {
    handle: Option<JoinHandle<()>>,
    sender: Sender<Message>,
    done: Receiver<()>,
    shutdown_timeout: Duration,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let timeout = self.shutdown_timeout;
        match self.sender.send_timeout(Message::Shutdown, timeout) {
            Ok(()) => {
                if self.done.recv_timeout(timeout).is_ok() {
                    if let Some(handle) = self.handle.take() {
                        let _ = handle.join();
                    }
                }
            }
            Err(SendTimeoutError::Disconnected(_)) => {}
            Err(SendTimeoutError::Timeout(_)) => {
                eprintln!("failed to send shutdown signal to logging worker: timed out");
            }
        }
    }
}

/// A cloneable handle sending lines to the background writer.
#[derive(Debug, Clone)]
pub struct NonBlocking {
    sender: Sender<Message>,
}

impl NonBlocking {
    /// Queue one line for writing.
    pub fn send(&self, line: Vec<u8>) -> Result<(), Error> {
        self.sender
            .send(Message::Line(line))
            .map_err(|_| Error::new("failed to send log line to the writer thread"))
    }

    /// Block until every line queued so far has been written and flushed.
    pub fn flush(&self) -> Result<(), Error> {
        let (ack, acked) = bounded(1);
        self.sender
            .send(Message::Flush(ack))
            .map_err(|_| Error::new("failed to send flush request to the writer thread"))?;
        acked
            .recv()
            .map_err(|err| Error::new("writer thread exited before flushing").with_source(err))
    }
}

/// A builder for configuring [`NonBlocking`].
#[derive(Debug)]
pub struct NonBlockingBuilder<W> {
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Option<Duration>,
    writer: W,
}

impl<W: Write + Send + 'static> NonBlockingBuilder<W> {
    /// Create a new builder around `writer`.
    pub fn new(thread_name: impl Into<String>, writer: W) -> Self {
        Self {
            thread_name: thread_name.into(),
            buffered_lines_limit: None,
            shutdown_timeout: None,
            writer,
        }
    }

    /// Bound the number of pending lines; senders block once it is reached.
    ///
    /// Default to unbounded.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// How long dropping the [`WorkerGuard`] waits for the buffer to drain.
    ///
    /// Default to 100ms.
    pub fn shutdown_timeout(mut self, shutdown_timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// Spawn the writer thread.
    ///
    /// # Errors
    ///
    /// Return an error if the thread cannot be spawned.
    pub fn build(self) -> Result<(NonBlocking, WorkerGuard), Error> {
        let (sender, receiver) = match self.buffered_lines_limit {
            Some(cap) => bounded(cap),
            None => unbounded(),
        };
        let (done_sender, done) = bounded(1);

        let worker = Worker::new(self.writer, receiver, done_sender);
        let handle = worker.spawn(&self.thread_name).map_err(|err| {
            Error::new("failed to spawn log writer thread")
                .with_context("thread", &self.thread_name)
                .with_source(err)
        })?;

        let guard = WorkerGuard {
            handle: Some(handle),
            sender: sender.clone(),
            done,
            shutdown_timeout: self.shutdown_timeout.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT),
        };
        Ok((NonBlocking { sender }, guard))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_flush_waits_for_pending_lines() {
        let buf = SharedBuf::default();
        let (writer, _guard) = NonBlockingBuilder::new("flexilog-test", buf.clone())
            .build()
            .unwrap();

        writer.send(b"first\n".to_vec()).unwrap();
        writer.send(b"second\n".to_vec()).unwrap();
        writer.flush().unwrap();

        assert_eq!(buf.0.lock().unwrap().as_slice(), b"first\nsecond\n");
    }

    #[test]
    fn test_guard_drains_on_drop() {
        let buf = SharedBuf::default();
        let (writer, guard) = NonBlockingBuilder::new("flexilog-test", buf.clone())
            .buffered_lines_limit(Some(16))
            .shutdown_timeout(Some(Duration::from_secs(5)))
            .build()
            .unwrap();

        for i in 0..10 {
            writer.send(format!("line {i}\n").into_bytes()).unwrap();
        }
        drop(guard);

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.lines().count(), 10);
        assert!(writer.send(b"late\n".to_vec()).is_err());
    }
}
