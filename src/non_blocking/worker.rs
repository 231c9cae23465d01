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

use std::io;
use std::io::Write;
use std::thread;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::TryRecvError;

use super::Message;

pub(super) struct Worker<W> {
    writer: W,
    receiver: Receiver<Message>,
    done: Sender<()>,
}

enum Step {
    Continue,
    Stop,
}

impl<W: Write + Send + 'static> Worker<W> {
    pub(super) fn new(writer: W, receiver: Receiver<Message>, done: Sender<()>) -> Self {
        Self {
            writer,
            receiver,
            done,
        }
    }

    fn handle(&mut self, message: Message) -> io::Result<Step> {
        match message {
            Message::Line(line) => {
                self.writer.write_all(&line)?;
                Ok(Step::Continue)
            }
            Message::Flush(ack) => {
                self.writer.flush()?;
                let _ = ack.send(());
                Ok(Step::Continue)
            }
            Message::Shutdown => Ok(Step::Stop),
        }
    }

    /// Block for one message, then drain whatever else is queued before flushing.
    fn work(&mut self) -> io::Result<Step> {
        let Ok(message) = self.receiver.recv() else {
            return Ok(Step::Stop);
        };
        let mut step = self.handle(message)?;

        while let Step::Continue = step {
            match self.receiver.try_recv() {
                Ok(message) => step = self.handle(message)?,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => step = Step::Stop,
            }
        }

        self.writer.flush()?;
        Ok(step)
    }

    pub(super) fn spawn(mut self, name: &str) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name.to_string()).spawn(move || {
            loop {
                match self.work() {
                    Ok(Step::Continue) => {}
                    Ok(Step::Stop) => break,
                    Err(err) => eprintln!("failed to write log: {err}"),
                }
            }
            if let Err(err) = self.writer.flush() {
                eprintln!("failed to flush log: {err}");
            }
            let _ = self.done.send(());
        })
    }
}
