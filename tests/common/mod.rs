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


#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use flexlog::Error;
use flexlog::ErrorKind;
use flexlog::Logger;
use flexlog::Record;
use flexlog::Severity;
use flexlog::logger::SetupArgs;
use flexlog::trap::Trap;

/// Lines rendered by any number of [`Capture`] loggers, in rendering order.
#[derive(Debug, Default, Clone)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn lines_of(&self, name: &str) -> Vec<String> {
        let prefix = format!("{name} ");
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with(&prefix))
            .collect()
    }

    fn push(&self, line: String) {
        self.0.lock().unwrap().push(line);
    }
}

#[derive(Debug, Default, Clone)]
pub struct Counters {
    setups: Arc<AtomicUsize>,
    teardowns: Arc<AtomicUsize>,
}

impl Counters {
    pub fn setups(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }

    pub fn teardowns(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

/// A logger writing `<name> <LABEL> <message>` lines into a [`Journal`].
#[derive(Debug)]
pub struct Capture {
    name: &'static str,
    threshold: Severity,
    journal: Journal,
    counters: Counters,
    fail_setup: bool,
    fail_teardown: bool,
    fail_render: bool,
}

impl Capture {
    pub fn new(name: &'static str, threshold: Severity, journal: &Journal) -> Self {
        Self {
            name,
            threshold,
            journal: journal.clone(),
            counters: Counters::default(),
            fail_setup: false,
            fail_teardown: false,
            fail_render: false,
        }
    }

    pub fn failing_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }

    pub fn failing_teardown(mut self) -> Self {
        self.fail_teardown = true;
        self
    }

    pub fn failing_render(mut self) -> Self {
        self.fail_render = true;
        self
    }

    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }
}

impl Logger for Capture {
    fn render(&self, record: &Record) -> Result<(), Error> {
        if self.fail_render {
            return Err(Error::new(ErrorKind::SinkFailure, "render refused"));
        }
        self.journal.push(format!(
            "{} {} {}",
            self.name,
            record.label(),
            record.message()
        ));
        Ok(())
    }

    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn setup(&mut self, _: &SetupArgs) -> Result<(), Error> {
        self.counters.setups.fetch_add(1, Ordering::SeqCst);
        if self.fail_setup {
            return Err(Error::new(ErrorKind::SinkFailure, "setup refused"));
        }
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), Error> {
        self.counters.teardowns.fetch_add(1, Ordering::SeqCst);
        if self.fail_teardown {
            return Err(Error::new(ErrorKind::SinkFailure, "teardown refused"));
        }
        Ok(())
    }
}

/// A trap remembering every reported error.
#[derive(Debug, Default, Clone)]
pub struct RecordingTrap(Arc<Mutex<Vec<(ErrorKind, String)>>>);

impl RecordingTrap {
    pub fn reports(&self) -> Vec<(ErrorKind, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl Trap for RecordingTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push((err.kind(), err.to_string()));
    }
}
