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

//! Loggers render records to their destinations.

use std::fmt;

use crate::Error;
use crate::Severity;
use crate::record::Record;

mod console;
mod file;

pub use self::console::Console;
pub use self::file::File;

/// A logger that renders records to a destination such as the console or a file.
///
/// Only [`render`](Logger::render) is mandatory. [`setup`](Logger::setup) and
/// [`teardown`](Logger::teardown) run exactly once, when the logger enters and leaves a
/// registry slot, while the registry lock is held.
pub trait Logger: fmt::Debug + Send + Sync + 'static {
    /// Render a record to the destination.
    ///
    /// Called under the registry lock, once per admitted record. An error is reported to the
    /// registry's [`Trap`](crate::trap::Trap) and never reaches the logging call site or the
    /// other loggers.
    fn render(&self, record: &Record) -> Result<(), Error>;

    /// The threshold this logger starts with once registered.
    ///
    /// Default to [`Severity::Info`].
    fn threshold(&self) -> Severity {
        Severity::Info
    }

    /// Prepare the logger before it is stored in a slot.
    ///
    /// A failure aborts the registration and leaves the slot empty.
    ///
    /// Default to a no-op.
    fn setup(&mut self, args: &SetupArgs) -> Result<(), Error> {
        let _ = args;
        Ok(())
    }

    /// Release the logger's resources after it is removed from its slot.
    ///
    /// The slot is cleared even if this fails.
    ///
    /// Default to a no-op.
    fn teardown(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Flush any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Logger> From<T> for Box<dyn Logger> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// Named arguments handed to [`Logger::setup`].
///
/// # Examples
///
/// ```
/// use flexlog::logger::SetupArgs;
///
/// let args = SetupArgs::new().with("path", "/var/log/app.log");
/// assert_eq!(args.get("path"), Some("/var/log/app.log"));
/// assert_eq!(args.get("color"), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetupArgs {
    args: Vec<(String, String)>,
}

impl SetupArgs {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument. A later value for the same key wins.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.push((key.into(), value.into()));
        self
    }

    /// Return the value of an argument.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no argument is set.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}
