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

//! Log record and call-site metadata.

use crate::Severity;

/// Where a log call was made.
///
/// Usually captured by [`callsite!`](crate::callsite).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct CallSite {
    function: &'static str,
    module_path: &'static str,
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Create a new call site.
    pub const fn new(
        function: &'static str,
        module_path: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            function,
            module_path,
            file,
            line,
        }
    }

    /// The name of the enclosing function.
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// The module path of the call.
    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// The source file containing the call.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// The line containing the call.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl Default for CallSite {
    fn default() -> Self {
        CallSite::new("", "", "", 0)
    }
}

/// One fully materialized log call.
///
/// A record is built once per dispatch and handed by reference to every admitting logger.
#[derive(Clone, Debug)]
pub struct Record {
    time: String,
    pid: u32,
    severity: Severity,
    callsite: CallSite,
    message: String,
}

impl Record {
    /// Create a new [`RecordBuilder`].
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// The rendered timestamp. Blank if the clock could not be read.
    pub fn time(&self) -> &str {
        &self.time
    }

    /// The id of the emitting process.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The severity of the record.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The three letter severity label, e.g. `INF`.
    pub fn label(&self) -> &'static str {
        self.severity.label()
    }

    /// The originating call site.
    pub fn callsite(&self) -> &CallSite {
        &self.callsite
    }

    /// The name of the originating function.
    pub fn function(&self) -> &'static str {
        self.callsite.function
    }

    /// The originating source file.
    pub fn file(&self) -> &'static str {
        self.callsite.file
    }

    /// The originating source line.
    pub fn line(&self) -> u32 {
        self.callsite.line
    }

    /// The formatted message text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                time: String::new(),
                pid: std::process::id(),
                severity: Severity::Info,
                callsite: CallSite::default(),
                message: String::new(),
            },
        }
    }
}

impl RecordBuilder {
    /// Set [`time`](Record::time).
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.record.time = time.into();
        self
    }

    /// Set [`pid`](Record::pid). Default to the current process id.
    pub fn pid(mut self, pid: u32) -> Self {
        self.record.pid = pid;
        self
    }

    /// Set [`severity`](Record::severity). Default to [`Severity::Info`].
    pub fn severity(mut self, severity: Severity) -> Self {
        self.record.severity = severity;
        self
    }

    /// Set [`callsite`](Record::callsite).
    pub fn callsite(mut self, callsite: CallSite) -> Self {
        self.record.callsite = callsite;
        self
    }

    /// Set [`message`](Record::message).
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.record.message = message.into();
        self
    }

    /// Invoke the builder and return a `Record`
    pub fn build(self) -> Record {
        self.record
    }
}
