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
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;

use crate::Error;
use crate::ErrorKind;
use crate::Severity;
use crate::logger::Logger;
use crate::logger::SetupArgs;
use crate::record::Record;

const SEPARATOR: &str = "-*-*-*-*-*-*-*-*-\n";

/// A logger that appends records to a file, one line per record.
///
/// Output format:
///
/// ```text
/// [12.000345] -I- main():31 service started
/// [12.000401] -W- load_config():87 config file missing, using defaults
/// ```
///
/// The file is opened in append mode by [`setup`](Logger::setup), from the path given to
/// [`File::new`] or the setup argument `path`. Teardown writes a separator line and closes
/// the file.
///
/// # Examples
///
/// ```
/// use flexlog::Severity;
/// use flexlog::logger::File;
///
/// let file = File::new("logs/app.log").with_threshold(Severity::Debug);
/// ```
#[derive(Debug)]
pub struct File {
    threshold: Severity,
    path: Option<PathBuf>,
    stream: Option<fs::File>,
}

impl Default for File {
    fn default() -> Self {
        Self {
            threshold: Severity::Trace,
            path: None,
            stream: None,
        }
    }
}

impl File {
    /// Create a file logger writing to `path` once set up.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Set the threshold the logger starts with. Default to [`Severity::Trace`].
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    /// The path of the log file, if known.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn format(record: &Record) -> String {
        format!(
            "[{}] -{}- {}():{} {}\n",
            record.time(),
            record.severity().letter(),
            record.function(),
            record.line(),
            record.message()
        )
    }
}

fn open_append(path: &Path) -> anyhow::Result<fs::File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context("failed to create log directory")?;
    }
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .context("failed to open log file")
}

impl Logger for File {
    fn render(&self, record: &Record) -> Result<(), Error> {
        let Some(mut stream) = self.stream.as_ref() else {
            return Ok(());
        };
        // one write per line keeps records whole even if another process appends too
        stream
            .write_all(Self::format(record).as_bytes())
            .map_err(Error::from_io_error)
    }

    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn setup(&mut self, args: &SetupArgs) -> Result<(), Error> {
        if self.stream.is_some() {
            return Err(Error::new(ErrorKind::AlreadyInUse, "log file is already open")
                .with_context("path", self.path.as_deref().unwrap_or(Path::new("")).display()));
        }

        let path = match args.get("path") {
            Some(path) => PathBuf::from(path),
            None => self
                .path
                .clone()
                .ok_or_else(|| Error::invalid_argument("no log file path given"))?,
        };

        let stream = open_append(&path).map_err(|err| {
            Error::new(ErrorKind::SinkFailure, "failed to set up file logger")
                .with_context("path", path.display())
                .with_source(err)
        })?;

        self.path = Some(path);
        self.stream = Some(stream);
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), Error> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        stream
            .write_all(SEPARATOR.as_bytes())
            .and_then(|_| stream.sync_data())
            .map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        match self.stream.as_ref() {
            Some(mut stream) => stream.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }
}
