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

use colored::Color;
use colored::Colorize;

use crate::Error;
use crate::Severity;
use crate::logger::Logger;
use crate::logger::SetupArgs;
use crate::record::Record;

/// A logger that prints records to the console.
///
/// Fatal, error and warn records go to stderr, everything else to stdout.
///
/// Output format:
///
/// ```text
/// [12.000345] 4242 <INF> service started
/// [12.000401] 4242 <WRN> load_config():87 config file missing, using defaults
/// ```
///
/// Info records omit the call site. Labels are colored unless [`no_color`](Console::no_color)
/// is set or the setup argument `color` is `off`.
///
/// # Examples
///
/// ```
/// use flexlog::Severity;
/// use flexlog::logger::Console;
///
/// let console = Console::default().with_threshold(Severity::Debug).no_color();
/// ```
#[derive(Debug, Clone)]
pub struct Console {
    threshold: Severity,
    color: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            threshold: Severity::Info,
            color: true,
        }
    }
}

impl Console {
    /// Set the threshold the logger starts with. Default to [`Severity::Info`].
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    /// Disable colored labels.
    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub(crate) fn format(&self, record: &Record) -> String {
        let label = format!("<{}>", record.label());
        let label = match level_color(record.severity()) {
            Some(color) if self.color => label.color(color).to_string(),
            _ => label,
        };

        if record.severity() == Severity::Info {
            format!(
                "[{}] {} {} {}\n",
                record.time(),
                record.pid(),
                label,
                record.message()
            )
        } else {
            format!(
                "[{}] {} {} {}():{} {}\n",
                record.time(),
                record.pid(),
                label,
                record.function(),
                record.line(),
                record.message()
            )
        }
    }
}

fn level_color(severity: Severity) -> Option<Color> {
    match severity {
        Severity::None => None,
        Severity::Fatal => Some(Color::Magenta),
        Severity::Error => Some(Color::Red),
        Severity::Warn => Some(Color::Yellow),
        Severity::Info => Some(Color::Green),
        Severity::Debug => Some(Color::Cyan),
        Severity::Trace => Some(Color::White),
    }
}

fn is_stderr(severity: Severity) -> bool {
    matches!(
        severity,
        Severity::Fatal | Severity::Error | Severity::Warn
    )
}

impl Logger for Console {
    fn render(&self, record: &Record) -> Result<(), Error> {
        let line = self.format(record);
        let result = if is_stderr(record.severity()) {
            let mut stream = io::stderr().lock();
            stream.write_all(line.as_bytes()).and_then(|_| stream.flush())
        } else {
            let mut stream = io::stdout().lock();
            stream.write_all(line.as_bytes()).and_then(|_| stream.flush())
        };
        result.map_err(Error::from_io_error)
    }

    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn setup(&mut self, args: &SetupArgs) -> Result<(), Error> {
        match args.get("color") {
            None => Ok(()),
            Some(mode) if mode.eq_ignore_ascii_case("on") => {
                self.color = true;
                Ok(())
            }
            Some(mode) if mode.eq_ignore_ascii_case("off") => {
                self.color = false;
                Ok(())
            }
            Some(mode) => Err(Error::invalid_argument("invalid console color mode")
                .with_context("color", mode)),
        }
    }

    fn flush(&self) -> Result<(), Error> {
        io::stdout().flush().map_err(Error::from_io_error)?;
        io::stderr().flush().map_err(Error::from_io_error)
    }
}
