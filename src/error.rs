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

use std::convert::Infallible;
use std::fmt;
use std::io;

/// The kind of failure an [`Error`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A severity, clock mode, slot index or setup argument is out of range or malformed.
    InvalidArgument,
    /// A logger is already registered in the requested slot.
    AlreadyInUse,
    /// The requested slot holds no logger.
    NotInitialized,
    /// The registry was used from a thread already holding its lock.
    LockFailure,
    /// A logger failed to set up, tear down or write.
    SinkFailure,
    /// The selected clock could not be read.
    ClockFailure,
}

impl ErrorKind {
    /// Return the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::AlreadyInUse => "AlreadyInUse",
            ErrorKind::NotInitialized => "NotInitialized",
            ErrorKind::LockFailure => "LockFailure",
            ErrorKind::SinkFailure => "SinkFailure",
            ErrorKind::ClockFailure => "ClockFailure",
        }
    }

    /// The negative errno-style code reported for this kind.
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::InvalidArgument => -22,
            ErrorKind::AlreadyInUse => -16,
            ErrorKind::NotInitialized => -19,
            ErrorKind::LockFailure => -35,
            ErrorKind::SinkFailure => -5,
            ErrorKind::ClockFailure => -22,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error struct of flexlog.
pub struct Error {
    kind: ErrorKind,
    message: String,
    sources: Vec<anyhow::Error>,
    context: Vec<(&'static str, String)>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.sources.is_empty() {
            write!(f, ", sources: [")?;
            for (i, source) in self.sources.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{source}")?;
            }
            write!(f, "]")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("sources", &self.sources);
            return de.finish();
        }

        write!(f, "{}: {}", self.kind, self.message)?;
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        if !self.sources.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sources:")?;
            for source in self.sources.iter() {
                writeln!(f, "   {source:#}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}

impl From<Infallible> for Error {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            sources: vec![],
            context: vec![],
        }
    }

    /// Add one more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Add one more source in error.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }

    /// Return the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return the message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Return the negative errno-style code of this error.
    ///
    /// See [`ErrorKind::code`].
    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    /// Return an iterator over all sources of this error.
    pub fn sources(&self) -> impl ExactSizeIterator<Item = &(dyn std::error::Error + 'static)> {
        self.sources.iter().map(|v| v.as_ref())
    }

    /// Default constructor for [`Error`] from [`io::Error`].
    pub fn from_io_error(err: io::Error) -> Error {
        Error::new(ErrorKind::SinkFailure, "failed to perform io").with_source(err)
    }

    /// Default constructor for [`Error`] from [`fmt::Error`].
    pub fn from_fmt_error(err: fmt::Error) -> Error {
        Error::new(ErrorKind::SinkFailure, "failed to perform format").with_source(err)
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Error {
        Error::new(ErrorKind::InvalidArgument, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_context_and_sources() {
        let err = Error::new(ErrorKind::AlreadyInUse, "slot is occupied")
            .with_context("index", 1)
            .with_source(io::Error::other("disk on fire"));

        assert_eq!(
            err.to_string(),
            "slot is occupied (AlreadyInUse), context: { index: 1 }, sources: [disk on fire]"
        );
        assert_eq!(err.code(), -16);
        assert_eq!(err.sources().len(), 1);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_codes_are_negative() {
        for kind in [
            ErrorKind::InvalidArgument,
            ErrorKind::AlreadyInUse,
            ErrorKind::NotInitialized,
            ErrorKind::LockFailure,
            ErrorKind::SinkFailure,
            ErrorKind::ClockFailure,
        ] {
            assert!(kind.code() < 0, "{kind} must map to a negative code");
        }
    }

    #[test]
    fn test_clock_failure_is_its_own_kind() {
        let err = Error::new(ErrorKind::ClockFailure, "failed to read the system clock");
        assert_eq!(err.code(), -22);
        assert_eq!(
            err.to_string(),
            "failed to read the system clock (ClockFailure)"
        );
    }
}
