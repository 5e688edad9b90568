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

//! Severity levels and the threshold admission rule.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An enum representing the available severity levels.
///
/// Lower ordinals are more urgent. [`Severity::None`] is never attached to a record; as a
/// threshold it admits nothing.
///
/// A logger configured with threshold `T` renders severity `S` iff `S <= T`, see
/// [`Severity::admits`].
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Severity {
    /// Never printable.
    None = 0,
    /// The "fatal" level.
    ///
    /// Emitting a fatal record terminates the process.
    Fatal = 1,
    /// The "error" level.
    ///
    /// Designates very serious errors.
    Error = 2,
    /// The "warn" level.
    ///
    /// Designates hazardous situations.
    Warn = 3,
    /// The "info" level.
    ///
    /// Designates useful information.
    Info = 4,
    /// The "debug" level.
    ///
    /// Designates lower priority information.
    Debug = 5,
    /// The "trace" level.
    ///
    /// Designates very low priority, often extremely verbose, information.
    Trace = 6,
}

impl Severity {
    /// One past the largest valid ordinal.
    pub const MAX: u32 = 7;

    /// All printable severities, most urgent first.
    pub const PRINTABLE: [Severity; 6] = [
        Severity::Fatal,
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
    ];

    /// Return whether the raw ordinal names a severity.
    pub fn is_valid(ordinal: u32) -> bool {
        ordinal < Self::MAX
    }

    /// Return the severity with the given ordinal, if any.
    pub const fn from_ordinal(ordinal: u32) -> Option<Severity> {
        match ordinal {
            0 => Some(Severity::None),
            1 => Some(Severity::Fatal),
            2 => Some(Severity::Error),
            3 => Some(Severity::Warn),
            4 => Some(Severity::Info),
            5 => Some(Severity::Debug),
            6 => Some(Severity::Trace),
            _ => None,
        }
    }

    /// The ordinal of this severity.
    pub const fn ordinal(self) -> u32 {
        self as u32
    }

    /// Whether a logger with threshold `self` renders records of `severity`.
    ///
    /// A [`Severity::None`] record is admitted by no threshold.
    pub fn admits(self, severity: Severity) -> bool {
        severity != Severity::None && severity <= self
    }

    /// Return the string representation of the `Severity`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
        }
    }

    /// The three letter label carried by records.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::None => "",
            Severity::Fatal => "FTL",
            Severity::Error => "ERR",
            Severity::Warn => "WRN",
            Severity::Info => "INF",
            Severity::Debug => "DBG",
            Severity::Trace => "TRC",
        }
    }

    /// The single letter label used by compact layouts.
    pub fn letter(&self) -> &'static str {
        match self {
            Severity::None => "",
            Severity::Fatal => "F",
            Severity::Error => "E",
            Severity::Warn => "W",
            Severity::Info => "I",
            Severity::Debug => "D",
            Severity::Trace => "T",
        }
    }

    /// Read a severity from the environment variable `name`.
    ///
    /// Return `default` if the variable is unset or cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use flexlog::Severity;
    ///
    /// let threshold = Severity::from_env_or("MY_APP_LOG_LEVEL", Severity::Info);
    /// ```
    pub fn from_env_or(name: &str, default: Severity) -> Severity {
        std::env::var(name)
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<u32> for Severity {
    type Error = Error;

    fn try_from(ordinal: u32) -> Result<Self, Error> {
        Severity::from_ordinal(ordinal).ok_or_else(|| {
            Error::invalid_argument("severity out of range").with_context("severity", ordinal)
        })
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Severity, Self::Err> {
        for (name, severity) in [
            ("none", Severity::None),
            ("off", Severity::None),
            ("fatal", Severity::Fatal),
            ("error", Severity::Error),
            ("warn", Severity::Warn),
            ("info", Severity::Info),
            ("debug", Severity::Debug),
            ("trace", Severity::Trace),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(severity);
            }
        }

        Err(Error::invalid_argument("malformed severity").with_context("severity", s))
    }
}
