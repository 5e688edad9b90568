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

//! Timestamp rendering for log records.

use std::fmt;
use std::fmt::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;
use std::time::SystemTime;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::ErrorKind;

const WALL_CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// The clock a registry stamps its records with.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum ClockMode {
    /// Seconds and microseconds elapsed since a process-local origin, e.g. `12.000345`.
    ///
    /// Not comparable across processes.
    #[default]
    Monotonic = 0,
    /// Local wall-clock time, e.g. `2024-08-11 22:44:57+0800`.
    Realtime = 1,
}

impl ClockMode {
    /// Return the string representation of the `ClockMode`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockMode::Monotonic => "monotonic",
            ClockMode::Realtime => "realtime",
        }
    }

    /// Render the current time in this mode.
    ///
    /// # Errors
    ///
    /// Return an error if the underlying clock cannot be read or rendered. Callers stamping a
    /// record fall back to a blank timestamp.
    pub fn now_string(self) -> Result<String, Error> {
        match self {
            ClockMode::Monotonic => Ok(monotonic_now()),
            ClockMode::Realtime => wall_clock_now(),
        }
    }
}

impl fmt::Display for ClockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<u32> for ClockMode {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ClockMode::Monotonic),
            1 => Ok(ClockMode::Realtime),
            _ => Err(Error::invalid_argument("unknown clock mode").with_context("mode", value)),
        }
    }
}

impl TryFrom<&str> for ClockMode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for ClockMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for (name, mode) in [
            ("monotonic", ClockMode::Monotonic),
            ("realtime", ClockMode::Realtime),
            ("wallclock", ClockMode::Realtime),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(mode);
            }
        }

        Err(Error::invalid_argument("unknown clock mode").with_context("mode", s))
    }
}

fn monotonic_now() -> String {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();

    let elapsed = ORIGIN.get_or_init(Instant::now).elapsed();
    format!("{}.{:06}", elapsed.as_secs(), elapsed.subsec_micros())
}

fn wall_clock_now() -> Result<String, Error> {
    let ts = Timestamp::try_from(SystemTime::now()).map_err(|err| {
        Error::new(ErrorKind::ClockFailure, "failed to read the system clock").with_source(err)
    })?;
    let zoned = ts.to_zoned(TimeZone::system());

    let mut text = String::with_capacity(24);
    write!(&mut text, "{}", zoned.strftime(WALL_CLOCK_FORMAT)).map_err(Error::from_fmt_error)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_format() {
        let text = ClockMode::Monotonic.now_string().unwrap();
        let (secs, micros) = text.split_once('.').unwrap();
        assert!(secs.chars().all(|c| c.is_ascii_digit()), "{text}");
        assert_eq!(micros.len(), 6, "{text}");
        assert!(micros.chars().all(|c| c.is_ascii_digit()), "{text}");
    }

    #[test]
    fn test_monotonic_never_goes_backwards() {
        let parse = |s: String| s.parse::<f64>().unwrap();
        let first = parse(ClockMode::Monotonic.now_string().unwrap());
        let second = parse(ClockMode::Monotonic.now_string().unwrap());
        assert!(second >= first);
    }

    #[test]
    fn test_wall_clock_format() {
        let text = ClockMode::Realtime.now_string().unwrap();
        // YYYY-MM-DD HH:MM:SS+ZZZZ
        assert_eq!(text.len(), 24, "{text}");
        assert_eq!(&text[4..5], "-");
        assert_eq!(&text[10..11], " ");
        assert_eq!(&text[13..14], ":");
        assert!(matches!(&text[19..20], "+" | "-"), "{text}");
    }

    #[test]
    fn test_parse() {
        assert_eq!(ClockMode::try_from(1).unwrap(), ClockMode::Realtime);
        assert_eq!("Monotonic".parse::<ClockMode>().unwrap(), ClockMode::Monotonic);
        assert_eq!(
            "sundial".parse::<ClockMode>().unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert!(ClockMode::try_from(7).is_err());
    }
}
