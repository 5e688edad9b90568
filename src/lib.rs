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

//! Flexlog is a leveled, multi-sink logging facility with synchronous, blocking writes.
//!
//! # Overview
//!
//! Log calls go through a [`Registry`]: a fixed number of slots, each holding at most one
//! [`Logger`] with its own severity threshold. One lock guards the slots and the whole
//! fan-out of every record, so records from concurrent threads never interleave within a
//! logger's output.
//!
//! Without configuration, the call-site macros log to a default registry holding a console
//! logger that prints [`Severity::Info`] and more severe records.
//!
//! # Examples
//!
//! Simple setup with the default console logger:
//!
//! ```
//! flexlog::info!("This is an info message.");
//! ```
//!
//! A console showing warnings and a file capturing everything:
//!
//! ```
//! use flexlog::Severity;
//! use flexlog::logger::Console;
//! use flexlog::logger::File;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("app.log");
//! flexlog::builder()
//!     .logger(flexlog::PRIMARY, Console::default().with_threshold(Severity::Warn))
//!     .logger(flexlog::SECONDARY, File::new(path))
//!     .apply();
//!
//! flexlog::warn!("Warn message.");
//! flexlog::trace!("Trace message, file only.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod logger;
pub mod record;
pub mod trap;

mod clock;
mod error;
mod macros;
mod registry;
mod severity;

pub use self::clock::ClockMode;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::logger::Logger;
pub use self::record::CallSite;
pub use self::record::Record;
pub use self::registry::CONSOLE;
pub use self::registry::DEFAULT_SLOTS;
pub use self::registry::PRIMARY;
pub use self::registry::Registry;
pub use self::registry::RegistryBuilder;
pub use self::registry::SECONDARY;
pub use self::registry::builder;
pub use self::registry::default_registry;
pub use self::registry::set_default_registry;
pub use self::severity::Severity;

#[doc(hidden)]
pub use self::macros::__private;
