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


use crate::Error;
use crate::ErrorKind;
use crate::Registry;
use crate::Severity;
use crate::default_registry;
use crate::record::CallSite;

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

/// A [`log::Log`] implementation forwarding `log` crate records into a [`Registry`].
///
/// Records from the `log` crate carry no function name; the module path stands in for it.
#[derive(Debug)]
pub struct LogBridge<const N: usize> {
    registry: &'static Registry<N>,
}

impl<const N: usize> LogBridge<N> {
    /// Create a bridge into `registry`.
    pub fn new(registry: &'static Registry<N>) -> Self {
        Self { registry }
    }
}

impl<const N: usize> log::Log for LogBridge<N> {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.registry.is_printable(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        forward(self.registry, record);
    }

    fn flush(&self) {
        self.registry.flush();
    }
}

// resolves the default registry on every call so it may be installed after the bridge
struct DefaultRegistryProxy(());

impl log::Log for DefaultRegistryProxy {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        default_registry().is_printable(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        forward(default_registry(), record);
    }

    fn flush(&self) {
        default_registry().flush();
    }
}

fn forward<const N: usize>(registry: &Registry<N>, record: &log::Record) {
    let module_path = record.module_path_static().unwrap_or_default();
    let callsite = CallSite::new(
        module_path,
        module_path,
        record.file_static().unwrap_or_default(),
        record.line().unwrap_or_default(),
    );
    registry.emit(record.level().into(), callsite, *record.args());
}

fn set_logger_error(err: log::SetLoggerError) -> Error {
    Error::new(
        ErrorKind::AlreadyInUse,
        "log crate global logger is already set",
    )
    .with_source(err)
}

/// Set up the log crate global logger to forward into the [default registry](default_registry).
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return [`ErrorKind::AlreadyInUse`] if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// if flexlog::bridge::try_setup_log_crate().is_err() {
///     eprintln!("failed to set up the log crate bridge");
/// }
/// log::info!("forwarded to flexlog");
/// ```
pub fn try_setup_log_crate() -> Result<(), Error> {
    static PROXY: DefaultRegistryProxy = DefaultRegistryProxy(());
    log::set_logger(&PROXY).map_err(set_logger_error)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger to forward into `registry`.
///
/// # Errors
///
/// Return [`ErrorKind::AlreadyInUse`] if the log crate global logger has already been set.
pub fn try_setup_log_crate_with<const N: usize>(registry: &'static Registry<N>) -> Result<(), Error> {
    log::set_boxed_logger(Box::new(LogBridge::new(registry))).map_err(set_logger_error)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger to forward into the [default registry](default_registry).
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "flexlog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}
