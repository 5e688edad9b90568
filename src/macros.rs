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

//! Call-site macros.
//!
//! Every macro accepts an optional leading `registry: <expr>,` naming the
//! [`Registry`](crate::Registry) to log to; otherwise the
//! [default registry](crate::default_registry) is used.

/// Capture the [`CallSite`](crate::CallSite) of the macro invocation.
///
/// # Examples
///
/// ```
/// fn connect() -> flexlog::CallSite {
///     flexlog::callsite!()
/// }
///
/// assert_eq!(connect().function(), "connect");
/// ```
#[macro_export]
macro_rules! callsite {
    () => {
        $crate::CallSite::new(
            $crate::__function_name!(),
            ::std::module_path!(),
            ::std::file!(),
            ::std::line!(),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __f() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::__private::function_name(__type_name_of(__f))
    }};
}

/// Log a message at the given severity.
///
/// The message is only formatted if some registered logger admits the severity.
/// [`Severity::Fatal`](crate::Severity::Fatal) terminates the process once the record is
/// delivered.
///
/// # Examples
///
/// ```
/// use flexlog::Severity;
///
/// let registry = flexlog::Registry::with_console();
/// flexlog::log!(registry: &registry, Severity::Warn, "disk {}% full", 91);
/// ```
#[macro_export]
macro_rules! log {
    (registry: $registry:expr, $severity:expr, $($arg:tt)+) => {{
        let registry = $registry;
        let severity: $crate::Severity = $severity;
        if registry.is_printable(severity) {
            registry.emit(severity, $crate::callsite!(), ::std::format_args!($($arg)+));
        }
    }};
    ($severity:expr, $($arg:tt)+) => {
        $crate::log!(registry: $crate::default_registry(), $severity, $($arg)+)
    };
}

/// Log a fatal message and terminate the process with a failure status.
///
/// Every admitting logger renders the record, and all loggers are flushed, before the process
/// exits. The process exits even if no logger admits fatal records. Never returns.
#[macro_export]
macro_rules! fatal {
    (registry: $registry:expr, $($arg:tt)+) => {
        $registry.fatal($crate::callsite!(), ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::fatal!(registry: $crate::default_registry(), $($arg)+)
    };
}

/// Log an error message.
///
/// # Examples
///
/// ```
/// let registry = flexlog::Registry::with_console();
/// flexlog::error!(registry: &registry, "failed to bind {}", "0.0.0.0:80");
/// ```
#[macro_export]
macro_rules! error {
    (registry: $registry:expr, $($arg:tt)+) => {
        $crate::log!(registry: $registry, $crate::Severity::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Error, $($arg)+)
    };
}

/// Log a warning message.
#[macro_export]
macro_rules! warn {
    (registry: $registry:expr, $($arg:tt)+) => {
        $crate::log!(registry: $registry, $crate::Severity::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Warn, $($arg)+)
    };
}

/// Log an informational message.
///
/// # Examples
///
/// ```
/// flexlog::info!("listening on port {}", 8080);
/// ```
#[macro_export]
macro_rules! info {
    (registry: $registry:expr, $($arg:tt)+) => {
        $crate::log!(registry: $registry, $crate::Severity::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Info, $($arg)+)
    };
}

/// Log a debug message.
#[macro_export]
macro_rules! debug {
    (registry: $registry:expr, $($arg:tt)+) => {
        $crate::log!(registry: $registry, $crate::Severity::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Debug, $($arg)+)
    };
}

/// Log a trace message.
#[macro_export]
macro_rules! trace {
    (registry: $registry:expr, $($arg:tt)+) => {
        $crate::log!(registry: $registry, $crate::Severity::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Trace, $($arg)+)
    };
}

#[doc(hidden)]
pub mod __private {
    /// Turn the type name of a function item nested in `f` into the name of `f`.
    pub fn function_name(type_name: &'static str) -> &'static str {
        let mut name = type_name.strip_suffix("::__f").unwrap_or(type_name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name.rsplit("::").next().unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::__private::function_name;

    #[test]
    fn test_function_name() {
        assert_eq!(function_name("app::net::connect::__f"), "connect");
        assert_eq!(
            function_name("app::main::{{closure}}::{{closure}}::__f"),
            "main"
        );
        assert_eq!(function_name("main::__f"), "main");
    }

    #[test]
    fn test_callsite_captures_enclosing_function() {
        let callsite = crate::callsite!();
        assert_eq!(callsite.function(), "test_callsite_captures_enclosing_function");
        assert_eq!(callsite.file(), file!());
        assert_eq!(callsite.module_path(), module_path!());
        assert!(callsite.line() > 0);

        let from_closure = (|| crate::callsite!())();
        assert_eq!(
            from_closure.function(),
            "test_callsite_captures_enclosing_function"
        );
    }
}
