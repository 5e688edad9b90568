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

use crate::ClockMode;
use crate::Error;
use crate::ErrorKind;
use crate::logger::Logger;
use crate::logger::SetupArgs;
use crate::registry::DEFAULT_SLOTS;
use crate::registry::Registry;
use crate::registry::set_default_registry;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Create a new empty [`RegistryBuilder`] with [`DEFAULT_SLOTS`] slots.
///
/// # Examples
///
/// ```
/// use flexlog::logger::Console;
///
/// let registry = flexlog::builder()
///     .logger(flexlog::PRIMARY, Console::default())
///     .build()
///     .unwrap();
/// ```
pub fn builder() -> RegistryBuilder {
    RegistryBuilder::new()
}

/// A builder for configuring a [`Registry`] and optionally installing it as the default one.
///
/// # Examples
///
/// ```
/// use flexlog::ClockMode;
/// use flexlog::Severity;
/// use flexlog::logger::Console;
///
/// flexlog::builder()
///     .clock_mode(ClockMode::Realtime)
///     .logger(flexlog::PRIMARY, Console::default().with_threshold(Severity::Debug))
///     .apply();
/// ```
#[must_use = "call `build` to construct a registry or `apply` to install it as the default one"]
#[derive(Debug)]
pub struct RegistryBuilder<const N: usize = DEFAULT_SLOTS> {
    clock: ClockMode,
    trap: Box<dyn Trap>,
    // stashed registrations, run in order by `build`
    loggers: Vec<(usize, Box<dyn Logger>, SetupArgs)>,
}

impl RegistryBuilder {
    /// Create a builder for a registry with [`DEFAULT_SLOTS`] slots.
    ///
    /// Use `RegistryBuilder::<N>::default()` for a different capacity.
    pub fn new() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build the registry and install it as the default registry.
    ///
    /// # Errors
    ///
    /// Return an error if a logger fails to register, or [`ErrorKind::AlreadyInUse`] if the
    /// default registry has already been initialized. The built registry is dropped, tearing
    /// its loggers down.
    pub fn try_apply(self) -> Result<(), Error> {
        let registry = self.build()?;
        set_default_registry(registry).map_err(|_| {
            Error::new(
                ErrorKind::AlreadyInUse,
                "default logger registry is already initialized",
            )
        })
    }

    /// Build the registry and install it as the default registry.
    ///
    /// This should be called early in the execution of a program. Log calls made before
    /// initialization go to the built-in console registry instead.
    ///
    /// # Panics
    ///
    /// Panic if a logger fails to register or the default registry is already initialized.
    pub fn apply(self) {
        self.try_apply()
            .expect("RegistryBuilder::apply must be called before the default registry initialized");
    }
}

impl<const N: usize> Default for RegistryBuilder<N> {
    fn default() -> Self {
        Self {
            clock: ClockMode::default(),
            trap: Box::new(DefaultTrap::default()),
            loggers: vec![],
        }
    }
}

impl<const N: usize> RegistryBuilder<N> {
    /// Select the clock records are stamped with. Default to [`ClockMode::Monotonic`].
    pub fn clock_mode(mut self, clock: ClockMode) -> Self {
        self.clock = clock;
        self
    }

    /// Set the trap receiving internal failures. Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Register a logger into slot `index` with empty setup arguments.
    pub fn logger(self, index: usize, logger: impl Into<Box<dyn Logger>>) -> Self {
        self.logger_with_args(index, logger, SetupArgs::default())
    }

    /// Register a logger into slot `index`, passing `args` to its setup.
    pub fn logger_with_args(
        mut self,
        index: usize,
        logger: impl Into<Box<dyn Logger>>,
        args: SetupArgs,
    ) -> Self {
        self.loggers.push((index, logger.into(), args));
        self
    }

    /// Build the [`Registry`], running every stashed registration in order.
    ///
    /// # Errors
    ///
    /// Return the first registration error. Loggers registered before it are torn down.
    pub fn build(self) -> Result<Registry<N>, Error> {
        let RegistryBuilder {
            clock,
            trap,
            loggers,
        } = self;

        let registry = Registry::from_parts(clock, trap);
        for (index, logger, args) in loggers {
            registry.register(index, logger, &args)?;
        }
        Ok(registry)
    }
}
