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

//! The fixed-capacity logger registry and the dispatch pipeline.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::ClockMode;
use crate::Error;
use crate::ErrorKind;
use crate::Severity;
use crate::logger::Console;
use crate::logger::Logger;
use crate::logger::SetupArgs;
use crate::record::CallSite;
use crate::record::Record;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

mod builder;
mod global;

pub use self::builder::RegistryBuilder;
pub use self::builder::builder;
pub use self::global::default_registry;
pub use self::global::set_default_registry;

/// The number of slots of a [`Registry`] unless chosen otherwise.
pub const DEFAULT_SLOTS: usize = 2;

/// The first slot.
pub const PRIMARY: usize = 0;

/// The slot the default registry installs its console logger in.
pub const CONSOLE: usize = PRIMARY;

/// The second slot.
pub const SECONDARY: usize = 1;

const EXIT_FAILURE: i32 = 1;

thread_local! {
    // registries whose lock the current thread holds
    static HELD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

#[derive(Debug)]
struct Slot {
    threshold: Severity,
    logger: Box<dyn Logger>,
}

#[derive(Debug)]
struct State<const N: usize> {
    slots: [Option<Slot>; N],
    clock: ClockMode,
}

struct Locked<'a, const N: usize> {
    guard: MutexGuard<'a, State<N>>,
    key: usize,
}

impl<const N: usize> Deref for Locked<'_, N> {
    type Target = State<N>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<const N: usize> DerefMut for Locked<'_, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<const N: usize> Drop for Locked<'_, N> {
    fn drop(&mut self) {
        let _ = HELD.try_with(|held| held.borrow_mut().retain(|key| *key != self.key));
    }
}

/// A fixed-capacity set of loggers sharing one lock.
///
/// The lock guards every slot, the clock mode, and the whole fan-out of each record, so
/// records from concurrent threads never interleave within a logger's output, and every
/// record sees one consistent set of slots and thresholds.
///
/// `N` is the number of slots. It defaults to [`DEFAULT_SLOTS`].
///
/// # Examples
///
/// ```
/// use flexlog::Registry;
/// use flexlog::Severity;
/// use flexlog::logger::Console;
/// use flexlog::logger::SetupArgs;
///
/// let registry = Registry::new();
/// registry
///     .register(flexlog::PRIMARY, Console::default(), &SetupArgs::default())
///     .unwrap();
/// registry.set_threshold(flexlog::PRIMARY, Severity::Debug).unwrap();
///
/// flexlog::debug!(registry: &registry, "{} slots in use", 1);
/// ```
pub struct Registry<const N: usize = DEFAULT_SLOTS> {
    state: Mutex<State<N>>,
    // lock-free copy of every slot's threshold for `is_printable`; `None` marks an empty slot
    admission: [AtomicU8; N],
    trap: Box<dyn Trap>,
}

impl<const N: usize> fmt::Debug for Registry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("state", &self.state)
            .field("trap", &self.trap)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an empty registry with [`DEFAULT_SLOTS`] slots.
    ///
    /// Use `Registry::<N>::default()` for a different capacity.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Create a [`RegistryBuilder`] for a registry with [`DEFAULT_SLOTS`] slots.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Create a registry holding one colored [`Console`] logger with threshold
    /// [`Severity::Info`] in the [`CONSOLE`] slot.
    pub fn with_console() -> Registry {
        let registry = Registry::new();
        let registered = registry.register(CONSOLE, Console::default(), &SetupArgs::default());
        debug_assert!(registered.is_ok(), "a fresh registry accepts the console logger");
        registry
    }
}

impl<const N: usize> Default for Registry<N> {
    fn default() -> Self {
        Self::from_parts(ClockMode::default(), Box::new(DefaultTrap::default()))
    }
}

impl<const N: usize> Registry<N> {
    fn from_parts(clock: ClockMode, trap: Box<dyn Trap>) -> Self {
        Self {
            state: Mutex::new(State {
                slots: std::array::from_fn(|_| None),
                clock,
            }),
            admission: std::array::from_fn(|_| AtomicU8::new(Severity::None as u8)),
            trap,
        }
    }

    /// The number of slots.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Store a logger in an empty slot.
    ///
    /// The logger's [`setup`](Logger::setup) runs under the registry lock. On success the slot
    /// takes the logger's initial [`threshold`](Logger::threshold).
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::InvalidArgument`] if `index` is out of bounds.
    /// * [`ErrorKind::AlreadyInUse`] if the slot is occupied; setup is not run.
    /// * Whatever setup returns; the slot stays empty.
    pub fn register(
        &self,
        index: usize,
        logger: impl Into<Box<dyn Logger>>,
        args: &SetupArgs,
    ) -> Result<(), Error> {
        self.check_index(index)?;
        let mut logger = logger.into();
        let mut state = self.lock().map_err(|err| self.report(err))?;

        if state.slots[index].is_some() {
            return Err(self.report(
                Error::new(ErrorKind::AlreadyInUse, "logger slot is occupied")
                    .with_context("index", index),
            ));
        }

        logger
            .setup(args)
            .map_err(|err| self.report(err.with_context("index", index)))?;

        let threshold = logger.threshold();
        state.slots[index] = Some(Slot { threshold, logger });
        self.admission[index].store(threshold as u8, Ordering::Relaxed);
        Ok(())
    }

    /// Remove the logger from a slot, running its [`teardown`](Logger::teardown).
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::InvalidArgument`] if `index` is out of bounds.
    /// * [`ErrorKind::NotInitialized`] if the slot is empty; nothing is torn down.
    /// * Whatever teardown returns; the slot is cleared regardless.
    pub fn unregister(&self, index: usize) -> Result<(), Error> {
        self.check_index(index)?;
        let mut state = self.lock().map_err(|err| self.report(err))?;

        let Some(mut slot) = state.slots[index].take() else {
            return Err(self.report(not_initialized(index)));
        };
        self.admission[index].store(Severity::None as u8, Ordering::Relaxed);

        slot.logger
            .teardown()
            .map_err(|err| self.report(err.with_context("index", index)))
    }

    /// Change the threshold of an occupied slot.
    ///
    /// `threshold` is a [`Severity`] or anything convertible to one, such as a raw `u32`
    /// ordinal.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::InvalidArgument`] if `index` or `threshold` is out of range.
    /// * [`ErrorKind::NotInitialized`] if the slot is empty.
    pub fn set_threshold<T>(&self, index: usize, threshold: T) -> Result<(), Error>
    where
        T: TryInto<Severity>,
        T::Error: Into<Error>,
    {
        self.check_index(index)?;
        let threshold = threshold
            .try_into()
            .map_err(|err| self.report(err.into()))?;
        let mut state = self.lock().map_err(|err| self.report(err))?;

        let Some(slot) = state.slots[index].as_mut() else {
            return Err(self.report(not_initialized(index)));
        };
        slot.threshold = threshold;
        self.admission[index].store(threshold as u8, Ordering::Relaxed);
        Ok(())
    }

    /// Return the threshold of an occupied slot.
    ///
    /// # Errors
    ///
    /// Fail like [`set_threshold`](Registry::set_threshold) on a bad or empty slot.
    pub fn threshold(&self, index: usize) -> Result<Severity, Error> {
        self.check_index(index)?;
        let state = self.lock().map_err(|err| self.report(err))?;
        match state.slots[index].as_ref() {
            Some(slot) => Ok(slot.threshold),
            None => Err(self.report(not_initialized(index))),
        }
    }

    /// Whether the slot holds a logger. `false` for an out-of-bounds index.
    pub fn is_occupied(&self, index: usize) -> bool {
        index < N
            && self
                .lock()
                .map(|state| state.slots[index].is_some())
                .unwrap_or(false)
    }

    /// Select the clock records are stamped with.
    ///
    /// `mode` is a [`ClockMode`] or anything convertible to one, such as `"realtime"` or a raw
    /// `u32`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidArgument`] if `mode` names no clock; the previous mode stays in
    /// effect.
    pub fn set_clock_mode<M>(&self, mode: M) -> Result<(), Error>
    where
        M: TryInto<ClockMode>,
        M::Error: Into<Error>,
    {
        let mode = mode.try_into().map_err(|err| self.report(err.into()))?;
        let mut state = self.lock().map_err(|err| self.report(err))?;
        state.clock = mode;
        Ok(())
    }

    /// Return the selected clock mode.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::LockFailure`] if called from a logger of this registry.
    pub fn clock_mode(&self) -> Result<ClockMode, Error> {
        let state = self.lock().map_err(|err| self.report(err))?;
        Ok(state.clock)
    }

    /// Render the current time with the selected clock.
    ///
    /// Blank if the clock can't be read.
    pub fn now_string(&self) -> String {
        match self.lock() {
            Ok(state) => self.timestamp(state.clock),
            Err(err) => {
                self.trap.trap(&err);
                String::new()
            }
        }
    }

    /// Whether any registered logger would render a record of `severity`.
    ///
    /// This reads the thresholds without taking the lock, so it may race with concurrent
    /// threshold changes. The admission test is repeated under the lock when the record is
    /// dispatched, so the race only decides whether formatting work is wasted or skipped.
    pub fn is_printable(&self, severity: Severity) -> bool {
        let severity = severity as u8;
        severity != Severity::None as u8
            && (0..N).any(|index| severity <= self.admission_of(index))
    }

    /// Dispatch one log call to every admitting logger.
    ///
    /// Never fails visibly: a blank timestamp or message, a nested emission or a failing logger
    /// is reported to the trap instead. A [`Severity::Fatal`] record terminates the process
    /// once every admitting logger has rendered it and all loggers are flushed.
    pub fn emit(&self, severity: Severity, callsite: CallSite, args: fmt::Arguments<'_>) {
        self.dispatch(severity, callsite, args);
        if severity == Severity::Fatal {
            self.terminate();
        }
    }

    /// Dispatch a [`Severity::Fatal`] record and terminate the process.
    ///
    /// The process exits with a failure status even if no logger admits the record.
    pub fn fatal(&self, callsite: CallSite, args: fmt::Arguments<'_>) -> ! {
        self.dispatch(Severity::Fatal, callsite, args);
        self.terminate()
    }

    /// Flush every registered logger.
    pub fn flush(&self) {
        let state = match self.lock() {
            Ok(state) => state,
            Err(err) => return self.trap.trap(&err),
        };
        for slot in state.slots.iter().flatten() {
            if let Err(err) = slot.logger.flush() {
                self.trap.trap(&err);
            }
        }
    }

    fn dispatch(&self, severity: Severity, callsite: CallSite, args: fmt::Arguments<'_>) {
        if !self.is_printable(severity) {
            return;
        }

        let mut message = String::new();
        if let Err(err) = fmt::write(&mut message, args) {
            let err = Error::from_fmt_error(err).with_context("callsite", callsite_of(&callsite));
            self.trap.trap(&err);
            message.clear();
        }

        let state = match self.lock() {
            Ok(state) => state,
            Err(err) => {
                return self
                    .trap
                    .trap(&err.with_context("callsite", callsite_of(&callsite)));
            }
        };

        let record = Record::builder()
            .time(self.timestamp(state.clock))
            .severity(severity)
            .callsite(callsite)
            .message(message)
            .build();

        for (index, slot) in state.slots.iter().enumerate() {
            let Some(slot) = slot else { continue };
            if !slot.threshold.admits(severity) {
                continue;
            }
            if let Err(err) = slot.logger.render(&record) {
                self.trap.trap(&err.with_context("index", index));
            }
        }
    }

    fn terminate(&self) -> ! {
        self.flush();
        std::process::exit(EXIT_FAILURE)
    }

    fn timestamp(&self, clock: ClockMode) -> String {
        clock.now_string().unwrap_or_else(|err| {
            self.trap.trap(&err);
            String::new()
        })
    }

    fn admission_of(&self, index: usize) -> u8 {
        self.admission[index].load(Ordering::Relaxed)
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index < N {
            return Ok(());
        }
        Err(self.report(
            Error::invalid_argument("logger slot index out of bounds")
                .with_context("index", index)
                .with_context("capacity", N),
        ))
    }

    fn lock(&self) -> Result<Locked<'_, N>, Error> {
        let key = std::ptr::from_ref(self) as usize;
        // the guard is gone while thread-locals are destroyed; nothing can be held then
        let reentered = HELD
            .try_with(|held| held.borrow().contains(&key))
            .unwrap_or(false);
        if reentered {
            return Err(Error::new(
                ErrorKind::LockFailure,
                "logger registry used again while its lock is held by this thread",
            ));
        }

        // slots are only written outside of logger calls, so a poisoned state is consistent
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = HELD.try_with(|held| held.borrow_mut().push(key));
        Ok(Locked { guard, key })
    }

    fn report(&self, err: Error) -> Error {
        self.trap.trap(&err);
        err
    }
}

impl<const N: usize> Drop for Registry<N> {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for (index, slot) in state.slots.iter_mut().enumerate() {
            if let Some(mut slot) = slot.take() {
                if let Err(err) = slot.logger.teardown() {
                    self.trap.trap(&err.with_context("index", index));
                }
            }
        }
    }
}

fn not_initialized(index: usize) -> Error {
    Error::new(ErrorKind::NotInitialized, "logger slot is empty").with_context("index", index)
}

fn callsite_of(callsite: &CallSite) -> String {
    format!("{}():{}", callsite.function(), callsite.line())
}
