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

use std::sync::OnceLock;

use crate::registry::Registry;

static DEFAULT_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Return the process-wide registry the call-site macros use when none is given.
///
/// If no registry has been installed with [`set_default_registry`] or
/// [`RegistryBuilder::apply`](crate::RegistryBuilder::apply), the first call installs
/// [`Registry::with_console`].
pub fn default_registry() -> &'static Registry {
    DEFAULT_REGISTRY.get_or_init(Registry::with_console)
}

/// Install the process-wide default registry.
///
/// The default registry lives until the process exits; its loggers are never torn down.
///
/// # Errors
///
/// Return the argument back if the default registry has already been initialized, either by
/// an earlier call or by a log call that used [`default_registry`].
pub fn set_default_registry(registry: Registry) -> Result<(), Registry> {
    DEFAULT_REGISTRY.set(registry)
}
