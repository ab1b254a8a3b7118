//! Providers shipped with the binary. Each module exposes a `provider()`
//! constructor; [`register_builtin`] adds them all to a registry.

pub mod environment;
pub mod math;
pub mod text;

use tracing::warn;

use crate::settings::WizardSettings;
use crate::wizard::error::RegistrationError;
use crate::wizard::provider::Provider;
use crate::wizard::registry::{self, Registration, Registry};

pub fn builtin(settings: &WizardSettings) -> Vec<Result<Provider, RegistrationError>> {
    vec![
        environment::provider(settings.region().to_string()),
        math::provider(),
        text::provider(),
    ]
}

/// Register every built-in provider. Providers that fail to build are logged
/// and skipped.
pub fn register_builtin(registry: &mut Registry, settings: &WizardSettings) -> usize {
    register_with(settings, |provider| registry.register(provider))
}

/// Same as [`register_builtin`], against the process-wide registry.
pub fn register_builtin_global(settings: &WizardSettings) -> usize {
    register_with(settings, registry::register_global)
}

fn register_with(
    settings: &WizardSettings,
    mut register: impl FnMut(Provider) -> Registration,
) -> usize {
    let mut added = 0;
    for provider in builtin(settings) {
        match provider {
            Ok(provider) => {
                if register(provider) == Registration::Added {
                    added += 1;
                }
            }
            Err(err) => warn!(error = %err, "providers: skipping built-in provider"),
        }
    }
    added
}
