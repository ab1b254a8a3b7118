use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::wizard::error::RegistrationError;
use crate::wizard::provider::Provider;

static GLOBAL_REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// Result of a [`Registry::register`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Registration {
    Added,
    AlreadyRegistered,
    Rejected(RegistrationError),
}

/// Set of providers visible to the wizard. Grows monotonically; providers
/// are identified by name.
#[derive(Debug, Default)]
pub struct Registry {
    providers: BTreeMap<String, Arc<Provider>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: impl Into<Arc<Provider>>) -> Registration {
        let provider = provider.into();
        if !provider.has_operations() {
            let err = RegistrationError::NoOperations(provider.name().to_string());
            warn!(provider = provider.name(), error = %err, "registry: provider rejected");
            return Registration::Rejected(err);
        }
        if self.providers.contains_key(provider.name()) {
            debug!(provider = provider.name(), "registry: provider already registered");
            return Registration::AlreadyRegistered;
        }
        info!(
            provider = provider.name(),
            operations = provider.operations().len(),
            "registry: provider registered"
        );
        self.providers
            .insert(provider.name().to_string(), provider);
        Registration::Added
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            providers: self.providers.values().cloned().collect(),
        }
    }
}

/// Immutable view of the registered providers, sorted ascending by name.
#[derive(Clone, Debug, Default)]
pub struct RegistrySnapshot {
    providers: Vec<Arc<Provider>>,
}

impl RegistrySnapshot {
    pub fn providers(&self) -> &[Arc<Provider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Case-insensitive lookup by name or display name.
    pub fn find(&self, name: &str) -> Option<&Arc<Provider>> {
        let name = name.trim();
        self.providers.iter().find(|provider| {
            provider.name().eq_ignore_ascii_case(name)
                || provider.display_name().eq_ignore_ascii_case(name)
        })
    }
}

/// Register a provider with the process-wide registry.
pub fn register_global(provider: impl Into<Arc<Provider>>) -> Registration {
    match GLOBAL_REGISTRY.write() {
        Ok(mut registry) => registry.register(provider),
        Err(poisoned) => poisoned.into_inner().register(provider),
    }
}

pub fn global_snapshot() -> RegistrySnapshot {
    match GLOBAL_REGISTRY.read() {
        Ok(registry) => registry.snapshot(),
        Err(poisoned) => poisoned.into_inner().snapshot(),
    }
}
