use std::sync::Arc;

use indexmap::IndexMap;

use crate::operator_i18n;
use crate::wizard::commands::Command;
use crate::wizard::console::Palette;
use crate::wizard::error::WizardError;
use crate::wizard::provider::{Operation, Provider};
use crate::wizard::registry::RegistrySnapshot;

/// What selecting a menu entry leads to.
#[derive(Clone, Debug)]
pub enum MenuTarget {
    Provider(Arc<Provider>),
    Operation(Arc<Operation>),
    Command(Command),
}

#[derive(Clone, Debug)]
pub struct MenuEntry {
    pub key: String,
    pub name: String,
    pub help: String,
    pub target: MenuTarget,
}

/// Ordered mapping from selection key to entry; insertion order is display order.
#[derive(Clone, Debug)]
pub struct Menu {
    title: String,
    entries: IndexMap<String, MenuEntry>,
}

impl Menu {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn insert(&mut self, entry: MenuEntry) -> Result<(), WizardError> {
        if self.entries.contains_key(&entry.key) {
            return Err(WizardError::NavigationConsistency(format!(
                "duplicate key `{}` in menu `{}`",
                entry.key, self.title
            )));
        }
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&MenuEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line per entry with key, name and help column-aligned.
    pub fn render(&self, palette: Palette) -> Vec<String> {
        let key_width = self.entries.keys().map(|key| key.chars().count()).max();
        let name_width = self
            .entries
            .values()
            .map(|entry| entry.name.chars().count())
            .max();
        let (Some(key_width), Some(name_width)) = (key_width, name_width) else {
            return Vec::new();
        };
        self.entries
            .values()
            .map(|entry| {
                let key = palette.green(&format!("{:>key_width$}", entry.key));
                let name = format!("{:<name_width$}", entry.name);
                if entry.help.is_empty() {
                    format!("{key}: {}", name.trim_end())
                } else {
                    format!("{key}: {name}  {}", palette.light_purple(&entry.help))
                }
            })
            .collect()
    }
}

/// Builds top-level and per-provider menus, appending the control commands.
#[derive(Clone, Debug)]
pub struct MenuFactory {
    commands: Vec<Command>,
}

impl Default for MenuFactory {
    fn default() -> Self {
        Self::new(Command::ALL.to_vec())
    }
}

impl MenuFactory {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// One entry per provider, keyed `1..` in ascending name order.
    pub fn top_level(&self, snapshot: &RegistrySnapshot) -> Result<Menu, WizardError> {
        let mut providers = snapshot.providers().to_vec();
        providers.sort_by(|a, b| a.name().cmp(b.name()));

        let mut menu = Menu::new(operator_i18n::tr("wizard.menu.top_title", "Providers"));
        for (index, provider) in providers.into_iter().enumerate() {
            menu.insert(MenuEntry {
                key: (index + 1).to_string(),
                name: provider.display_name(),
                help: provider.help().to_string(),
                target: MenuTarget::Provider(provider),
            })?;
        }
        self.append_commands(&mut menu)?;
        Ok(menu)
    }

    /// One entry per operation, keyed as the provider assigned at registration.
    pub fn nested(&self, provider: &Provider) -> Result<Menu, WizardError> {
        if !provider.has_operations() {
            return Err(WizardError::NavigationConsistency(format!(
                "provider `{}` reached the menu without operations",
                provider.name()
            )));
        }
        let mut menu = Menu::new(provider.display_name());
        for entry in provider.operations() {
            menu.insert(MenuEntry {
                key: entry.key.clone(),
                name: entry.operation.display_name(),
                help: entry.operation.help().to_string(),
                target: MenuTarget::Operation(entry.operation.clone()),
            })?;
        }
        self.append_commands(&mut menu)?;
        Ok(menu)
    }

    fn append_commands(&self, menu: &mut Menu) -> Result<(), WizardError> {
        for command in &self.commands {
            menu.insert(MenuEntry {
                key: command.key().to_string(),
                name: command.name().to_string(),
                help: command.help(),
                target: MenuTarget::Command(*command),
            })?;
        }
        Ok(())
    }
}
