use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use directories_next::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::wizard::execution::DEFAULT_MAX_PROMPT_ATTEMPTS;

pub const CONFIG_DIR_ENV: &str = "OPWIZ_CONFIG_DIR";
pub const DEFAULT_REGION: &str = "eu-west-2";

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ValueEnum, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WizardSettings {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub color: ColorMode,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default = "default_max_prompt_attempts")]
    pub max_prompt_attempts: u32,
    #[serde(default)]
    pub region: Option<String>,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            locale: None,
            color: ColorMode::Auto,
            log_level: None,
            max_prompt_attempts: DEFAULT_MAX_PROMPT_ATTEMPTS,
            region: None,
        }
    }
}

impl WizardSettings {
    pub fn region(&self) -> &str {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_REGION)
    }
}

fn default_max_prompt_attempts() -> u32 {
    DEFAULT_MAX_PROMPT_ATTEMPTS
}

pub fn load_settings() -> anyhow::Result<WizardSettings> {
    let path = settings_path()?;
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<WizardSettings> {
    if !path.exists() {
        return Ok(WizardSettings::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read settings {}", path.display()))?;
    let settings: WizardSettings = serde_yaml_bw::from_str(&contents)
        .with_context(|| format!("parse settings {}", path.display()))?;
    Ok(settings)
}

pub fn save_settings(settings: &WizardSettings) -> anyhow::Result<()> {
    let path = settings_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create settings dir {}", parent.display()))?;
    }
    let contents = serde_yaml_bw::to_string(settings)?;
    std::fs::write(&path, contents)
        .with_context(|| format!("write settings {}", path.display()))?;
    Ok(())
}

pub fn settings_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_DIR_ENV) {
        return Ok(Path::new(&value).join("settings.yaml"));
    }
    let dirs = ProjectDirs::from("", "opwiz", "opwiz")
        .ok_or_else(|| anyhow::anyhow!("unable to determine config directory"))?;
    Ok(dirs.config_dir().join("settings.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings: WizardSettings = serde_yaml_bw::from_str("locale: de\n").unwrap();
        assert_eq!(settings.locale.as_deref(), Some("de"));
        assert_eq!(settings.color, ColorMode::Auto);
        assert_eq!(settings.max_prompt_attempts, DEFAULT_MAX_PROMPT_ATTEMPTS);
        assert_eq!(settings.region(), DEFAULT_REGION);
    }

    #[test]
    fn explicit_region_wins() {
        let settings = WizardSettings {
            region: Some("us-east-1".into()),
            ..WizardSettings::default()
        };
        assert_eq!(settings.region(), "us-east-1");
    }

    #[test]
    fn load_from_missing_path_returns_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&temp.path().join("settings.yaml")).unwrap();
        assert_eq!(settings, WizardSettings::default());
    }

    #[test]
    fn color_mode_overrides() {
        assert!(ColorMode::Always.enabled());
        assert!(!ColorMode::Never.enabled());
    }
}
