use std::sync::{Mutex, OnceLock};

use opwiz::settings::{
    CONFIG_DIR_ENV, ColorMode, WizardSettings, load_settings, save_settings, settings_path,
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

#[test]
fn load_settings_defaults_when_missing() {
    let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
    let temp = tempfile::tempdir().unwrap();
    unsafe {
        std::env::set_var(CONFIG_DIR_ENV, temp.path());
    }
    let settings = load_settings().unwrap();
    assert_eq!(settings, WizardSettings::default());
    assert_eq!(settings.max_prompt_attempts, 10);
    unsafe {
        std::env::remove_var(CONFIG_DIR_ENV);
    }
}

#[test]
fn save_and_load_settings_roundtrip() {
    let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
    let temp = tempfile::tempdir().unwrap();
    unsafe {
        std::env::set_var(CONFIG_DIR_ENV, temp.path().join("nested"));
    }
    let settings = WizardSettings {
        locale: Some("de".into()),
        color: ColorMode::Never,
        log_level: Some("debug".into()),
        max_prompt_attempts: 0,
        region: Some("us-west-2".into()),
    };
    save_settings(&settings).unwrap();
    assert!(settings_path().unwrap().exists());

    let loaded = load_settings().unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.region(), "us-west-2");
    unsafe {
        std::env::remove_var(CONFIG_DIR_ENV);
    }
}

#[test]
fn malformed_settings_file_is_an_error() {
    let _guard = ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap();
    let temp = tempfile::tempdir().unwrap();
    unsafe {
        std::env::set_var(CONFIG_DIR_ENV, temp.path());
    }
    std::fs::write(temp.path().join("settings.yaml"), "color: sometimes\n").unwrap();
    let err = load_settings().unwrap_err();
    assert!(format!("{err:#}").contains("parse settings"));
    unsafe {
        std::env::remove_var(CONFIG_DIR_ENV);
    }
}
