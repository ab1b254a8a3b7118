use anyhow::Context;
use include_dir::{Dir, include_dir};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::RwLock;
use unic_langid::LanguageIdentifier;

pub type Map = BTreeMap<String, String>;

static OPWIZ_I18N: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/i18n/opwiz");
static CURRENT_LOCALE: Lazy<RwLock<String>> = Lazy::new(|| RwLock::new(initial_locale()));
static CATALOGS: Lazy<RwLock<BTreeMap<String, Map>>> = Lazy::new(|| RwLock::new(BTreeMap::new()));

#[cfg(not(test))]
fn initial_locale() -> String {
    select_locale(None)
}

#[cfg(test)]
fn initial_locale() -> String {
    "en".to_string()
}

pub fn select_locale(requested: Option<&str>) -> String {
    let supported = supported_locales();

    if let Some(requested) = requested
        && let Some(found) = resolve_supported(requested, &supported)
    {
        return found;
    }

    for env_key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(raw) = std::env::var(env_key)
            && let Some(found) = resolve_supported(&raw, &supported)
        {
            return found;
        }
    }

    if let Some(raw) = sys_locale::get_locale()
        && let Some(found) = resolve_supported(&raw, &supported)
    {
        return found;
    }

    "en".to_string()
}

pub fn set_locale(locale: impl Into<String>) {
    let locale = locale.into();
    let normalized = normalize_locale_tag(&locale).unwrap_or(locale);
    if let Ok(mut guard) = CURRENT_LOCALE.write() {
        *guard = normalized;
    }
}

pub fn current_locale() -> String {
    CURRENT_LOCALE
        .read()
        .map(|value| value.clone())
        .unwrap_or_else(|_| "en".to_string())
}

pub fn tr(key: &str, fallback: &str) -> String {
    tr_for_locale(key, fallback, &current_locale())
}

/// Translate and substitute each `{}` placeholder in order.
pub fn trf(key: &str, fallback: &str, args: &[&str]) -> String {
    let mut rendered = tr(key, fallback);
    for value in args {
        rendered = rendered.replacen("{}", value, 1);
    }
    rendered
}

pub fn tr_for_locale(key: &str, fallback: &str, locale: &str) -> String {
    if let Ok(cache) = CATALOGS.read()
        && let Some(map) = cache.get(locale)
    {
        return map
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.to_string());
    }
    match load_catalog(locale) {
        Ok(map) => {
            let value = map
                .get(key)
                .cloned()
                .unwrap_or_else(|| fallback.to_string());
            if let Ok(mut cache) = CATALOGS.write() {
                cache.insert(locale.to_string(), map);
            }
            value
        }
        Err(_) => fallback.to_string(),
    }
}

pub fn load_catalog(locale: &str) -> anyhow::Result<Map> {
    for candidate in locale_candidates(locale) {
        if let Some(file) = OPWIZ_I18N.get_file(&candidate) {
            let raw = file.contents_utf8().ok_or_else(|| {
                anyhow::anyhow!("opwiz i18n file is not valid UTF-8: {candidate}")
            })?;
            return serde_json::from_str(raw)
                .with_context(|| format!("parse embedded opwiz i18n map {candidate}"));
        }
    }
    Ok(Map::new())
}

fn locale_candidates(locale: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut push_candidate = |candidate: String| {
        if !out.iter().any(|existing| existing == &candidate) {
            out.push(candidate);
        }
    };
    let trimmed = locale.trim();
    if !trimmed.is_empty() {
        push_candidate(format!("{}.json", trimmed));
        if let Some(normalized) = normalize_locale_tag(trimmed)
            && let Some(base) = base_language(&normalized)
        {
            push_candidate(format!("{}.json", normalized));
            push_candidate(format!("{}.json", base));
        }
    }
    push_candidate("en.json".to_string());
    out
}

fn normalize_locale_tag(raw: &str) -> Option<String> {
    let mut cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Some((head, _)) = cleaned.split_once('.') {
        cleaned = head;
    }
    if let Some((head, _)) = cleaned.split_once('@') {
        cleaned = head;
    }
    if cleaned.eq_ignore_ascii_case("c") || cleaned.eq_ignore_ascii_case("posix") {
        return None;
    }
    let normalized = cleaned.replace('_', "-");
    normalized
        .parse::<LanguageIdentifier>()
        .ok()
        .map(|value| value.to_string())
}

fn base_language(tag: &str) -> Option<String> {
    tag.split('-')
        .next()
        .map(|value| value.to_ascii_lowercase())
}

fn resolve_supported(candidate: &str, supported: &[String]) -> Option<String> {
    let normalized = normalize_locale_tag(candidate)?;
    if supported.iter().any(|value| value == &normalized) {
        return Some(normalized);
    }
    let base = base_language(&normalized)?;
    if supported.iter().any(|value| value == &base) {
        return Some(base);
    }
    None
}

/// The supported locale `raw` resolves to, if any.
pub fn supported_locale(raw: &str) -> Option<String> {
    resolve_supported(raw, &supported_locales())
}

pub fn supported_locales() -> Vec<String> {
    let mut out = OPWIZ_I18N
        .files()
        .filter_map(|file| {
            file.path()
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".json"))
                .map(|name| name.to_string())
        })
        .collect::<Vec<_>>();
    out.sort();
    out.dedup();
    out
}
