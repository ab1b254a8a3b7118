use std::collections::BTreeSet;
use std::path::PathBuf;

fn load_keys(path: &PathBuf) -> BTreeSet<String> {
    let raw = std::fs::read_to_string(path).unwrap_or_else(|err| {
        panic!("failed to read {}: {err}", path.display());
    });
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap_or_else(|err| {
        panic!("failed to parse {}: {err}", path.display());
    });
    value
        .as_object()
        .unwrap_or_else(|| panic!("{} is not a JSON object", path.display()))
        .keys()
        .cloned()
        .collect()
}

#[test]
fn opwiz_catalogs_keep_same_key_set() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("i18n/opwiz");
    let base_keys = load_keys(&root.join("en.json"));

    for entry in std::fs::read_dir(&root).expect("read catalog dir") {
        let entry = entry.expect("read dir entry");
        let path = entry.path();
        if path.extension().and_then(|value| value.to_str()) != Some("json") {
            continue;
        }
        let keys = load_keys(&path);
        assert_eq!(
            keys,
            base_keys,
            "translation key mismatch for {}",
            path.display()
        );
    }
}
