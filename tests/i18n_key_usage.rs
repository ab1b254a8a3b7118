use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

fn en_keys() -> BTreeSet<String> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("i18n/opwiz/en.json");
    let raw = std::fs::read_to_string(root).expect("read en catalog");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse en catalog");
    value
        .as_object()
        .expect("catalog object")
        .keys()
        .cloned()
        .collect()
}

fn rust_files_under(path: &str) -> Vec<PathBuf> {
    fn walk(dir: &PathBuf, out: &mut Vec<PathBuf>) {
        let entries = fs::read_dir(dir).unwrap_or_else(|err| panic!("read_dir {dir:?}: {err}"));
        for entry in entries {
            let entry = entry.unwrap_or_else(|err| panic!("read_dir entry {dir:?}: {err}"));
            let path = entry.path();
            if path.is_dir() {
                walk(&path, out);
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }

    let mut files = Vec::new();
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path);
    walk(&root, &mut files);
    files
}

#[test]
fn i18n_keys_used_in_code_exist_in_catalog() {
    let keys = en_keys();
    let mut seen = 0;
    for path in rust_files_under("src") {
        let source_file = path
            .strip_prefix(PathBuf::from(env!("CARGO_MANIFEST_DIR")))
            .unwrap_or(&path)
            .display()
            .to_string();
        let src = std::fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("read {}: {err}", path.display()));
        for pattern in ["operator_i18n::tr(", "operator_i18n::trf("] {
            for cap in src.match_indices(pattern) {
                let rest = src[cap.0 + pattern.len()..].trim_start();
                let Some(rest) = rest.strip_prefix('"') else {
                    continue;
                };
                if let Some(end) = rest.find('"') {
                    let key = &rest[..end];
                    if key.starts_with("wizard.missing") {
                        continue;
                    }
                    seen += 1;
                    assert!(
                        keys.contains(key),
                        "missing i18n key in opwiz/en.json from {source_file}: {key}"
                    );
                }
            }
        }
    }
    assert!(seen > 0, "no translated strings found under src/");
}
