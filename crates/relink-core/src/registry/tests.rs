use super::*;
use std::fs;
use tempfile::tempdir;

const SAMPLE: &str = r#"{
  "zeta": {
    "name": "Zeta",
    "url": "https://zeta.example/"
  },
  "alpha": {
    "name": "Alpha",
    "url": "https://alpha.example/app",
    "logo": "alpha.png",
    "tags": [
      "a",
      "b"
    ]
  }
}"#;

#[test]
fn load_keeps_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("providers.json");
    fs::write(&path, SAMPLE).unwrap();

    let reg = Registry::load(&path).unwrap();
    let keys: Vec<&str> = reg.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["zeta", "alpha"]);
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.get("alpha").unwrap().name, "Alpha");
    assert_eq!(reg.path(), path.as_path());
}

#[test]
fn unchanged_registry_serializes_identically() {
    let reg = Registry::parse(Path::new("p.json"), SAMPLE).unwrap();
    assert_eq!(reg.to_json_string().unwrap(), SAMPLE);
}

#[test]
fn set_url_touches_only_url() {
    let mut reg = Registry::parse(Path::new("p.json"), SAMPLE).unwrap();
    let old = reg.set_url("alpha", "https://alpha.new/app");
    assert_eq!(old.as_deref(), Some("https://alpha.example/app"));
    assert!(reg.set_url("missing", "https://x.example/").is_none());

    let alpha = reg.get("alpha").unwrap();
    assert_eq!(alpha.url, "https://alpha.new/app");
    assert_eq!(alpha.name, "Alpha");
    let record = reg.record("alpha").unwrap();
    assert_eq!(record["url"], "https://alpha.new/app");
    assert_eq!(record["logo"], "alpha.png");
    assert_eq!(record["tags"], serde_json::json!(["a", "b"]));
}

#[test]
fn save_writes_valid_json_and_keeps_trailing_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("providers.json");
    fs::write(&path, format!("{SAMPLE}\n")).unwrap();

    let mut reg = Registry::load(&path).unwrap();
    reg.set_url("zeta", "https://zeta.new/");
    reg.save().unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.ends_with("}\n"));
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["zeta"]["url"], "https://zeta.new/");
    assert_eq!(value["alpha"]["logo"], "alpha.png");
    assert!(written.starts_with("{\n  \"zeta\": {\n    \"name\": \"Zeta\","));

    // Only the registry itself is left in the directory.
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn save_without_trailing_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("providers.json");
    fs::write(&path, SAMPLE).unwrap();

    let reg = Registry::load(&path).unwrap();
    reg.save().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn empty_object_is_an_empty_registry() {
    let reg = Registry::parse(Path::new("p.json"), "{}").unwrap();
    assert!(reg.is_empty());
    assert_eq!(reg.to_json_string().unwrap(), "{}");
}

#[test]
fn missing_file() {
    let dir = tempdir().unwrap();
    let err = Registry::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }));
}

#[test]
fn invalid_json() {
    let err = Registry::parse(Path::new("p.json"), "{ \"a\": ").unwrap_err();
    assert!(matches!(err, RegistryError::InvalidJson { .. }));
}

#[test]
fn top_level_must_be_object() {
    let err = Registry::parse(Path::new("p.json"), "[]").unwrap_err();
    assert!(matches!(err, RegistryError::NotAnObject { .. }));
}

#[test]
fn unusable_records_are_kept_but_not_offered() {
    let text = r#"{
  "bad": {
    "name": "NoUrl"
  },
  "numeric": {
    "name": "Numeric",
    "url": 42
  },
  "scalar": "just a string",
  "good": {
    "name": "Good",
    "url": "https://good.example/"
  }
}"#;
    let mut reg = Registry::parse(Path::new("p.json"), text).unwrap();
    assert_eq!(reg.len(), 4);

    let usable: Vec<&str> = reg.iter().map(|(k, _)| k).collect();
    assert_eq!(usable, ["good"]);
    let unusable: Vec<&str> = reg
        .records()
        .filter(|(_, parsed)| parsed.is_err())
        .map(|(k, _)| k)
        .collect();
    assert_eq!(unusable, ["bad", "numeric", "scalar"]);
    assert!(reg.get("bad").is_none());
    assert!(reg.set_url("bad", "https://x.example/").is_none());
    assert_eq!(reg.record("bad").unwrap(), &serde_json::json!({"name": "NoUrl"}));

    reg.set_url("good", "https://good.new/");
    let written = reg.to_json_string().unwrap();
    assert_eq!(written, text.replace("https://good.example/", "https://good.new/"));
}

#[test]
fn field_order_within_a_record_is_kept() {
    let text = r#"{
  "a": {
    "url": "https://a.example/",
    "logo": "a.png",
    "name": "A"
  }
}"#;
    let mut reg = Registry::parse(Path::new("p.json"), text).unwrap();
    reg.set_url("a", "https://a.new/");
    assert_eq!(
        reg.to_json_string().unwrap(),
        text.replace("https://a.example/", "https://a.new/")
    );
}
