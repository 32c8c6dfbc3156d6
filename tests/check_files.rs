//! End-to-end checks over config files on disk

use std::path::PathBuf;

use conftype::{ConstraintSet, ConstraintSource, Outcome, ParseOptions, SourceError, ValueSource};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const CONSTRAINTS: &str = "\
[server]
port = int
hosts = [ str ]
timeout = ? float
weights = [ int or float ]

[features]
flags = ? [ str ]
legacy = { str }
";

const VALUES: &str = "\
[server]
port = 8080
hosts = [alpha, 'beta gamma']
weights = [1, 2.5, x]

[features]
flags =
unused = 1
";

#[test]
fn test_ini_check_reports_each_declared_key() {
    let dir = tempfile::tempdir().unwrap();
    let constraints = ConstraintSource::from_file(write(&dir, "types.ini", CONSTRAINTS)).unwrap();
    let values = ValueSource::from_file(write(&dir, "values.ini", VALUES)).unwrap();

    let set = ConstraintSet::compile(&constraints, ParseOptions::strict());
    assert_eq!(set.len(), 6);

    let report = set.check(&values);
    assert_eq!(report.entries.len(), 6);

    let outcome = |key: &str| report.get(key).unwrap().outcome.clone();

    assert_eq!(outcome("server.port"), Outcome::Valid { value: json!(8080) });
    assert_eq!(
        outcome("server.hosts"),
        Outcome::Valid { value: json!(["alpha", "beta gamma"]) }
    );
    assert_eq!(outcome("server.timeout"), Outcome::Valid { value: Value::Null });
    assert_eq!(outcome("features.flags"), Outcome::Valid { value: Value::Null });

    match outcome("server.weights") {
        Outcome::Invalid { reason } => assert_eq!(
            reason.to_string(),
            "failed to validate int also failed to validate float"
        ),
        other => panic!("Expected Invalid, got {:?}", other),
    }
    assert!(matches!(outcome("features.legacy"), Outcome::Malformed { .. }));

    assert_eq!(set.undeclared_keys(&values), vec!["features.unused"]);
    assert!(!report.is_clean());
}

#[test]
fn test_json_values_are_checked_structurally() {
    let dir = tempfile::tempdir().unwrap();
    let constraints = ConstraintSource::from_file(write(
        &dir,
        "types.toml",
        "[db]\nports = \"[ int ]\"\nname = \"str\"\n",
    ))
    .unwrap();
    let values = ValueSource::from_file(write(
        &dir,
        "values.json",
        r#"{"db": {"ports": [5432, 5433], "name": "main"}}"#,
    ))
    .unwrap();

    let report = ConstraintSet::compile(&constraints, ParseOptions::strict()).check(&values);
    assert!(report.is_clean());
    assert_eq!(
        report.get("db.ports").unwrap().outcome,
        Outcome::Valid { value: json!([5432, 5433]) }
    );
}

#[test]
fn test_missing_values_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ValueSource::from_file(dir.path().join("missing.ini")).unwrap_err();
    assert!(matches!(err, SourceError::Read { .. }));
    assert!(err.to_string().contains("missing.ini"));
}
