//! The process-wide transformer switch. Kept in its own test binary so the
//! toggle cannot race other tests.

use json_lens::{get, set_transformers_enabled, transformers_enabled, Evaluator, Options};

#[test]
fn disabling_transformers_turns_them_into_keys() {
    let json = r#"{"@keys":"literal key","a":{"b":1}}"#;
    assert!(transformers_enabled());
    assert_eq!(get(json, "a|@keys").raw(), r#"["b"]"#);

    set_transformers_enabled(false);
    assert!(!Options::default().transformers);
    assert_eq!(get(json, "@keys").str(), "literal key");
    assert!(!get(json, "a|@keys").exists());

    let explicit = Options::default().with_transformers(true);
    let ev = Evaluator::new(json_lens::transform::global(), explicit);
    assert_eq!(ev.get(json, "a|@keys").raw(), r#"["b"]"#);

    set_transformers_enabled(true);
    assert_eq!(get(json, "@keys").raw(), r#"["@keys","a"]"#);
}
