use std::path::Path;

use gast_core::ast::{Any, Expr, Stmt};
use gast_core::error::Error;
use gast_core::Language;
use pretty_assertions::assert_eq;

use crate::{frontend_for, normalize, normalize_file, normalize_source, parse_fragment, parse_tree, FrontendRegistry};

#[test]
fn frontend_matches_its_language() {
    for lang in [Language::Java, Language::JavaScript, Language::Python] {
        assert_eq!(frontend_for(lang).language(), lang);
    }
}

#[test]
fn registry_finds_frontends_by_name_and_extension() {
    let registry = FrontendRegistry::with_builtin();
    let lookup = |key: &str| registry.get(key).map(|fe| fe.language());
    assert_eq!(lookup("java"), Some(Language::Java));
    assert_eq!(lookup("JavaScript"), Some(Language::JavaScript));
    assert_eq!(lookup("mjs"), Some(Language::JavaScript));
    assert_eq!(lookup("py"), Some(Language::Python));
    assert_eq!(lookup("rs"), None);

    let mut merged = FrontendRegistry::new();
    assert!(merged.get("python").is_none());
    merged.merge(&registry);
    assert_eq!(merged.get("python").map(|fe| fe.language()), Some(Language::Python));
}

#[test]
fn normalize_agrees_with_normalize_source() {
    let source = "x = 1\ny = x + 2\n";
    let tree = parse_tree(Language::Python, source).expect("parse should succeed");
    let from_tree = normalize(Language::Python, &tree, source, None).expect("normalize");
    let from_source = normalize_source(Language::Python, source, None).expect("normalize");
    assert_eq!(from_tree.len(), 2);
    assert_eq!(from_tree, from_source);
}

#[test]
fn fragments_unwrap_lone_expressions() {
    assert!(matches!(
        parse_fragment(Language::JavaScript, "a + b").expect("fragment"),
        Any::E(Expr::Call(..))
    ));
    assert!(matches!(
        parse_fragment(Language::Python, "while x:\n    pass\n").expect("fragment"),
        Any::S(Stmt::While(..))
    ));
    assert!(matches!(
        parse_fragment(Language::Java, "int a; int b;").expect("fragment"),
        Any::Ss(stmts) if stmts.len() == 2
    ));
}

#[test]
fn normalize_file_picks_language_from_extension() {
    let path = std::env::temp_dir().join(format!("gast_lang_{}.py", std::process::id()));
    std::fs::write(&path, "import os\nprint(os.sep)\n").expect("write sample");
    let program = normalize_file(&path);
    std::fs::remove_file(&path).ok();
    assert_eq!(program.expect("normalize").len(), 2);
}

#[test]
fn normalize_file_rejects_unknown_extensions() {
    let err = normalize_file(Path::new("notes/readme.txt")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedLanguage(path) if path.ends_with("readme.txt")));
}

#[test]
fn missing_file_is_an_error() {
    let err = normalize_file(Path::new("/nonexistent/gast/Missing.java")).unwrap_err();
    assert!(matches!(err, Error::Generic(_)));
}
