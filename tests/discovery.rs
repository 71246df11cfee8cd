// monojust/tests/discovery.rs

use monojust::{
    disambiguate, error::ErrorKind, fuzzy, parser, resolve, Indexer,
};
use std::{fs, path::Path};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, body: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, body).unwrap();
}

fn monorepo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "justfile", "build:\ntest: # Everything\n_internal:\n");
    write(root, "backend/justfile", "test: # Backend only\nmigrate:\n");
    write(root, "frontend/app/justfile", "dev:\nlint:\n");
    write(root, "node_modules/pkg/justfile", "poison:\n");
    write(root, ".cache/justfile", "hidden:\n");
    write(root, "services/api/justfile", "PREFIX := build:\nserve port:\n");
    dir
}

#[test]
fn private_targets_never_surface() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "justfile", "build:\n_internal:\n");
    let targets = parser::parse_file(&dir.path().join("justfile")).unwrap().into_result().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].name, "build");
}

#[test]
fn same_line_description() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "justfile", "deploy: # Deploy to production\n");
    let targets = parser::parse_file(&dir.path().join("justfile")).unwrap().into_result().unwrap();
    assert_eq!(targets[0].name, "deploy");
    assert_eq!(targets[0].description, "Deploy to production");
}

#[test]
fn excluded_and_hidden_directories_are_not_indexed() {
    let dir = monorepo();
    let names: Vec<String> = Indexer::default().index_all(dir.path()).into_iter().map(|e| e.target.name).collect();
    assert!(!names.iter().any(|n| n == "poison" || n == "hidden" || n == "_internal"));
    assert!(names.iter().any(|n| n == "serve"));
    assert!(!names.iter().any(|n| n == "PREFIX"));
}

#[test]
fn root_and_backend_test_are_disambiguated() {
    let dir = monorepo();
    let root = dir.path();
    let set = disambiguate(&Indexer::default().index_all(root), root);
    let displays = set.displays();
    assert!(displays.contains(&"test".to_string()));
    assert!(displays.contains(&"test (@backend)".to_string()));
    assert!(displays.contains(&"dev".to_string()));
    let mut unique = displays.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), displays.len());
    assert_eq!(set.get("test (@backend)").unwrap().description, "Backend only");
}

#[test]
fn fuzzy_over_real_candidates() {
    let dir = monorepo();
    let root = dir.path();
    let displays = disambiguate(&Indexer::default().index_all(root), root).displays();

    assert_eq!(fuzzy::fuzzy_match("", &displays), displays);
    let hits = fuzzy::fuzzy_match("tb", &displays);
    assert_eq!(hits, vec!["test (@backend)".to_string()]);
    assert_eq!(hits, fuzzy::fuzzy_match("tb", &displays));

    let ranked = fuzzy::fuzzy_match("test", &displays);
    assert_eq!(ranked[0], "test");
    assert_eq!(ranked[1], "test (@backend)");
}

#[test]
fn resolve_backend() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    assert_eq!(resolve("@backend", root).unwrap_err().kind(), ErrorKind::NotFound);
    fs::create_dir_all(root.join("backend")).unwrap();
    assert_eq!(resolve("@backend", root).unwrap(), root.join("backend"));
}

#[test]
fn index_one_surfaces_errors_index_all_does_not() {
    let dir = monorepo();
    let root = dir.path();
    fs::create_dir_all(root.join("empty")).unwrap();
    let ix = Indexer::default();
    assert_eq!(ix.index_one(&root.join("empty")).unwrap_err().kind(), ErrorKind::NotFound);
    assert!(!ix.index_all(root).is_empty());
}
