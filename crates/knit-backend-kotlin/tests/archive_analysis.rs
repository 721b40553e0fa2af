//! End-to-end tests: zip bytes in, annotated graph out.

use knit_backend_kotlin::KotlinBackend;
use knit_config::KnitConfig;
use knit_core::{CycleMode, Severity, CYCLE_ISSUE, CYCLE_THICKNESS, UNUSED_ISSUE};
use std::fs;
use std::io::{Cursor, Write};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn zip_raw<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    zip_raw(entries.iter().map(|(name, contents)| (*name, contents.as_bytes())))
}

fn backend_in(parent: &TempDir) -> KotlinBackend {
    let mut config = KnitConfig::default();
    config.layout.seed = Some(7);
    KotlinBackend::from_config(&config).with_workspace_parent(parent.path())
}

#[test]
fn test_single_provider_with_injection() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[(
        "app/src/main/kotlin/Foo.kt",
        "@Provides class Foo(\n    private val bar by di\n)\n",
    )]);

    let result = backend_in(&parent).analyze_archive(&bytes);

    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["Foo"]);
    let edge_ids: Vec<&str> = result.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edge_ids, vec!["Foo_bar"]);
    assert_eq!(result.edges[0].label, "Foo → bar");
    assert!(result.errors.is_empty());

    let foo = result.nodes.get("Foo").unwrap();
    assert_eq!(foo.severity, Severity::Unused);
    assert_eq!(foo.issues, vec![UNUSED_ISSUE]);
    assert!((100.0..700.0).contains(&foo.x));
    assert!((100.0..500.0).contains(&foo.y));
}

#[test]
fn test_three_file_cycle() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[
        ("A.kt", "@Provides class A\nval B by di\n"),
        ("B.kt", "@Provides class B\nval C by di\n"),
        ("C.kt", "@Provides class C\nval A by di\n"),
    ]);

    let result = backend_in(&parent).analyze_archive(&bytes);

    assert_eq!(result.count_severity(Severity::Critical), 3);
    for edge in &result.edges {
        assert_eq!(edge.thickness, CYCLE_THICKNESS);
        assert_eq!(edge.issues, vec![CYCLE_ISSUE]);
    }
    assert!(result
        .suggestions
        .iter()
        .any(|s| s.starts_with("Break 3 circular")));
}

#[test]
fn test_strict_cycle_mode_does_not_mark_entry_node() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[
        ("D.kt", "@Provides class D\nval A by di\n"),
        ("A.kt", "@Provides class A\nval B by di\n"),
        ("B.kt", "@Provides class B\nval A by di\n"),
    ]);

    let mut config = KnitConfig::default();
    config.cycles.mode = CycleMode::StronglyConnected;
    let backend = KotlinBackend::from_config(&config).with_workspace_parent(parent.path());
    let result = backend.analyze_archive(&bytes);

    assert_eq!(result.nodes.get("A").unwrap().severity, Severity::Critical);
    assert_eq!(result.nodes.get("B").unwrap().severity, Severity::Critical);
    assert_eq!(result.nodes.get("D").unwrap().severity, Severity::Unused);
}

#[test]
fn test_workspace_removed_after_success() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[("Foo.kt", "@Provides class Foo\n")]);

    let result = backend_in(&parent).analyze_archive(&bytes);

    assert_eq!(result.nodes.len(), 1);
    assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 0);
}

#[test]
fn test_invalid_archive() {
    let parent = TempDir::new().unwrap();

    let result = backend_in(&parent).analyze_archive(b"PK\x03\x04 but not really");

    assert!(result.nodes.is_empty());
    assert!(result.edges.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Failed to process project:"));
    assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 0);
}

#[test]
fn test_traversal_entry_fails_whole_upload() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[
        ("Foo.kt", "@Provides class Foo\n"),
        ("../../Evil.kt", "@Provides class Evil\n"),
    ]);

    let result = backend_in(&parent).analyze_archive(&bytes);

    assert!(result.nodes.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Path traversal"));
    assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 0);
}

#[test]
fn test_unreadable_file_is_recorded_and_scan_continues() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_raw([
        ("Bad.kt", &[0xff, 0xfe, 0xfd][..]),
        ("Good.kt", &b"@Provides class Good\n"[..]),
    ]);

    let result = backend_in(&parent).analyze_archive(&bytes);

    assert_eq!(result.nodes.len(), 1);
    assert!(result.nodes.contains("Good"));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Bad.kt"));
}

#[test]
fn test_duplicate_component_names_overwrite() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[
        ("a/Repo.kt", "@Provides class Repo\nval db by di\n"),
        ("b/Repo.kt", "@Provides class Repo\nval cache by di\n"),
    ]);

    let result = backend_in(&parent).analyze_archive(&bytes);

    assert_eq!(result.nodes.len(), 1);
    let targets: Vec<&str> = result.edges.iter().map(|e| e.target.as_str()).collect();
    assert_eq!(targets, vec!["db", "cache"]);
}

#[test]
fn test_seeded_runs_are_identical() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[
        ("A.kt", "@Provides class A\nval B by di\n"),
        ("B.kt", "@Provides class B\nval A by di\n"),
        ("C.kt", "@Provides class C\nval A by di\n"),
    ]);
    let backend = backend_in(&parent);

    let first = backend.analyze_archive(&bytes);
    let second = backend.analyze_archive(&bytes);

    assert_eq!(first, second);
}

#[test]
fn test_non_kotlin_files_ignored() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[
        ("README.md", "@Provides class Docs\n"),
        ("build.gradle", "@Provides class Build\n"),
        ("Main.kt", "@Provides class Main\n"),
    ]);

    let result = backend_in(&parent).analyze_archive(&bytes);

    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["Main"]);
}

fn assert_single_foo(result: &knit_core::AnalysisResult) {
    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["Foo"]);
    let edge_ids: Vec<&str> = result.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edge_ids, vec!["Foo_bar"]);
    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
}

#[test]
fn test_hidden_directory_is_scanned() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[(".app/Foo.kt", "@Provides class Foo\nval bar by di\n")]);

    assert_single_foo(&backend_in(&parent).analyze_archive(&bytes));
}

#[test]
fn test_shipped_ignore_file_is_not_honoured() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[
        (".ignore", "*.kt\n"),
        ("Foo.kt", "@Provides class Foo\nval bar by di\n"),
    ]);

    assert_single_foo(&backend_in(&parent).analyze_archive(&bytes));
}

#[test]
fn test_shipped_gitignore_is_not_honoured() {
    let parent = TempDir::new().unwrap();
    let bytes = zip_of(&[
        (".git/HEAD", "ref: refs/heads/main\n"),
        (".gitignore", "src/\n"),
        ("src/Foo.kt", "@Provides class Foo\nval bar by di\n"),
    ]);

    assert_single_foo(&backend_in(&parent).analyze_archive(&bytes));
}

#[test]
fn test_configured_ignore_patterns_still_apply() {
    let parent = TempDir::new().unwrap();
    let mut config = KnitConfig::default();
    config.scanner.ignore_patterns = vec!["generated/**".to_string()];
    let backend = KotlinBackend::from_config(&config).with_workspace_parent(parent.path());
    let bytes = zip_of(&[
        ("generated/Gen.kt", "@Provides class Gen\n"),
        ("Foo.kt", "@Provides class Foo\nval bar by di\n"),
    ]);

    assert_single_foo(&backend.analyze_archive(&bytes));
}
