// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::Write;
use std::path::{Path, PathBuf};

use super::*;
use crate::config::types::ConflictPolicy;
use crate::error::{ArchiveError, PipeError};
use tempfile::TempDir;

fn write_jar(dir: &Path, name: &str, files: &[(&str, &str)], attrs: &[(&str, &str)]) -> PathBuf {
    let mut manifest = Manifest::new();
    for (k, v) in attrs {
        manifest.main_mut().insert(*k, *v);
    }
    let mut writer = ArchiveWriter::new(manifest);
    for (path, content) in files {
        writer.insert(*path, content.as_bytes().to_vec());
    }
    let path = dir.join(name);
    writer.write_to(&path).expect("write jar");
    path
}

fn archive_error(err: &anyhow::Error) -> &ArchiveError {
    match err.downcast_ref::<ArchiveError>() {
        Some(e) => e,
        None => match err.downcast_ref::<PipeError>() {
            Some(PipeError::Archive(e)) => &**e,
            _ => panic!("not an archive error: {err:#}"),
        },
    }
}

fn entry_text(contents: &[(String, Vec<u8>)], name: &str) -> String {
    let (_, bytes) = contents
        .iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("{name} missing"));
    String::from_utf8(bytes.clone()).unwrap()
}

fn three_modules(temp: &TempDir) -> Vec<MergeInput> {
    let api = write_jar(temp.path(), "api.jar", &[("a.txt", "1")], &[]);
    let fabric = write_jar(temp.path(), "fabric.jar", &[("a.txt", "2"), ("b.txt", "x")], &[]);
    let paper = write_jar(temp.path(), "paper.jar", &[("c.txt", "y")], &[]);
    vec![
        MergeInput::new("api", api),
        MergeInput::new("fabric", fabric),
        MergeInput::new("paper", paper),
    ]
}

fn merger(inputs: Vec<MergeInput>, output: PathBuf) -> ArchiveMerger {
    ArchiveMerger::builder()
        .with_inputs(inputs)
        .with_output(output)
        .with_version("1.4.0")
        .with_commit("abc123".to_string())
        .build()
}

// --- manifest ---

#[test]
fn test_manifest_new_has_version() {
    let manifest = Manifest::new();
    assert_eq!(manifest.main().get("Manifest-Version"), Some("1.0"));
    assert_eq!(
        manifest.to_bytes(),
        b"Manifest-Version: 1.0\r\n\r\n".to_vec()
    );
}

#[test]
fn test_manifest_parse_continuations_and_sections() {
    let text = "Manifest-Version: 1.0\nImplementation-Title: gui\n thium\nMain-Class: a.B\n\nName: a/B.class\nSHA-256-Digest: xyz\n";
    let manifest = Manifest::parse(text.as_bytes(), "test").unwrap();
    assert_eq!(manifest.main().get("implementation-title"), Some("guithium"));
    assert_eq!(manifest.main().get("Main-Class"), Some("a.B"));
    assert_eq!(
        manifest.section("a/B.class").and_then(|s| s.get("SHA-256-Digest")),
        Some("xyz")
    );
}

#[test]
fn test_manifest_parse_crlf() {
    let manifest = Manifest::parse(b"Manifest-Version: 1.0\r\nGit-Commit: abc\r\n\r\n", "t").unwrap();
    assert_eq!(manifest.main().get("Git-Commit"), Some("abc"));
    assert_eq!(manifest.main().len(), 2);
}

#[test]
fn test_manifest_parse_empty_main_keeps_sections_apart() {
    let manifest = Manifest::parse(b"\r\nName: com/x/\r\nSealed: true\r\n", "t").unwrap();
    assert_eq!(manifest.main().len(), 0);
    assert_eq!(
        manifest.section("com/x/").and_then(|s| s.get("Sealed")),
        Some("true")
    );

    let err = Manifest::parse(b"\n\nSealed: true\n", "x.jar").unwrap_err();
    assert!(matches!(err, ArchiveError::Manifest { line: 3, .. }));
}

#[test]
fn test_manifest_parse_errors_report_line() {
    let err = Manifest::parse(b"Manifest-Version: 1.0\nbroken line\n", "x.jar").unwrap_err();
    assert!(matches!(err, ArchiveError::Manifest { line: 2, .. }));

    let err = Manifest::parse(b" leading continuation\n", "x.jar").unwrap_err();
    assert!(matches!(err, ArchiveError::Manifest { line: 1, .. }));

    let err = Manifest::parse(b"Manifest-Version: 1.0\n\nFoo: bar\n", "x.jar").unwrap_err();
    assert!(matches!(err, ArchiveError::Manifest { line: 3, .. }));
}

#[test]
fn test_manifest_long_lines_wrap_at_72_bytes() {
    let mut manifest = Manifest::new();
    let long = "é".repeat(40) + &"x".repeat(100);
    manifest.main_mut().insert("Long-Value", long.as_str());

    let bytes = manifest.to_bytes();
    let text = String::from_utf8(bytes.clone()).unwrap();
    for line in text.split("\r\n") {
        assert!(line.len() <= 72, "line too long: {}", line.len());
    }
    assert!(text.lines().skip(2).all(|l| l.is_empty() || l.starts_with(' ')));

    let parsed = Manifest::parse(&bytes, "wrapped").unwrap();
    assert_eq!(parsed.main().get("Long-Value"), Some(long.as_str()));
}

#[test]
fn test_attributes_case_insensitive_insert_keeps_position() {
    let mut attrs = Attributes::default();
    attrs.insert("A-Key", "1");
    attrs.insert("B-Key", "2");
    attrs.insert("a-key", "3");
    assert_eq!(attrs.iter().collect::<Vec<_>>(), [("A-Key", "3"), ("B-Key", "2")]);
    assert_eq!(attrs.remove("b-KEY"), Some("2".to_string()));
    assert_eq!(attrs.len(), 1);
}

#[test]
fn test_manifest_import_other_wins() {
    let mut base = Manifest::new();
    base.main_mut().insert("Implementation-Title", "api");
    base.main_mut().insert("Kept", "yes");
    let mut other = Manifest::new();
    other.main_mut().insert("implementation-title", "fabric");
    other.section_mut("x.class").insert("Digest", "d");

    base.import(&other);
    assert_eq!(base.main().get("Implementation-Title"), Some("fabric"));
    assert_eq!(base.main().get("Kept"), Some("yes"));
    assert_eq!(base.section("x.class").and_then(|s| s.get("Digest")), Some("d"));
}

// --- writer ---

#[test]
fn test_writer_layout_manifest_first_then_sorted() {
    let temp = TempDir::new().unwrap();
    let path = write_jar(
        temp.path(),
        "out.jar",
        &[("z.txt", "z"), ("com/example/Main.class", "c"), ("a.txt", "a")],
        &[],
    );

    let file = std::fs::File::open(&path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "META-INF/",
            "META-INF/MANIFEST.MF",
            "a.txt",
            "com/",
            "com/example/",
            "com/example/Main.class",
            "z.txt",
        ]
    );
}

#[test]
fn test_writer_is_deterministic() {
    let temp = TempDir::new().unwrap();
    let files = [("b.txt", "b"), ("a/c.txt", "c")];
    let first = write_jar(temp.path(), "one.jar", &files, &[("Implementation-Version", "1")]);
    let second = write_jar(temp.path(), "two.jar", &files, &[("Implementation-Version", "1")]);
    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test]
fn test_writer_add_tree_imports_manifest() {
    let temp = TempDir::new().unwrap();
    let tree = temp.path().join("tree");
    std::fs::create_dir_all(tree.join("META-INF")).unwrap();
    std::fs::write(tree.join("META-INF/MANIFEST.MF"), "Manifest-Version: 1.0\nMain-Class: a.B\n").unwrap();
    std::fs::write(tree.join("plugin.yml"), "name: x").unwrap();

    let mut writer = ArchiveWriter::new(Manifest::new());
    assert_eq!(writer.add_tree(&tree).unwrap(), 2);
    assert_eq!(writer.len(), 1);
    assert_eq!(writer.entry("plugin.yml"), Some(b"name: x".as_slice()));
    assert_eq!(writer.manifest().main().get("Main-Class"), Some("a.B"));
}

// --- merge ---

#[test]
fn test_merge_last_writer_wins() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("merged.jar");
    let report = merger(three_modules(&temp), output.clone()).merge().unwrap();

    assert_eq!(report.entries, 3);
    assert_eq!(report.overwritten, ["a.txt"]);

    let (manifest, files) = read_archive(&output).unwrap();
    assert_eq!(entry_text(&files, "a.txt"), "2");
    assert_eq!(entry_text(&files, "b.txt"), "x");
    assert_eq!(entry_text(&files, "c.txt"), "y");

    let manifest = manifest.unwrap();
    assert_eq!(manifest.main().get("Implementation-Version"), Some("1.4.0"));
    assert_eq!(manifest.main().get("Git-Commit"), Some("abc123"));
}

#[test]
fn test_merge_is_byte_identical_across_runs() {
    let temp = TempDir::new().unwrap();
    let inputs = three_modules(&temp);
    let first = temp.path().join("first.jar");
    let second = temp.path().join("second.jar");
    merger(inputs.clone(), first.clone()).merge().unwrap();
    merger(inputs, second.clone()).merge().unwrap();
    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test]
fn test_merge_root_attributes_override_imported() {
    let temp = TempDir::new().unwrap();
    let api = write_jar(
        temp.path(),
        "api.jar",
        &[("a.txt", "1")],
        &[
            ("Implementation-Version", "0.0.1"),
            ("Git-Commit", "old"),
            ("Implementation-Title", "api"),
        ],
    );
    let fabric = write_jar(
        temp.path(),
        "fabric.jar",
        &[],
        &[("Implementation-Title", "fabric")],
    );
    let output = temp.path().join("merged.jar");
    merger(
        vec![MergeInput::new("api", api), MergeInput::new("fabric", fabric)],
        output.clone(),
    )
    .merge()
    .unwrap();

    let manifest = read_archive(&output).unwrap().0.unwrap();
    assert_eq!(manifest.main().get("Implementation-Version"), Some("1.4.0"));
    assert_eq!(manifest.main().get("Git-Commit"), Some("abc123"));
    assert_eq!(manifest.main().get("Implementation-Title"), Some("fabric"));
}

#[test]
fn test_merge_without_commit_keeps_imported_commit() {
    let temp = TempDir::new().unwrap();
    let api = write_jar(temp.path(), "api.jar", &[], &[("Git-Commit", "from-api")]);
    let output = temp.path().join("merged.jar");
    ArchiveMerger::builder()
        .with_inputs(vec![MergeInput::new("api", api)])
        .with_output(output.clone())
        .with_version("2.0.0")
        .build()
        .merge()
        .unwrap();

    let manifest = read_archive(&output).unwrap().0.unwrap();
    assert_eq!(manifest.main().get("Git-Commit"), Some("from-api"));
    assert_eq!(manifest.main().get("Implementation-Version"), Some("2.0.0"));
}

#[test]
fn test_merge_fail_policy_rejects_differing_content() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("merged.jar");
    let err = ArchiveMerger::builder()
        .with_inputs(three_modules(&temp))
        .with_output(output.clone())
        .with_version("1.4.0")
        .with_conflicts(ConflictPolicy::Fail)
        .build()
        .merge()
        .unwrap_err();

    assert!(matches!(
        archive_error(&err),
        ArchiveError::Conflict { entry, module, previous }
            if entry == "a.txt" && module == "fabric" && previous == "api"
    ));
    assert!(!output.exists());
}

#[test]
fn test_merge_identical_content_is_not_a_conflict() {
    let temp = TempDir::new().unwrap();
    let api = write_jar(temp.path(), "api.jar", &[("LICENSE", "GPL")], &[]);
    let paper = write_jar(temp.path(), "paper.jar", &[("LICENSE", "GPL")], &[]);
    let report = ArchiveMerger::builder()
        .with_inputs(vec![MergeInput::new("api", api), MergeInput::new("paper", paper)])
        .with_output(temp.path().join("merged.jar"))
        .with_version("1.0.0")
        .with_conflicts(ConflictPolicy::Fail)
        .build()
        .merge()
        .unwrap();
    assert!(report.overwritten.is_empty());
}

#[test]
fn test_merge_missing_input_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let mut inputs = three_modules(&temp);
    inputs.push(MergeInput::new("bukkit", temp.path().join("absent.jar")));
    let output = temp.path().join("merged.jar");

    let err = merger(inputs, output.clone()).merge().unwrap_err();
    assert!(matches!(
        archive_error(&err),
        ArchiveError::Unresolved { module, .. } if module == "bukkit"
    ));
    assert!(!output.exists());
}

#[test]
fn test_merge_rejects_non_archive_input() {
    let temp = TempDir::new().unwrap();
    let bogus = temp.path().join("bogus.jar");
    std::fs::write(&bogus, "not a zip").unwrap();
    let output = temp.path().join("merged.jar");

    let err = merger(vec![MergeInput::new("api", bogus)], output.clone())
        .merge()
        .unwrap_err();
    assert!(matches!(archive_error(&err), ArchiveError::Invalid { .. }));
    assert!(!output.exists());
}

#[test]
fn test_read_archive_rejects_escaping_entry() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("evil.jar");
    let mut zip = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
    zip.start_file("../evil.txt", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"x").unwrap();
    zip.finish().unwrap();

    let err = read_archive(&path).unwrap_err();
    assert!(matches!(archive_error(&err), ArchiveError::Invalid { .. }));
}
