//! Integration tests for the Folio CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a book description plus the files it references
fn create_test_book(dir: &TempDir) -> PathBuf {
    fs::write(dir.path().join("gopher.png"), [0x89, b'P', b'N', b'G']).unwrap();
    fs::write(dir.path().join("style.css"), "h1 { text-align: center; }").unwrap();
    fs::write(dir.path().join("one.html"), "<h1>Section 1</h1>").unwrap();

    let description = r#"{
        "title": "CLI Book",
        "author": "Hingle McCringleberry",
        "modified": "2024-01-02T03:04:05Z",
        "cover": "gopher.png",
        "stylesheets": [{ "file": "style.css", "filename": "epub.css" }],
        "images": [{ "source": "gopher.png", "filename": "gopher.png" }],
        "sections": [
            { "title": "Section 1", "file": "one.html", "stylesheet": "epub.css" },
            { "title": "Section 2", "content": "<img src=\"../img/gopher.png\" alt=\"\"/>" }
        ]
    }"#;

    let path = dir.path().join("book.json");
    fs::write(&path, description).expect("Failed to write test file");
    path
}

fn build(input: &Path, output: &Path) -> assert_cmd::assert::Assert {
    Command::cargo_bin("folio-cli")
        .unwrap()
        .args([
            "build",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_build_help() {
    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    cmd.args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn test_build_missing_output() {
    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    cmd.args(["build", "book.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_build_nonexistent_description() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.epub");

    build(&PathBuf::from("/nonexistent/book.json"), &output)
        .failure()
        .stderr(predicate::str::contains("Failed to read book description"));
    assert!(!output.exists());
}

#[test]
fn test_build_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("book.json");
    fs::write(&input, "{ not json").unwrap();

    build(&input, &temp_dir.path().join("out.epub"))
        .failure()
        .stderr(predicate::str::contains("Invalid book description"));
}

#[test]
fn test_inspect_nonexistent_file() {
    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    cmd.args(["inspect", "/nonexistent/file.epub"])
        .assert()
        .failure();
}

#[test]
fn test_build_epub() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_book(&temp_dir);
    let output = temp_dir.path().join("output.epub");

    build(&input, &output).success();

    assert!(output.exists(), "Output file should exist");

    let file = fs::File::open(&output).unwrap();
    let mut archive = zip::ZipArchive::new(file).expect("Output should be a valid ZIP/EPUB file");

    let names: Vec<_> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "mimetype",
            "META-INF/container.xml",
            "OEBPS/package.opf",
            "OEBPS/toc.ncx",
            "OEBPS/nav.xhtml",
            "OEBPS/img/gopher.png",
            "OEBPS/css/epub.css",
            "OEBPS/xhtml/section0001.xhtml",
            "OEBPS/xhtml/section0002.xhtml",
        ]
    );

    let mimetype = archive.by_index(0).unwrap();
    assert_eq!(mimetype.compression(), zip::CompressionMethod::Stored);
    drop(mimetype);

    let mut package = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("OEBPS/package.opf").unwrap(),
        &mut package,
    )
    .unwrap();
    assert!(package.contains("<dc:title>CLI Book</dc:title>"));
    assert!(package.contains("Hingle McCringleberry</dc:creator>"));
    assert!(package.contains("2024-01-02T03:04:05Z"));
    assert!(package.contains("cover-image"));
}

#[test]
fn test_build_missing_image_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("book.json");
    fs::write(
        &input,
        r#"{
            "title": "Broken",
            "images": [{ "source": "absent.png" }],
            "sections": [{ "title": "One", "content": "<p/>" }]
        }"#,
    )
    .unwrap();
    let output = temp_dir.path().join("broken.epub");

    build(&input, &output)
        .failure()
        .stderr(predicate::str::contains("absent.png"));
    assert!(!output.exists());
}

#[test]
fn test_build_duplicate_filename() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("book.json");
    fs::write(
        &input,
        r#"{
            "title": "Dupes",
            "sections": [
                { "title": "One", "content": "", "filename": "same.xhtml" },
                { "title": "Two", "content": "", "filename": "same.xhtml" }
            ]
        }"#,
    )
    .unwrap();

    build(&input, &temp_dir.path().join("dupes.epub"))
        .failure()
        .stderr(predicate::str::contains("same.xhtml"));
}

#[test]
fn test_inspect_lists_entries() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_book(&temp_dir);
    let output = temp_dir.path().join("output.epub");
    build(&input, &output).success();

    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    cmd.args(["inspect", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("mimetype"))
        .stdout(predicate::str::contains("Stored"))
        .stdout(predicate::str::contains("9 entries"));
}

#[test]
fn test_inspect_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_book(&temp_dir);
    let output = temp_dir.path().join("output.epub");
    build(&input, &output).success();

    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    let assert = cmd
        .args(["inspect", "--json", output.to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(json[0]["name"], "mimetype");
    assert_eq!(json[0]["compression"], "Stored");
    assert_eq!(json.as_array().unwrap().len(), 9);
}

#[test]
fn test_verbose_flag() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_book(&temp_dir);
    let output = temp_dir.path().join("output.epub");

    let mut cmd = Command::cargo_bin("folio-cli").unwrap();
    cmd.args([
        "--verbose",
        "build",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ])
    .assert()
    .success();
    assert!(output.exists());
}
