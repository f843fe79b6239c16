use crate::utils::*;
use crate::errors::CardError;
use std::path::Path;
use std::fs;
use tempfile::tempdir;

#[test]
fn resolve_inputs_expands_globs_to_markdown_only() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.md"), "## B").unwrap();
    fs::write(dir.path().join("a.md"), "## A").unwrap();
    fs::write(dir.path().join("c.txt"), "no").unwrap();

    let pattern = dir.path().join("*").to_string_lossy().to_string();
    let inputs = resolve_inputs(&pattern).unwrap();
    let names: Vec<_> = inputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.md", "b.md"]);

    let single = dir.path().join("a.md");
    assert_eq!(resolve_inputs(&single.to_string_lossy()).unwrap(), vec![single]);
}

#[test]
fn resolve_inputs_without_matches_is_an_error() {
    let dir = tempdir().unwrap();
    let pattern = dir.path().join("*.md").to_string_lossy().to_string();
    assert!(matches!(
        resolve_inputs(&pattern),
        Err(CardError::NoInputsFoundError(_))
    ));
}

#[test]
fn prefixes_and_base_urls() {
    assert_eq!(file_prefix(Path::new("notes/my note.md")), "my_note");
    let dir = tempdir().unwrap();
    let md = dir.path().join("n.md");
    fs::write(&md, "## x").unwrap();
    let base = base_href_for(&md).unwrap();
    assert!(base.as_str().ends_with('/'));
    assert!(base_href_for(Path::new("/no/such/file.md")).is_none());
}

#[test]
fn directories_are_created_and_checked() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("x/y");
    ensure_parent_directory_exists(&nested.join("out.png")).unwrap();
    assert!(nested.is_dir());
    validate_directory_writable(&nested).unwrap();
    assert!(validate_file_exists(&nested).is_err());
}
