use crate::resources::*;
use crate::errors::CardError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn remote_detection() {
    assert!(Stylesheet::new("https://example.com/a.css").is_remote);
    assert!(!Stylesheet::new("styles/a.css").is_remote);
}

#[test]
fn local_sheets_are_embedded() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, ".cp-image-preview {{ border: 1px solid red; }}").unwrap();
    let path = file.path().to_string_lossy().to_string();
    let tags = stylesheet_tags(&[path], false).unwrap();
    assert_eq!(tags.len(), 1);
    assert!(tags[0].starts_with("<style>.cp-image-preview"));
}

#[test]
fn remote_sheets_can_be_linked() {
    let tag = Stylesheet::new("https://example.com/a.css").tag(false).unwrap();
    assert_eq!(tag, r#"<link rel="stylesheet" href="https://example.com/a.css">"#);
}

#[test]
fn missing_local_sheet_is_an_error() {
    let err = Stylesheet::new("/definitely/not/here.css").tag(true).unwrap_err();
    assert!(matches!(err, CardError::PathNotFoundError(_)));
}
