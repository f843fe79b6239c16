use cardpost::{
    ChromeRasterizer, Exporter, MarkdownOptions, PageShell, PreviewSession, RasterOptions,
    RebuildOutcome, Settings, StyleConfig, utils,
};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> Output {
    Command::new("cargo")
        .arg("run")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn count_files_with_pattern(dir: &Path, pattern: &str) -> usize {
    let glob_pattern = format!("{}/{}", dir.to_string_lossy(), pattern);
    glob::glob(&glob_pattern)
        .expect("Failed to read glob pattern")
        .filter_map(Result::ok)
        .count()
}

fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

const NOTE: &str = r#"# Reading list

A line before the first card that never makes it onto one.

## Books

1. The Rust Programming Language
2. Programming Rust

> Read one chapter a day.

## Snippets

```rust
fn main() {
    println!("hello");
}
```

| Title | Pages |
|-------|-------|
| Book  | 560   |

## Done

- [x] Chapter 1
- [ ] Chapter 2
"#;

fn write_note(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, NOTE).expect("Failed to write markdown file");
    path
}

#[test]
fn test_full_library_pipeline() {
    init_logging();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_note(temp_dir.path(), "reading.md");

    let settings = Settings::default();
    let mut session = PreviewSession::new(StyleConfig::resolve(&settings), settings.profile());
    let outcome = session
        .open_file(&markdown_path, &MarkdownOptions::default())
        .expect("Failed to open note");
    assert!(matches!(outcome, RebuildOutcome::Rebuilt { sections: 3, .. }));

    let shell = PageShell {
        title: utils::file_prefix(&markdown_path),
        base_href: utils::base_href_for(&markdown_path),
        ..PageShell::default()
    };

    for expected in ["1/3", "2/3", "3/3"] {
        let html = session.to_html(&shell, true, true);
        assert!(html.contains(expected), "Missing indicator {}", expected);
        assert!(html.contains("<title>reading</title>"));
        assert!(html.contains("<base href=\"file://"));
        session.navigate(cardpost::Direction::Next);
    }

    let html = session.to_html(&shell, false, false);
    assert!(html.contains("cp-window-controls"), "Code blocks get window controls");
    assert!(html.contains("Chapter 1"));
    assert!(!html.contains("never makes it onto one"));
}

#[test]
fn test_locked_session_defers_rebuilds() {
    init_logging();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_note(temp_dir.path(), "reading.md");

    let mut session = PreviewSession::new(StyleConfig::default(), Settings::default().profile());
    session
        .open_file(&markdown_path, &MarkdownOptions::default())
        .unwrap();
    session.go_to(2);

    session.set_locked(true);
    let document = cardpost::parse_markdown("## Only one\n\ntext", &MarkdownOptions::default())
        .unwrap();
    assert_eq!(session.rebuild(document), RebuildOutcome::Deferred);
    assert_eq!(session.preview().section_count(), 3);
    assert_eq!(session.current(), Some(2));

    let outcome = session.set_locked(false).expect("Unlocking should rebuild");
    assert!(matches!(outcome, RebuildOutcome::Rebuilt { sections: 1, .. }));
    assert_eq!(session.current(), Some(0));
}

#[test]
#[ignore] // Ignore by default as it requires a headless browser
fn test_export_current_card_with_browser() {
    init_logging();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let markdown_path = write_note(temp_dir.path(), "reading.md");

    let settings = Settings::default();
    let mut session = PreviewSession::new(StyleConfig::resolve(&settings), settings.profile());
    session
        .open_file(&markdown_path, &MarkdownOptions::default())
        .unwrap();

    let rasterizer = ChromeRasterizer::default();
    let options = RasterOptions {
        scale: 1.0,
        ..RasterOptions::default()
    };
    let exporter = Exporter::new(&rasterizer, options, PageShell::default());
    let image = exporter
        .export_current(session.preview())
        .expect("Failed to export card");

    let output = temp_dir.path().join("card.png");
    image.save(&output).unwrap();
    let decoded = image::open(&output).expect("Exported card is not an image");
    assert!(decoded.width() > 0);
}

#[test]
#[ignore] // Ignore as it requires headless browser
fn test_export_all_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let notes_dir = temp_dir.path().join("notes");
    let out_dir = temp_dir.path().join("out");
    fs::create_dir_all(&notes_dir).unwrap();
    write_note(&notes_dir, "first.md");
    write_note(&notes_dir, "second.md");

    let pattern = format!("{}/*.md", notes_dir.to_string_lossy());
    let output = run_command(&[
        "export-all",
        "-i",
        &pattern,
        "-o",
        out_dir.to_str().unwrap(),
        "--scale",
        "1",
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(count_files_with_pattern(&out_dir, "first_*.zip"), 1);
    assert_eq!(count_files_with_pattern(&out_dir, "second_*.zip"), 1);
}
