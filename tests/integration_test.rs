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

const NOTE: &str = "# Trip\n\n## Day one\n\nArrived late.\n\n## Day two\n\nWent hiking.\n";

fn write_note(dir: &Path) -> String {
    let markdown_path = dir.join("trip.md");
    fs::write(&markdown_path, NOTE).expect("Failed to write markdown file");
    markdown_path.to_str().unwrap().to_string()
}

fn settings_path(dir: &Path) -> String {
    dir.join("settings.json").to_str().unwrap().to_string()
}

#[test]
fn test_preview_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path();
    let markdown_path = write_note(temp_path);

    let css_path = temp_path.join("extra.css");
    fs::write(&css_path, ".cp-image-preview { outline: 1px solid teal; }")
        .expect("Failed to write CSS file");

    let output_path = temp_path.join("preview.html");
    let settings = settings_path(temp_path);

    let output = run_command(&[
        "preview",
        "-i",
        &markdown_path,
        "-o",
        output_path.to_str().unwrap(),
        "--css",
        css_path.to_str().unwrap(),
        "--settings",
        &settings,
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_path.exists(), "Output file was not created");

    let html_content = fs::read_to_string(&output_path).expect("Failed to read output file");
    assert!(html_content.contains("Day one"), "Missing first card");
    assert!(html_content.contains("Day two"), "Missing second card");
    assert!(
        html_content.contains("<style>.cp-image-preview { outline: 1px solid teal; }</style>"),
        "Missing CSS"
    );
    assert!(html_content.contains("1/2"), "Missing page indicator");
}

#[test]
fn test_preview_command_selects_page() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path();
    let markdown_path = write_note(temp_path);
    let output_path = temp_path.join("preview.html");
    let settings = settings_path(temp_path);

    let output = run_command(&[
        "preview",
        "-i",
        &markdown_path,
        "-o",
        output_path.to_str().unwrap(),
        "--page",
        "2",
        "--settings",
        &settings,
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let html_content = fs::read_to_string(&output_path).expect("Failed to read output file");
    assert!(html_content.contains("2/2"));

    let output = run_command(&[
        "preview",
        "-i",
        &markdown_path,
        "-o",
        output_path.to_str().unwrap(),
        "--page",
        "5",
        "--settings",
        &settings,
    ]);
    assert!(!output.status.success(), "Out of range page should fail");
}

#[test]
fn test_preview_with_theme_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path();
    let markdown_path = write_note(temp_path);
    let settings = settings_path(temp_path);
    let default_path = temp_path.join("default.html");
    let cyber_path = temp_path.join("cyber.html");

    for (theme, path) in [("default", &default_path), ("cyber", &cyber_path)] {
        let output = run_command(&[
            "preview",
            "-i",
            &markdown_path,
            "-o",
            path.to_str().unwrap(),
            "--theme",
            theme,
            "--settings",
            &settings,
        ]);
        assert!(output.status.success(), "Command failed: {:?}", output);
    }

    let default_html = fs::read_to_string(&default_path).unwrap();
    let cyber_html = fs::read_to_string(&cyber_path).unwrap();
    assert_ne!(default_html, cyber_html, "Theme override had no effect");
    // Overrides are not persisted
    assert!(!Path::new(&settings).exists());
}

#[test]
fn test_edit_and_themes_commands() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let settings = settings_path(temp_dir.path());

    let output = run_command(&["edit", "--field", "theme", "--value", "ocean", "--settings", &settings]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stored = fs::read_to_string(&settings).expect("Settings were not saved");
    assert!(stored.contains("\"themeId\": \"ocean\""));

    let output = run_command(&["themes", "--settings", &settings]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("* ocean"), "Active theme not marked: {}", stdout);
    assert!(stdout.contains("minimal"));

    let output = run_command(&["edit", "--field", "theme", "--value", "plaid", "--settings", &settings]);
    assert!(!output.status.success(), "Unknown theme should be rejected");
}

#[test]
fn test_missing_input_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_path = temp_dir.path().join("preview.html");

    let output = run_command(&[
        "preview",
        "-i",
        "/nonexistent/file.md",
        "-o",
        output_path.to_str().unwrap(),
    ]);

    assert!(!output.status.success(), "Command should fail with nonexistent file");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "Missing error message: {}", stderr);
}

#[test]
fn test_export_all_without_matches() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pattern = format!("{}/*.md", temp_dir.path().to_string_lossy());

    let output = run_command(&[
        "export-all",
        "-i",
        &pattern,
        "-o",
        temp_dir.path().to_str().unwrap(),
    ]);

    assert!(!output.status.success(), "No matching notes should be an error");
}
