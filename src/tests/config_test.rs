use crate::config::*;
use crate::export::ImageFormat;
use std::path::PathBuf;

#[test]
fn raster_options_prefer_explicit_values() {
    let config = Config {
        browser_path: Some("/usr/bin/chromium".to_string()),
        ..Config::default()
    };
    let defaults = config.get_raster_options(None, None, None, None);
    assert_eq!(defaults.width, DEFAULT_WIDTH);
    assert_eq!(defaults.scale, DEFAULT_SCALE);
    assert_eq!(defaults.format, ImageFormat::Png);
    assert_eq!(defaults.browser_path.as_deref(), Some("/usr/bin/chromium"));

    let custom = config.get_raster_options(Some(600), Some(2.0), Some(ImageFormat::Jpeg), Some(10));
    assert_eq!(custom.width, 600);
    assert_eq!(custom.scale, 2.0);
    assert_eq!(custom.format, ImageFormat::Jpeg);
    assert_eq!(custom.timeout_ms, 10);
}

#[test]
fn settings_store_path_override() {
    let config = Config::default();
    let store = config.settings_store(Some(PathBuf::from("custom.json")));
    assert_eq!(store.path(), std::path::Path::new("custom.json"));
}
