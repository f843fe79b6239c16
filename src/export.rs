// ABOUTME: Image export for the cardpost application
// ABOUTME: Rasterizes the active card or every card in turn and bundles batch output into a zip archive

use crate::errors::{CardError, Result};
use crate::preview::{PageShell, Preview};
use chrono::Local;
use image::{DynamicImage, ImageOutputFormat};
use log::{debug, error, info, warn};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const DEFAULT_FILE_PREFIX: &str = "cardpost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// Guess the format from an output path, defaulting to PNG
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for ImageFormat {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            other => Err(CardError::ValidationError(format!(
                "Unsupported image format: {}",
                other
            ))),
        }
    }
}

/// Settings passed to the rasterizer for every capture
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Card width in CSS pixels
    pub width: u32,
    /// Pixel ratio of the captured image
    pub scale: f64,
    /// JPEG quality, 1-100
    pub quality: u8,
    pub format: ImageFormat,
    pub timeout_ms: u64,
    /// Time given to the page to repaint after visibility changes
    pub paint_delay_ms: u64,
    pub browser_path: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: 480,
            scale: 4.0,
            quality: 100,
            format: ImageFormat::Png,
            timeout_ms: 30000,
            paint_delay_ms: 100,
            browser_path: None,
        }
    }
}

/// Turns a complete card page into image bytes
pub trait Rasterizer {
    fn rasterize(&self, html: &str, options: &RasterOptions) -> Result<Vec<u8>>;

    /// Wait for one paint cycle after the page changed
    fn settle(&self, _options: &RasterOptions) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &self.bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub pages: usize,
}

impl ExportArchive {
    /// Write the archive into `dir` under its own file name
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        info!("Wrote {} with {} pages", path.display(), self.pages);
        Ok(path)
    }
}

pub struct Exporter<'a> {
    rasterizer: &'a dyn Rasterizer,
    options: RasterOptions,
    shell: PageShell,
    prefix: String,
}

impl<'a> Exporter<'a> {
    pub fn new(rasterizer: &'a dyn Rasterizer, options: RasterOptions, shell: PageShell) -> Self {
        let shell = PageShell {
            width: options.width,
            ..shell
        }
        .with_scale(options.scale);
        Self {
            rasterizer,
            options,
            shell,
            prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    /// Rasterize the card currently on screen
    pub fn export_current(&self, preview: &Preview) -> Result<ExportedImage> {
        let Some(index) = preview.active_index() else {
            error!("No active card to export");
            return Err(CardError::RegionNotFound(
                "no active card section in the preview".to_string(),
            ));
        };
        info!("Exporting card {} of {}", index + 1, preview.section_count());

        let bytes = self.capture(preview)?;
        Ok(ExportedImage {
            file_name: format!(
                "{}_{}.{}",
                self.prefix,
                Local::now().timestamp_millis(),
                self.options.format.extension()
            ),
            mime: self.options.format.mime(),
            bytes,
        })
    }

    /// Rasterize every card in order and bundle them into one archive.
    /// Section visibility is restored afterwards whether or not capture succeeded.
    pub fn export_all(&self, preview: &mut Preview) -> Result<ExportArchive> {
        if preview.is_empty() {
            error!("Nothing to export, the preview has no cards");
            return Err(CardError::RegionNotFound(
                "the preview has no card sections".to_string(),
            ));
        }

        let snapshot = preview.snapshot_flags();
        let captured = self.capture_each(preview);
        preview.restore_flags(snapshot);

        let images = captured.map_err(|e| {
            error!("Batch export failed: {}", e);
            e
        })?;
        let pages = images.len();
        let bytes = self.archive(&images)?;

        Ok(ExportArchive {
            file_name: format!("{}_{}.zip", self.prefix, Local::now().timestamp_millis()),
            bytes,
            pages,
        })
    }

    fn capture_each(&self, preview: &mut Preview) -> Result<Vec<(String, Vec<u8>)>> {
        let count = preview.section_count();
        let mut images = Vec::with_capacity(count);
        for index in 0..count {
            preview.force_visible(index);
            self.rasterizer.settle(&self.options);
            debug!("Capturing card {} of {}", index + 1, count);
            let bytes = self.capture(preview)?;
            let name = format!(
                "{}_page_{}.{}",
                self.prefix,
                index + 1,
                self.options.format.extension()
            );
            images.push((name, bytes));
        }
        Ok(images)
    }

    fn capture(&self, preview: &Preview) -> Result<Vec<u8>> {
        let page = preview.render().ok_or_else(|| {
            CardError::RegionNotFound("the preview has no card page".to_string())
        })?;
        let html = self.shell.wrap(&page, None);
        let raw = self.rasterizer.rasterize(&html, &self.options)?;
        normalize_image(&raw, self.options.format, self.options.quality)
    }

    fn archive(&self, images: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, bytes) in images {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(bytes)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Check that the bytes decode as an image and convert them to the requested format
pub fn normalize_image(bytes: &[u8], format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let detected = image::guess_format(bytes)
        .map_err(|e| CardError::RasterizeFailure(format!("output is not an image: {}", e)))?;
    let decoded = image::load_from_memory_with_format(bytes, detected)
        .map_err(|e| CardError::RasterizeFailure(format!("output does not decode: {}", e)))?;

    let matches = matches!(
        (detected, format),
        (image::ImageFormat::Png, ImageFormat::Png) | (image::ImageFormat::Jpeg, ImageFormat::Jpeg)
    );
    if matches {
        return Ok(bytes.to_vec());
    }

    warn!("Re-encoding {:?} capture as {:?}", detected, format);
    let mut out = Cursor::new(Vec::new());
    match format {
        ImageFormat::Png => decoded.write_to(&mut out, ImageOutputFormat::Png)?,
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8())
            .write_to(&mut out, ImageOutputFormat::Jpeg(quality.clamp(1, 100)))?,
    }
    Ok(out.into_inner())
}
