// ABOUTME: Browser rendering module for the cardpost application
// ABOUTME: Captures card pages as images using a headless browser

use crate::errors::{CardError, Result};
use crate::export::{ImageFormat, RasterOptions, Rasterizer};
use crate::style::roles::IMAGE_PREVIEW_CLASS;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptionsBuilder};
use log::{debug, info, warn};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use url::Url;
use uuid::Uuid;

/// Height of the browser window; cards taller than this are still captured whole
const WINDOW_HEIGHT: u32 = 1600;

fn browser_error(message: String) -> CardError {
    warn!("{}", message);
    CardError::BrowserError {
        message,
        source: None,
    }
}

/// Wrap a browser failure, keeping the underlying error as the source
fn chrome_error(context: &str, err: anyhow::Error) -> CardError {
    let message = format!("{}: {}", context, err);
    warn!("{}", message);
    CardError::BrowserError {
        message,
        source: Some(err.into()),
    }
}

/// Rasterizer backed by a headless Chrome or Chromium
#[derive(Debug, Default, Clone)]
pub struct ChromeRasterizer {
    browser_path: Option<String>,
}

impl ChromeRasterizer {
    pub fn new(browser_path: Option<String>) -> Self {
        Self { browser_path }
    }

    fn launch(&self, options: &RasterOptions) -> Result<Browser> {
        let mut builder = LaunchOptionsBuilder::default();
        // Window wide enough for the zoomed card plus page padding
        let width = (options.width as f64 * options.scale).ceil() as u32 + 64;
        builder.window_size(Some((width, WINDOW_HEIGHT)));
        builder.headless(true);

        let path = self
            .browser_path
            .clone()
            .or_else(|| options.browser_path.clone())
            .or_else(|| env::var("BROWSER_PATH").ok().filter(|p| !p.is_empty()));
        if let Some(path) = path {
            builder.path(Some(path.into()));
        }

        let launch_options = builder
            .build()
            .map_err(|e| browser_error(format!("Failed to build browser options: {:?}", e)))?;

        info!("Launching headless browser");
        Browser::new(launch_options)
            .map_err(|e| chrome_error("Failed to launch browser", e))
    }
}

/// Temporary page file removed when dropped
pub(crate) struct PageFile(pub(crate) PathBuf);

impl PageFile {
    pub(crate) fn write(html: &str) -> Result<Self> {
        let path = env::temp_dir().join(format!("cardpost-{}.html", Uuid::new_v4()));
        fs::write(&path, html)?;
        Ok(Self(path))
    }

    pub(crate) fn url(&self) -> Result<Url> {
        Url::from_file_path(&self.0).map_err(|_| {
            CardError::InvalidResourcePath(format!("Not an absolute path: {:?}", self.0))
        })
    }
}

impl Drop for PageFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.0) {
            debug!("Could not remove temporary page {:?}: {}", self.0, e);
        }
    }
}

impl Rasterizer for ChromeRasterizer {
    fn rasterize(&self, html: &str, options: &RasterOptions) -> Result<Vec<u8>> {
        let start = Instant::now();
        let page = PageFile::write(html)?;
        let url = page.url()?;

        let browser = self.launch(options)?;
        let tab = browser
            .new_tab()
            .map_err(|e| chrome_error("Failed to create new tab", e))?;

        info!("Opening card page at URL: {}", url);
        tab.navigate_to(url.as_str())
            .map_err(|e| chrome_error("Failed to navigate to card page", e))?;
        tab.wait_until_navigated()
            .map_err(|e| chrome_error("Navigation failed", e))?;

        let selector = format!(".{}", IMAGE_PREVIEW_CLASS);
        let card = tab
            .wait_for_element_with_custom_timeout(&selector, Duration::from_millis(options.timeout_ms))
            .map_err(|e| CardError::RegionNotFound(format!("{}: {}", selector, e)))?;

        // Fonts and images need a moment after the element appears
        self.settle(options);

        let format = match options.format {
            ImageFormat::Png => CaptureScreenshotFormatOption::Png,
            ImageFormat::Jpeg => CaptureScreenshotFormatOption::Jpeg,
        };
        let bytes = card
            .capture_screenshot(format)
            .map_err(|e| CardError::RasterizeFailure(format!("Screenshot failed: {}", e)))?;

        info!(
            "Captured card ({} bytes) in {:.2} seconds",
            bytes.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(bytes)
    }

    fn settle(&self, options: &RasterOptions) {
        std::thread::sleep(Duration::from_millis(options.paint_delay_ms));
    }
}
