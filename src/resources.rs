// ABOUTME: Resource handling for the cardpost application
// ABOUTME: Loads extra stylesheets from disk or the web and turns them into page tags

use crate::errors::{CardError, Result};
use log::{info, warn};
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

const FETCH_ATTEMPTS: u32 = 3;

/// A stylesheet that is either a local file or a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub path: String,
    pub is_remote: bool,
}

impl Stylesheet {
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    /// Fetch with retries and exponential backoff
    fn fetch_remote_content(&self) -> Result<String> {
        info!("Fetching remote stylesheet: {}", self.path);

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=FETCH_ATTEMPTS {
            match client.get(&self.path).send() {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text()?);
                }
                Ok(response) => {
                    last_error = Some(CardError::ValidationError(format!(
                        "HTTP error: {}",
                        response.status()
                    )));
                }
                Err(e) => last_error = Some(CardError::FetchError(e)),
            }

            if attempt < FETCH_ATTEMPTS {
                warn!(
                    "Fetch attempt {} for {} failed, retrying in {} ms",
                    attempt, self.path, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CardError::ValidationError("Unknown error fetching stylesheet".to_string())
        }))
    }

    fn read_local_content(&self) -> Result<String> {
        info!("Reading local stylesheet: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(CardError::PathNotFoundError(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// A `<style>` tag with the content, or a `<link>` for remote sheets that are not embedded
    pub fn tag(&self, embed: bool) -> Result<String> {
        if self.is_remote && !embed {
            return Ok(format!(r#"<link rel="stylesheet" href="{}">"#, self.path));
        }
        let content = self.content()?;
        if content.contains("</style") {
            return Err(CardError::InvalidResourcePath(format!(
                "Stylesheet {} contains a closing style tag",
                self.path
            )));
        }
        Ok(format!("<style>{}</style>", content))
    }
}

/// Tags for every stylesheet, in order
pub fn stylesheet_tags(paths: &[String], embed: bool) -> Result<Vec<String>> {
    paths.iter().map(|p| Stylesheet::new(p).tag(embed)).collect()
}
