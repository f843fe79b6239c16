// ABOUTME: Card background images for the cardpost application
// ABOUTME: Turns a stored image URL, scale and offset into declarations for the card root

use super::sheet::compose;
use serde::{Deserialize, Serialize};

pub const MIN_BACKGROUND_SCALE: u32 = 1;
pub const MAX_BACKGROUND_SCALE: u32 = 1000;

/// An image drawn behind the whole card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Background {
    /// Empty means no background image
    pub image_url: String,
    /// Percent of the card width
    pub scale: u32,
    pub x: i32,
    pub y: i32,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            scale: 100,
            x: 0,
            y: 0,
        }
    }
}

impl Background {
    pub fn new(image_url: &str) -> Self {
        Self {
            image_url: image_url.to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image_url.trim().is_empty()
    }

    /// Declarations for the card root, empty when there is no image
    pub fn declarations(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let url = self.image_url.trim().replace('\\', "\\\\").replace('"', "\\\"");
        compose(&[
            &format!("background-image: url(\"{}\")", url),
            &format!("background-size: {}%", self.scale),
            &format!("background-position: {}px {}px", self.x, self.y),
            "background-repeat: no-repeat",
        ])
    }

    /// Parse an offset written as `x,y` in pixels
    pub fn parse_position(value: &str) -> Option<(i32, i32)> {
        let (x, y) = value.split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}
