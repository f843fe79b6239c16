// ABOUTME: Styling engine for the cardpost application
// ABOUTME: Groups stylesheet model, themes, templates, role classification and the applicator

pub mod applicator;
pub mod background;
pub mod roles;
pub mod sheet;
pub mod template;
pub mod themes;

pub use applicator::style_page;
pub use background::Background;
pub use sheet::{StyleSheet, Theme};
pub use template::{FieldId, Profile, Template};

use crate::settings::Settings;
use log::warn;

pub const DEFAULT_FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif";
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Everything the applicator needs, passed explicitly on every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    pub theme: Theme,
    pub template: Template,
    pub font_family: String,
    pub font_size: u32,
    pub background: Background,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::new(themes::default_theme(), Template::default())
    }
}

impl StyleConfig {
    pub fn new(theme: Theme, template: Template) -> Self {
        Self {
            theme,
            template,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            background: Background::default(),
        }
    }

    pub fn with_font(mut self, family: &str, size: u32) -> Self {
        self.font_family = family.to_string();
        self.font_size = size;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Resolve the active theme and template from settings.
    /// Unknown ids fall back to the defaults.
    pub fn resolve(settings: &Settings) -> Self {
        let theme = match settings.theme(&settings.theme_id) {
            Some(theme) => theme.clone(),
            None => {
                warn!("Unknown theme '{}', using default", settings.theme_id);
                themes::default_theme()
            }
        };

        let template = Template::by_id(&settings.template_id).unwrap_or_else(|| {
            warn!("Unknown template '{}', using default", settings.template_id);
            Template::default()
        });

        let font_family = if settings.font_family.trim().is_empty() {
            DEFAULT_FONT_FAMILY
        } else {
            settings.font_family.as_str()
        };

        Self::new(theme, template)
            .with_font(font_family, settings.font_size)
            .with_background(settings.background.clone())
    }
}
